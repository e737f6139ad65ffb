//! Key encapsulation mechanism recipients for CMS enveloped data.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::OTHER_RECIPIENT_INFO,
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "kem_recipient",
    depends_on: &["pkix", "cms"],
    load,
};

pub const ID_ORI_KEM: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.13.3");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let octet_string = SchemaNode::octet_string();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let kek_length = SchemaNode::integer().constrained(Constraint::value(1..=65535)?);
    let ukm = octet_string.explicit(0)?;

    let kem_recipient_info = catalog.define(
        "kem_recipient.KEMRecipientInfo",
        SchemaNode::sequence([
            Component::required("version", &catalog.schema("cms.CMSVersion")?),
            Component::required("rid", &catalog.schema("cms.RecipientIdentifier")?),
            Component::required("kem", &algorithm_identifier),
            Component::required("kemct", &octet_string),
            Component::required("kdf", &algorithm_identifier),
            Component::required("kekLength", &kek_length),
            Component::optional("ukm", &ukm),
            Component::required("wrap", &algorithm_identifier),
            Component::required("encryptedKey", &octet_string),
        ])?,
    )?;
    catalog.define(
        "kem_recipient.CMSORIforKEMOtherInfo",
        SchemaNode::sequence([
            Component::required("wrap", &algorithm_identifier),
            Component::required("kekLength", &kek_length),
            Component::optional("ukm", &ukm),
        ])?,
    )?;

    catalog
        .registry(OTHER_RECIPIENT_INFO)
        .register(ID_ORI_KEM, kem_recipient_info)?;
    Ok(())
}
