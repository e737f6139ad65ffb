//! Asymmetric key packages, usable as CMS content.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::CMS_CONTENT_TYPES,
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "private_keys",
    depends_on: &["pkix", "cms"],
    load,
};

pub const ID_CT_KP_ASYMMETRIC_KEY_PACKAGE: Oid = Oid::new_unwrap("2.16.840.1.101.2.1.2.78.5");
pub const ID_CT_ONE_ASYMMETRIC_KEY: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.1.52");
pub const ID_CT_ENCRYPTED_PRIVATE_KEY_INFO: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.1.53");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let octet_string = SchemaNode::octet_string();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let attribute = catalog.schema("cms.Attribute")?;

    let one_asymmetric_key = catalog.define(
        "private_keys.OneAsymmetricKey",
        SchemaNode::sequence([
            Component::required("version", &SchemaNode::integer()),
            Component::required("privateKeyAlgorithm", &algorithm_identifier),
            Component::required("privateKey", &octet_string),
            Component::optional(
                "attributes",
                &SchemaNode::set_of(&attribute).implicit(0)?,
            ),
            Component::optional("publicKey", &SchemaNode::bit_string().implicit(1)?),
        ])?,
    )?;
    let key_package = catalog.define(
        "private_keys.AsymmetricKeyPackage",
        SchemaNode::sequence_of(&one_asymmetric_key).constrained(Constraint::non_empty()),
    )?;
    let encrypted_private_key_info = catalog.define(
        "private_keys.EncryptedPrivateKeyInfo",
        SchemaNode::sequence([
            Component::required("encryptionAlgorithm", &algorithm_identifier),
            Component::required("encryptedData", &octet_string),
        ])?,
    )?;

    catalog.registry(CMS_CONTENT_TYPES).merge_all([
        (ID_CT_KP_ASYMMETRIC_KEY_PACKAGE, key_package),
        (ID_CT_ONE_ASYMMETRIC_KEY, one_asymmetric_key),
        (ID_CT_ENCRYPTED_PRIVATE_KEY_INFO, encrypted_private_key_info),
    ])?;
    Ok(())
}
