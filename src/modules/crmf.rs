//! Certificate Request Message Format.
//!
//! Registration controls and registration info share the `cmsAttributes`
//! registry with CMS attributes: both are selected by the `type` of an
//! `AttributeTypeAndValue`.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::CMS_ATTRIBUTES,
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "crmf",
    depends_on: &["pkix", "cms"],
    load,
};

/// Registration controls, `id-regCtrl`.
pub const ID_REG_CTRL: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1");
pub const ID_REG_CTRL_REG_TOKEN: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.1");
pub const ID_REG_CTRL_AUTHENTICATOR: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.2");
pub const ID_REG_CTRL_PKI_PUBLICATION_INFO: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.3");
pub const ID_REG_CTRL_PKI_ARCHIVE_OPTIONS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.4");
pub const ID_REG_CTRL_OLD_CERT_ID: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.5");
pub const ID_REG_CTRL_PROTOCOL_ENCR_KEY: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.6");
/// Registration info, `id-regInfo`.
pub const ID_REG_INFO: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.2");
pub const ID_REG_INFO_UTF8_PAIRS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.2.1");
pub const ID_REG_INFO_CERT_REQ: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.2.2");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let octet_string = SchemaNode::octet_string();
    let utf8 = SchemaNode::utf8_string();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let name = catalog.schema("pkix.Name")?;
    let time = catalog.schema("pkix.Time")?;
    let general_name = catalog.schema("pkix.GeneralName")?;
    let subject_public_key_info = catalog.schema("pkix.SubjectPublicKeyInfo")?;
    let unique_identifier = catalog.schema("pkix.UniqueIdentifier")?;
    let extensions = catalog.schema("pkix.Extensions")?;
    let enveloped_data = catalog.schema("cms.EnvelopedData")?;

    let attribute_type_and_value = catalog.define(
        "crmf.AttributeTypeAndValue",
        SchemaNode::sequence([
            Component::required("type", &oid),
            Component::required(
                "value",
                &SchemaNode::any().bound_to("type", CMS_ATTRIBUTES),
            ),
        ])?,
    )?;
    let controls = catalog.define(
        "crmf.Controls",
        SchemaNode::sequence_of(&attribute_type_and_value).constrained(Constraint::non_empty()),
    )?;
    let optional_validity = catalog.define(
        "crmf.OptionalValidity",
        SchemaNode::sequence([
            Component::optional("notBefore", &time.explicit(0)?),
            Component::optional("notAfter", &time.explicit(1)?),
        ])?,
    )?;
    let cert_template = catalog.define(
        "crmf.CertTemplate",
        SchemaNode::sequence([
            Component::optional("version", &catalog.schema("pkix.Version")?.implicit(0)?),
            Component::optional("serialNumber", &integer.implicit(1)?),
            Component::optional("signingAlg", &algorithm_identifier.implicit(2)?),
            Component::optional("issuer", &name.explicit(3)?),
            Component::optional("validity", &optional_validity.implicit(4)?),
            Component::optional("subject", &name.explicit(5)?),
            Component::optional("publicKey", &subject_public_key_info.implicit(6)?),
            Component::optional("issuerUID", &unique_identifier.implicit(7)?),
            Component::optional("subjectUID", &unique_identifier.implicit(8)?),
            Component::optional("extensions", &extensions.implicit(9)?),
        ])?,
    )?;
    let cert_request = catalog.define(
        "crmf.CertRequest",
        SchemaNode::sequence([
            Component::required("certReqId", &integer),
            Component::required("certTemplate", &cert_template),
            Component::optional("controls", &controls),
        ])?,
    )?;

    let pk_mac_value = catalog.define(
        "crmf.PKMACValue",
        SchemaNode::sequence([
            Component::required("algId", &algorithm_identifier),
            Component::required("value", &bit_string),
        ])?,
    )?;
    let auth_info = SchemaNode::choice([
        Component::required("sender", &general_name.explicit(0)?),
        Component::required("publicKeyMAC", &pk_mac_value),
    ])?;
    let popo_signing_key_input = catalog.define(
        "crmf.POPOSigningKeyInput",
        SchemaNode::sequence([
            Component::required("authInfo", &auth_info),
            Component::required("publicKey", &subject_public_key_info),
        ])?,
    )?;
    let popo_signing_key = catalog.define(
        "crmf.POPOSigningKey",
        SchemaNode::sequence([
            Component::optional("poposkInput", &popo_signing_key_input.implicit(0)?),
            Component::required("algorithmIdentifier", &algorithm_identifier),
            Component::required("signature", &bit_string),
        ])?,
    )?;
    let popo_priv_key = catalog.define(
        "crmf.POPOPrivKey",
        SchemaNode::choice([
            Component::required("thisMessage", &bit_string.implicit(0)?),
            Component::required("subsequentMessage", &integer.implicit(1)?),
            Component::required("dhMAC", &bit_string.implicit(2)?),
            Component::required("agreeMAC", &pk_mac_value.implicit(3)?),
            Component::required("encryptedKey", &enveloped_data.implicit(4)?),
        ])?,
    )?;
    let proof_of_possession = catalog.define(
        "crmf.ProofOfPossession",
        SchemaNode::choice([
            Component::required("raVerified", &SchemaNode::null().implicit(0)?),
            Component::required("signature", &popo_signing_key.implicit(1)?),
            Component::required("keyEncipherment", &popo_priv_key.explicit(2)?),
            Component::required("keyAgreement", &popo_priv_key.explicit(3)?),
        ])?,
    )?;
    let cert_req_msg = catalog.define(
        "crmf.CertReqMsg",
        SchemaNode::sequence([
            Component::required("certReq", &cert_request),
            Component::optional("popo", &proof_of_possession),
            Component::optional(
                "regInfo",
                &SchemaNode::sequence_of(&attribute_type_and_value)
                    .constrained(Constraint::non_empty()),
            ),
        ])?,
    )?;
    catalog.define(
        "crmf.CertReqMessages",
        SchemaNode::sequence_of(&cert_req_msg).constrained(Constraint::non_empty()),
    )?;

    let encrypted_value = catalog.define(
        "crmf.EncryptedValue",
        SchemaNode::sequence([
            Component::optional("intendedAlg", &algorithm_identifier.implicit(0)?),
            Component::optional("symmAlg", &algorithm_identifier.implicit(1)?),
            Component::optional("encSymmKey", &bit_string.implicit(2)?),
            Component::optional("keyAlg", &algorithm_identifier.implicit(3)?),
            Component::optional("valueHint", &octet_string.implicit(4)?),
            Component::required("encValue", &bit_string),
        ])?,
    )?;
    let encrypted_key = catalog.define(
        "crmf.EncryptedKey",
        SchemaNode::choice([
            Component::required("encryptedValue", &encrypted_value),
            Component::required("envelopedData", &enveloped_data.implicit(0)?),
        ])?,
    )?;
    let pki_archive_options = catalog.define(
        "crmf.PKIArchiveOptions",
        SchemaNode::choice([
            Component::required("encryptedPrivKey", &encrypted_key.explicit(0)?),
            Component::required("keyGenParameters", &octet_string.implicit(1)?),
            Component::required("archiveRemGenPrivKey", &SchemaNode::boolean().implicit(2)?),
        ])?,
    )?;
    let single_pub_info = SchemaNode::sequence([
        Component::required("pubMethod", &integer),
        Component::optional("pubLocation", &general_name),
    ])?;
    let pki_publication_info = catalog.define(
        "crmf.PKIPublicationInfo",
        SchemaNode::sequence([
            Component::required("action", &integer),
            Component::optional(
                "pubInfos",
                &SchemaNode::sequence_of(&single_pub_info).constrained(Constraint::non_empty()),
            ),
        ])?,
    )?;
    let cert_id = catalog.define(
        "crmf.CertId",
        SchemaNode::sequence([
            Component::required("issuer", &general_name),
            Component::required("serialNumber", &integer),
        ])?,
    )?;

    catalog.registry(CMS_ATTRIBUTES).merge_all([
        (ID_REG_CTRL_REG_TOKEN, utf8.clone()),
        (ID_REG_CTRL_AUTHENTICATOR, utf8.clone()),
        (ID_REG_CTRL_PKI_PUBLICATION_INFO, pki_publication_info),
        (ID_REG_CTRL_PKI_ARCHIVE_OPTIONS, pki_archive_options),
        (ID_REG_CTRL_OLD_CERT_ID, cert_id),
        (ID_REG_CTRL_PROTOCOL_ENCR_KEY, subject_public_key_info),
        (ID_REG_INFO_UTF8_PAIRS, utf8),
        (ID_REG_INFO_CERT_REQ, cert_request),
    ])?;
    Ok(())
}
