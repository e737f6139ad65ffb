//! PKCS #10 certification requests.

use {
    super::{pkix::directory_string, Module},
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::CERTIFICATE_ATTRIBUTES,
        schema::{Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "pkcs10",
    depends_on: &["pkix"],
    load,
};

pub const ID_CHALLENGE_PASSWORD: Oid = Oid::new_unwrap("1.2.840.113549.1.9.7");
pub const ID_EXTENSION_REQUEST: Oid = Oid::new_unwrap("1.2.840.113549.1.9.14");

const UB_CHALLENGE_PASSWORD: u64 = 255;

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let attribute = catalog.schema("pkix.Attribute")?;
    let extensions = catalog.schema("pkix.Extensions")?;

    let info = catalog.define(
        "pkcs10.CertificationRequestInfo",
        SchemaNode::sequence([
            Component::required("version", &SchemaNode::integer()),
            Component::required("subject", &catalog.schema("pkix.Name")?),
            Component::required(
                "subjectPKInfo",
                &catalog.schema("pkix.SubjectPublicKeyInfo")?,
            ),
            Component::required("attributes", &SchemaNode::set_of(&attribute).implicit(0)?),
        ])?,
    )?;
    catalog.define(
        "pkcs10.CertificationRequest",
        SchemaNode::sequence([
            Component::required("certificationRequestInfo", &info),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signature", &SchemaNode::bit_string()),
        ])?,
    )?;

    catalog.registry(CERTIFICATE_ATTRIBUTES).merge_all([
        (ID_EXTENSION_REQUEST, extensions),
        (
            ID_CHALLENGE_PASSWORD,
            directory_string(UB_CHALLENGE_PASSWORD)?,
        ),
    ])?;
    Ok(())
}
