//! Related certificates for multiple authentications.
//!
//! A certificate can point at a related certificate by hash, and a
//! certification request can carry proof that the requester holds the
//! related certificate.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{CERTIFICATE_ATTRIBUTES, CERTIFICATE_EXTENSIONS},
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "related_certs",
    depends_on: &["pkix", "cms"],
    load,
};

pub const ID_PE_RELATED_CERT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.36");
pub const ID_AA_RELATED_CERT_REQUEST: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.2.60");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let related_certificate = catalog.define(
        "related_certs.RelatedCertificate",
        SchemaNode::sequence([
            Component::required("hashAlgorithm", &catalog.schema("pkix.AlgorithmIdentifier")?),
            Component::required("hashValue", &SchemaNode::octet_string()),
        ])?,
    )?;
    // Seconds since the epoch.
    let binary_time = catalog.define(
        "related_certs.BinaryTime",
        SchemaNode::integer().constrained(Constraint::value(0..)?),
    )?;
    let requester_certificate = catalog.define(
        "related_certs.RequesterCertificate",
        SchemaNode::sequence([
            Component::required("certID", &catalog.schema("cms.IssuerAndSerialNumber")?),
            Component::required("requestTime", &binary_time),
            Component::required(
                "locationInfo",
                &SchemaNode::sequence_of(&SchemaNode::ia5_string())
                    .constrained(Constraint::non_empty()),
            ),
            Component::required("signature", &SchemaNode::bit_string()),
        ])?,
    )?;

    catalog
        .registry(CERTIFICATE_EXTENSIONS)
        .register(ID_PE_RELATED_CERT, related_certificate)?;
    catalog
        .registry(CERTIFICATE_ATTRIBUTES)
        .register(ID_AA_RELATED_CERT_REQUEST, requester_certificate)
}
