//! Attribute certificates.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        schema::{Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "attribute_certificate",
    depends_on: &["pkix"],
    load,
};

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let generalized_time = SchemaNode::generalized_time();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let general_names = catalog.schema("pkix.GeneralNames")?;
    let unique_identifier = catalog.schema("pkix.UniqueIdentifier")?;

    let issuer_serial = catalog.define(
        "attribute_certificate.IssuerSerial",
        SchemaNode::sequence([
            Component::required("issuer", &general_names),
            Component::required("serial", &integer),
            Component::optional("issuerUID", &unique_identifier),
        ])?,
    )?;
    let object_digest_info = catalog.define(
        "attribute_certificate.ObjectDigestInfo",
        SchemaNode::sequence([
            Component::required("digestedObjectType", &SchemaNode::enumerated()),
            Component::optional("otherObjectTypeID", &SchemaNode::object_identifier()),
            Component::required("digestAlgorithm", &algorithm_identifier),
            Component::required("objectDigest", &bit_string),
        ])?,
    )?;
    let holder = catalog.define(
        "attribute_certificate.Holder",
        SchemaNode::sequence([
            Component::optional("baseCertificateID", &issuer_serial.implicit(0)?),
            Component::optional("entityName", &general_names.implicit(1)?),
            Component::optional("objectDigestInfo", &object_digest_info.implicit(2)?),
        ])?,
    )?;
    let v2_form = catalog.define(
        "attribute_certificate.V2Form",
        SchemaNode::sequence([
            Component::optional("issuerName", &general_names),
            Component::optional("baseCertificateID", &issuer_serial.implicit(0)?),
            Component::optional("objectDigestInfo", &object_digest_info.implicit(1)?),
        ])?,
    )?;
    let issuer = catalog.define(
        "attribute_certificate.AttCertIssuer",
        SchemaNode::choice([
            Component::required("v1Form", &general_names),
            Component::required("v2Form", &v2_form.implicit(0)?),
        ])?,
    )?;
    let validity_period = catalog.define(
        "attribute_certificate.AttCertValidityPeriod",
        SchemaNode::sequence([
            Component::required("notBeforeTime", &generalized_time),
            Component::required("notAfterTime", &generalized_time),
        ])?,
    )?;

    let info = catalog.define(
        "attribute_certificate.AttributeCertificateInfo",
        SchemaNode::sequence([
            Component::required("version", &integer),
            Component::required("holder", &holder),
            Component::required("issuer", &issuer),
            Component::required("signature", &algorithm_identifier),
            Component::required("serialNumber", &integer),
            Component::required("attrCertValidityPeriod", &validity_period),
            Component::required(
                "attributes",
                &SchemaNode::sequence_of(&catalog.schema("pkix.Attribute")?),
            ),
            Component::optional("issuerUniqueID", &unique_identifier),
            Component::optional("extensions", &catalog.schema("pkix.Extensions")?),
        ])?,
    )?;
    catalog.define(
        "attribute_certificate.AttributeCertificate",
        SchemaNode::sequence([
            Component::required("acinfo", &info),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signatureValue", &bit_string),
        ])?,
    )?;
    Ok(())
}
