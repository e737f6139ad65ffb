//! Certificate request templates and related request attributes.
//!
//! Includes alternative certificate templates for CRMF, templates a CA
//! hands out to describe the request it expects, the private key possession
//! statement and the marker for unsigned certificates.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{CERTIFICATE_ATTRIBUTES, CMS_ATTRIBUTES},
        schema::{constraint::Constraint, value::Value, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "csr_templates",
    depends_on: &["pkix", "cms", "pkcs10", "crmf", "attribute_certificate"],
    load,
};

pub const ID_REG_CTRL_ALT_CERT_TEMPLATE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.7");
pub const ID_AC_TEMPLATE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.7.1");
pub const ID_OPENPGP_CERT_TEMPLATE_EXT: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.5.1.7.2");

pub const ID_AA_CERTIFICATION_REQUEST_INFO_TEMPLATE: Oid =
    Oid::new_unwrap("1.2.840.113549.1.9.16.2.61");
pub const ID_AA_EXTENSION_REQ_TEMPLATE: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.2.62");

pub const ID_AT_STATEMENT_OF_POSSESSION: Oid = Oid::new_unwrap("1.3.6.1.4.1.22112.2.1");

/// Relative distinguished name attribute of an unsigned certificate's issuer.
pub const ID_RDNA_UNSIGNED: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.25.1");
/// Signature algorithm of an unsigned certificate.
pub const ID_ALG_UNSIGNED: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.6.36");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let octet_string = SchemaNode::octet_string();
    let generalized_time = SchemaNode::generalized_time();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let attribute = catalog.schema("pkix.Attribute")?;

    // Alternative CRMF templates.
    let alt_cert_template = catalog.define(
        "csr_templates.AltCertTemplate",
        catalog.schema("crmf.AttributeTypeAndValue")?,
    )?;
    let optional_validity = catalog.define(
        "csr_templates.OptionalAttCertValidity",
        SchemaNode::sequence([
            Component::optional("notBeforeTime", &generalized_time.implicit(0)?),
            Component::optional("notAfterTime", &generalized_time.implicit(1)?),
        ])?
        .constrained(Constraint::union([
            Constraint::present("notBeforeTime"),
            Constraint::present("notAfterTime"),
        ])),
    )?;
    let att_cert_template = catalog.define(
        "csr_templates.AttCertTemplate",
        SchemaNode::sequence([
            Component::optional("version", &integer.implicit(0)?),
            Component::optional(
                "holder",
                &catalog.schema("attribute_certificate.Holder")?.implicit(1)?,
            ),
            Component::optional(
                "issuer",
                &catalog.schema("attribute_certificate.AttCertIssuer")?.implicit(2)?,
            ),
            Component::optional("signature", &algorithm_identifier.implicit(3)?),
            Component::optional("serialNumber", &integer.implicit(4)?),
            Component::optional("attrCertValidityPeriod", &optional_validity.implicit(5)?),
            Component::optional("attributes", &SchemaNode::sequence_of(&attribute).implicit(6)?),
            Component::optional("issuerUniqueID", &bit_string.implicit(7)?),
            Component::optional(
                "extensions",
                &catalog.schema("pkix.Extensions")?.implicit(8)?,
            ),
        ])?,
    )?;
    let openpgp_template = catalog.define(
        "csr_templates.OpenPGPCertTemplateExtended",
        SchemaNode::sequence([
            Component::required("nativeTemplate", &octet_string),
            Component::optional("controls", &catalog.schema("crmf.Controls")?),
        ])?,
    )?;

    // Templates for PKCS #10 requests.
    let single_attribute_template = catalog.define(
        "csr_templates.SingleAttributeTemplate",
        SchemaNode::sequence([
            Component::required("type", &oid),
            Component::optional(
                "value",
                &SchemaNode::any().bound_to("type", CERTIFICATE_ATTRIBUTES),
            ),
        ])?,
    )?;
    let rdn_template = SchemaNode::set_of(&single_attribute_template)
        .constrained(Constraint::non_empty());
    let name_template = catalog.define(
        "csr_templates.NameTemplate",
        SchemaNode::choice([Component::required(
            "rdnSequence",
            &SchemaNode::sequence_of(&rdn_template),
        )])?,
    )?;
    let key_info_template = catalog.define(
        "csr_templates.SubjectPublicKeyInfoTemplate",
        SchemaNode::sequence([
            Component::required("algorithm", &algorithm_identifier),
            Component::optional("subjectPublicKey", &bit_string),
        ])?,
    )?;
    let request_info_template = catalog.define(
        "csr_templates.CertificationRequestInfoTemplate",
        SchemaNode::sequence([
            Component::required("version", &integer),
            Component::optional("subject", &name_template),
            Component::optional("subjectPKInfo", &key_info_template.implicit(0)?),
            Component::required(
                "attributes",
                &SchemaNode::set_of(&attribute)
                    .constrained(Constraint::non_empty())
                    .implicit(1)?,
            ),
        ])?,
    )?;
    let extension_template = catalog.define(
        "csr_templates.ExtensionTemplate",
        SchemaNode::sequence([
            Component::required("extnID", &oid),
            Component::defaulted("critical", &SchemaNode::boolean(), Value::Boolean(false)),
            Component::optional("extnValue", &octet_string),
        ])?,
    )?;
    let extension_templates = catalog.define(
        "csr_templates.ExtensionReqTemplate",
        SchemaNode::sequence_of(&extension_template).constrained(Constraint::non_empty()),
    )?;

    let statement = catalog.define(
        "csr_templates.PrivateKeyPossessionStatement",
        SchemaNode::sequence([
            Component::required("signer", &catalog.schema("cms.IssuerAndSerialNumber")?),
            Component::optional("cert", &catalog.schema("pkix.Certificate")?),
        ])?,
    )?;
    let empty = catalog.define(
        "csr_templates.EmptyUTF8String",
        SchemaNode::utf8_string().constrained(Constraint::fixed_size(0)),
    )?;

    catalog.registry(CMS_ATTRIBUTES).merge_all([
        (ID_REG_CTRL_ALT_CERT_TEMPLATE, alt_cert_template),
        (ID_AC_TEMPLATE, att_cert_template),
        (ID_OPENPGP_CERT_TEMPLATE_EXT, openpgp_template),
    ])?;
    catalog.registry(CERTIFICATE_ATTRIBUTES).merge_all([
        (ID_AA_CERTIFICATION_REQUEST_INFO_TEMPLATE, request_info_template),
        (ID_AA_EXTENSION_REQ_TEMPLATE, extension_templates),
        (ID_AT_STATEMENT_OF_POSSESSION, statement),
        (ID_RDNA_UNSIGNED, empty),
    ])?;
    Ok(())
}
