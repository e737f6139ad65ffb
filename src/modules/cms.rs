//! Cryptographic Message Syntax.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{CMS_ATTRIBUTES, CMS_CONTENT_TYPES, OTHER_RECIPIENT_INFO, SMIME_CAPABILITIES},
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "cms",
    depends_on: &["pkix"],
    load,
};

pub const ID_DATA: Oid = Oid::new_unwrap("1.2.840.113549.1.7.1");
pub const ID_SIGNED_DATA: Oid = Oid::new_unwrap("1.2.840.113549.1.7.2");
pub const ID_ENVELOPED_DATA: Oid = Oid::new_unwrap("1.2.840.113549.1.7.3");
pub const ID_DIGESTED_DATA: Oid = Oid::new_unwrap("1.2.840.113549.1.7.5");
pub const ID_ENCRYPTED_DATA: Oid = Oid::new_unwrap("1.2.840.113549.1.7.6");

pub const ID_CONTENT_TYPE: Oid = Oid::new_unwrap("1.2.840.113549.1.9.3");
pub const ID_MESSAGE_DIGEST: Oid = Oid::new_unwrap("1.2.840.113549.1.9.4");
pub const ID_SIGNING_TIME: Oid = Oid::new_unwrap("1.2.840.113549.1.9.5");
pub const ID_COUNTERSIGNATURE: Oid = Oid::new_unwrap("1.2.840.113549.1.9.6");
pub const ID_SMIME_CAPABILITIES: Oid = Oid::new_unwrap("1.2.840.113549.1.9.15");

/// S/MIME arc, `id-smime`.
pub const ID_SMIME: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16");
/// Content types, `id-ct`.
pub const ID_CT: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.1");
/// Attributes, `id-aa`.
pub const ID_AA: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.2");
/// Algorithms, `id-alg`.
pub const ID_ALG: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3");
/// Other recipient info types, `id-ori`.
pub const ID_ORI: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.13");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let octet_string = SchemaNode::octet_string();
    let bit_string = SchemaNode::bit_string();
    let generalized_time = SchemaNode::generalized_time();
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;
    let name = catalog.schema("pkix.Name")?;
    let certificate = catalog.schema("pkix.Certificate")?;
    let certificate_list = catalog.schema("pkix.CertificateList")?;
    let key_identifier = catalog.schema("pkix.KeyIdentifier")?;
    let time = catalog.schema("pkix.Time")?;

    let version = catalog.define("cms.CMSVersion", integer.clone())?;
    catalog.define(
        "cms.ContentInfo",
        SchemaNode::sequence([
            Component::required("contentType", &oid),
            Component::required(
                "content",
                &SchemaNode::any()
                    .explicit(0)?
                    .bound_to("contentType", CMS_CONTENT_TYPES),
            ),
        ])?,
    )?;
    let attribute = catalog.define(
        "cms.Attribute",
        SchemaNode::sequence([
            Component::required("attrType", &oid),
            Component::required(
                "attrValues",
                &SchemaNode::set_of(&SchemaNode::any()).bound_to("attrType", CMS_ATTRIBUTES),
            ),
        ])?,
    )?;
    let attributes = SchemaNode::set_of(&attribute).constrained(Constraint::non_empty());
    let issuer_and_serial_number = catalog.define(
        "cms.IssuerAndSerialNumber",
        SchemaNode::sequence([
            Component::required("issuer", &name),
            Component::required("serialNumber", &integer),
        ])?,
    )?;
    let signer_identifier = catalog.define(
        "cms.SignerIdentifier",
        SchemaNode::choice([
            Component::required("issuerAndSerialNumber", &issuer_and_serial_number),
            Component::required("subjectKeyIdentifier", &key_identifier.implicit(0)?),
        ])?,
    )?;
    let signer_info = catalog.define(
        "cms.SignerInfo",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("sid", &signer_identifier),
            Component::required("digestAlgorithm", &algorithm_identifier),
            Component::optional("signedAttrs", &attributes.implicit(0)?),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signature", &octet_string),
            Component::optional("unsignedAttrs", &attributes.implicit(1)?),
        ])?,
    )?;
    let encapsulated_content_info = catalog.define(
        "cms.EncapsulatedContentInfo",
        SchemaNode::sequence([
            Component::required("eContentType", &oid),
            Component::optional(
                "eContent",
                &octet_string
                    .explicit(0)?
                    .bound_to("eContentType", CMS_CONTENT_TYPES),
            ),
        ])?,
    )?;

    // Certificate formats other than X.509 are kept as raw components.
    let raw_sequence = SchemaNode::sequence_of(&SchemaNode::any());
    let other_certificate_format = SchemaNode::sequence([
        Component::required("otherCertFormat", &oid),
        Component::required("otherCert", &SchemaNode::any()),
    ])?;
    let certificate_choices = catalog.define(
        "cms.CertificateChoices",
        SchemaNode::choice([
            Component::required("certificate", &certificate),
            Component::required("extendedCertificate", &raw_sequence.implicit(0)?),
            Component::required("v1AttrCert", &raw_sequence.implicit(1)?),
            Component::required("v2AttrCert", &raw_sequence.implicit(2)?),
            Component::required("other", &other_certificate_format.implicit(3)?),
        ])?,
    )?;
    let certificate_set = catalog.define(
        "cms.CertificateSet",
        SchemaNode::set_of(&certificate_choices),
    )?;
    let other_revocation_info_format = SchemaNode::sequence([
        Component::required("otherRevInfoFormat", &oid),
        Component::required("otherRevInfo", &SchemaNode::any()),
    ])?;
    let revocation_info_choice = catalog.define(
        "cms.RevocationInfoChoice",
        SchemaNode::choice([
            Component::required("crl", &certificate_list),
            Component::required("other", &other_revocation_info_format.implicit(1)?),
        ])?,
    )?;
    let revocation_info_choices = catalog.define(
        "cms.RevocationInfoChoices",
        SchemaNode::set_of(&revocation_info_choice),
    )?;

    let signed_data = catalog.define(
        "cms.SignedData",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("digestAlgorithms", &SchemaNode::set_of(&algorithm_identifier)),
            Component::required("encapContentInfo", &encapsulated_content_info),
            Component::optional("certificates", &certificate_set.implicit(0)?),
            Component::optional("crls", &revocation_info_choices.implicit(1)?),
            Component::required("signerInfos", &SchemaNode::set_of(&signer_info)),
        ])?,
    )?;

    // Recipients.
    let recipient_identifier = catalog.define(
        "cms.RecipientIdentifier",
        SchemaNode::choice([
            Component::required("issuerAndSerialNumber", &issuer_and_serial_number),
            Component::required("subjectKeyIdentifier", &key_identifier.implicit(0)?),
        ])?,
    )?;
    let key_trans_recipient_info = catalog.define(
        "cms.KeyTransRecipientInfo",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("rid", &recipient_identifier),
            Component::required("keyEncryptionAlgorithm", &algorithm_identifier),
            Component::required("encryptedKey", &octet_string),
        ])?,
    )?;
    let other_key_attribute = catalog.define(
        "cms.OtherKeyAttribute",
        SchemaNode::sequence([
            Component::required("keyAttrId", &oid),
            Component::optional("keyAttr", &SchemaNode::any()),
        ])?,
    )?;
    let originator_public_key = SchemaNode::sequence([
        Component::required("algorithm", &algorithm_identifier),
        Component::required("publicKey", &bit_string),
    ])?;
    let originator = catalog.define(
        "cms.OriginatorIdentifierOrKey",
        SchemaNode::choice([
            Component::required("issuerAndSerialNumber", &issuer_and_serial_number),
            Component::required("subjectKeyIdentifier", &key_identifier.implicit(0)?),
            Component::required("originatorKey", &originator_public_key.implicit(1)?),
        ])?,
    )?;
    let recipient_key_identifier = SchemaNode::sequence([
        Component::required("subjectKeyIdentifier", &key_identifier),
        Component::optional("date", &generalized_time),
        Component::optional("other", &other_key_attribute),
    ])?;
    let key_agree_recipient_identifier = SchemaNode::choice([
        Component::required("issuerAndSerialNumber", &issuer_and_serial_number),
        Component::required("rKeyId", &recipient_key_identifier.implicit(0)?),
    ])?;
    let recipient_encrypted_key = SchemaNode::sequence([
        Component::required("rid", &key_agree_recipient_identifier),
        Component::required("encryptedKey", &octet_string),
    ])?;
    let key_agree_recipient_info = catalog.define(
        "cms.KeyAgreeRecipientInfo",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("originator", &originator.explicit(0)?),
            Component::optional("ukm", &octet_string.explicit(1)?),
            Component::required("keyEncryptionAlgorithm", &algorithm_identifier),
            Component::required(
                "recipientEncryptedKeys",
                &SchemaNode::sequence_of(&recipient_encrypted_key),
            ),
        ])?,
    )?;
    let kek_identifier = SchemaNode::sequence([
        Component::required("keyIdentifier", &octet_string),
        Component::optional("date", &generalized_time),
        Component::optional("other", &other_key_attribute),
    ])?;
    let kek_recipient_info = catalog.define(
        "cms.KEKRecipientInfo",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("kekid", &kek_identifier),
            Component::required("keyEncryptionAlgorithm", &algorithm_identifier),
            Component::required("encryptedKey", &octet_string),
        ])?,
    )?;
    let password_recipient_info = catalog.define(
        "cms.PasswordRecipientInfo",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::optional("keyDerivationAlgorithm", &algorithm_identifier.implicit(0)?),
            Component::required("keyEncryptionAlgorithm", &algorithm_identifier),
            Component::required("encryptedKey", &octet_string),
        ])?,
    )?;
    let other_recipient_info = catalog.define(
        "cms.OtherRecipientInfo",
        SchemaNode::sequence([
            Component::required("oriType", &oid),
            Component::required(
                "oriValue",
                &SchemaNode::any().bound_to("oriType", OTHER_RECIPIENT_INFO),
            ),
        ])?,
    )?;
    let recipient_info = catalog.define(
        "cms.RecipientInfo",
        SchemaNode::choice([
            Component::required("ktri", &key_trans_recipient_info),
            Component::required("kari", &key_agree_recipient_info.implicit(1)?),
            Component::required("kekri", &kek_recipient_info.implicit(2)?),
            Component::required("pwri", &password_recipient_info.implicit(3)?),
            Component::required("ori", &other_recipient_info.implicit(4)?),
        ])?,
    )?;
    let originator_info = catalog.define(
        "cms.OriginatorInfo",
        SchemaNode::sequence([
            Component::optional("certs", &certificate_set.implicit(0)?),
            Component::optional("crls", &revocation_info_choices.implicit(1)?),
        ])?,
    )?;
    let encrypted_content_info = catalog.define(
        "cms.EncryptedContentInfo",
        SchemaNode::sequence([
            Component::required("contentType", &oid),
            Component::required("contentEncryptionAlgorithm", &algorithm_identifier),
            Component::optional("encryptedContent", &octet_string.implicit(0)?),
        ])?,
    )?;
    let enveloped_data = catalog.define(
        "cms.EnvelopedData",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::optional("originatorInfo", &originator_info.implicit(0)?),
            Component::required(
                "recipientInfos",
                &SchemaNode::set_of(&recipient_info).constrained(Constraint::non_empty()),
            ),
            Component::required("encryptedContentInfo", &encrypted_content_info),
            Component::optional("unprotectedAttrs", &attributes.implicit(1)?),
        ])?,
    )?;
    let digested_data = catalog.define(
        "cms.DigestedData",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("digestAlgorithm", &algorithm_identifier),
            Component::required("encapContentInfo", &encapsulated_content_info),
            Component::required("digest", &octet_string),
        ])?,
    )?;
    let encrypted_data = catalog.define(
        "cms.EncryptedData",
        SchemaNode::sequence([
            Component::required("version", &version),
            Component::required("encryptedContentInfo", &encrypted_content_info),
            Component::optional("unprotectedAttrs", &attributes.implicit(1)?),
        ])?,
    )?;

    let smime_capability = catalog.define(
        "cms.SMIMECapability",
        SchemaNode::sequence([
            Component::required("capabilityID", &oid),
            Component::optional(
                "parameters",
                &SchemaNode::any().bound_to("capabilityID", SMIME_CAPABILITIES),
            ),
        ])?,
    )?;
    let smime_capabilities = catalog.define(
        "cms.SMIMECapabilities",
        SchemaNode::sequence_of(&smime_capability),
    )?;

    // Plain `id-data` content is not DER and stays as octets.
    catalog.registry(CMS_CONTENT_TYPES).merge_all([
        (ID_SIGNED_DATA, signed_data),
        (ID_ENVELOPED_DATA, enveloped_data),
        (ID_DIGESTED_DATA, digested_data),
        (ID_ENCRYPTED_DATA, encrypted_data),
    ])?;
    catalog.registry(CMS_ATTRIBUTES).merge_all([
        (ID_CONTENT_TYPE, oid),
        (ID_MESSAGE_DIGEST, octet_string),
        (ID_SIGNING_TIME, time),
        (ID_COUNTERSIGNATURE, SchemaNode::deferred("cms.SignerInfo")),
        (ID_SMIME_CAPABILITIES, smime_capabilities),
    ])?;
    Ok(())
}
