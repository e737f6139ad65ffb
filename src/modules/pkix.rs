//! Internet X.509 certificates and CRLs.
//!
//! Covers the certificate and CRL structures, names, the standard extensions
//! and the directory attributes used in distinguished names. Algorithm
//! parameters are registered for the RSA family, EC public keys and the SHA
//! hashes; everything else stays raw until another module registers it.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::{Result, SchemaDefinitionError},
        oid::Oid,
        registry::{
            ALGORITHM_IDENTIFIERS, CERTIFICATE_ATTRIBUTES, CERTIFICATE_EXTENSIONS, OTHER_NAMES,
        },
        schema::{constraint::Constraint, value::Value, Component, Schema, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "pkix",
    depends_on: &[],
    load,
};

pub const ID_PKIX: Oid = Oid::new_unwrap("1.3.6.1.5.5.7");
pub const ID_PE: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1");
pub const ID_KP: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.3");
pub const ID_AD: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.48");

pub const ID_PE_AUTHORITY_INFO_ACCESS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.1");
pub const ID_PE_SUBJECT_INFO_ACCESS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.11");
pub const ID_CE_SUBJECT_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.14");
pub const ID_CE_KEY_USAGE: Oid = Oid::new_unwrap("2.5.29.15");
pub const ID_CE_SUBJECT_ALT_NAME: Oid = Oid::new_unwrap("2.5.29.17");
pub const ID_CE_ISSUER_ALT_NAME: Oid = Oid::new_unwrap("2.5.29.18");
pub const ID_CE_BASIC_CONSTRAINTS: Oid = Oid::new_unwrap("2.5.29.19");
pub const ID_CE_CRL_NUMBER: Oid = Oid::new_unwrap("2.5.29.20");
pub const ID_CE_CRL_REASONS: Oid = Oid::new_unwrap("2.5.29.21");
pub const ID_CE_CRL_DISTRIBUTION_POINTS: Oid = Oid::new_unwrap("2.5.29.31");
pub const ID_CE_CERTIFICATE_POLICIES: Oid = Oid::new_unwrap("2.5.29.32");
pub const ID_CE_AUTHORITY_KEY_IDENTIFIER: Oid = Oid::new_unwrap("2.5.29.35");
pub const ID_CE_EXT_KEY_USAGE: Oid = Oid::new_unwrap("2.5.29.37");

pub const ID_AT_COMMON_NAME: Oid = Oid::new_unwrap("2.5.4.3");
pub const ID_AT_SURNAME: Oid = Oid::new_unwrap("2.5.4.4");
pub const ID_AT_SERIAL_NUMBER: Oid = Oid::new_unwrap("2.5.4.5");
pub const ID_AT_COUNTRY_NAME: Oid = Oid::new_unwrap("2.5.4.6");
pub const ID_AT_LOCALITY_NAME: Oid = Oid::new_unwrap("2.5.4.7");
pub const ID_AT_STATE_OR_PROVINCE_NAME: Oid = Oid::new_unwrap("2.5.4.8");
pub const ID_AT_ORGANIZATION_NAME: Oid = Oid::new_unwrap("2.5.4.10");
pub const ID_AT_ORGANIZATIONAL_UNIT_NAME: Oid = Oid::new_unwrap("2.5.4.11");
pub const ID_AT_TITLE: Oid = Oid::new_unwrap("2.5.4.12");
pub const ID_AT_NAME: Oid = Oid::new_unwrap("2.5.4.41");
pub const ID_AT_GIVEN_NAME: Oid = Oid::new_unwrap("2.5.4.42");
pub const ID_AT_INITIALS: Oid = Oid::new_unwrap("2.5.4.43");
pub const ID_AT_GENERATION_QUALIFIER: Oid = Oid::new_unwrap("2.5.4.44");
pub const ID_AT_DN_QUALIFIER: Oid = Oid::new_unwrap("2.5.4.46");
pub const ID_AT_PSEUDONYM: Oid = Oid::new_unwrap("2.5.4.65");
pub const ID_DOMAIN_COMPONENT: Oid = Oid::new_unwrap("0.9.2342.19200300.100.1.25");
pub const ID_EMAIL_ADDRESS: Oid = Oid::new_unwrap("1.2.840.113549.1.9.1");

pub const RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.1");
pub const MD2_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.2");
pub const MD5_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.4");
pub const SHA1_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.5");
pub const SHA256_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.11");
pub const SHA384_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.12");
pub const SHA512_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.13");
pub const SHA224_WITH_RSA_ENCRYPTION: Oid = Oid::new_unwrap("1.2.840.113549.1.1.14");
pub const ID_EC_PUBLIC_KEY: Oid = Oid::new_unwrap("1.2.840.10045.2.1");
pub const ID_SHA1: Oid = Oid::new_unwrap("1.3.14.3.2.26");
pub const ID_SHA256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.1");
pub const ID_SHA384: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.2");
pub const ID_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.3");
pub const ID_SHA224: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.4");

/// Upper bounds of the X.520 attribute syntaxes.
const UB_NAME: u64 = 32768;
const UB_COMMON_NAME: u64 = 64;
const UB_LOCALITY_NAME: u64 = 128;
const UB_STATE_NAME: u64 = 128;
const UB_ORGANIZATION_NAME: u64 = 64;
const UB_ORGANIZATIONAL_UNIT_NAME: u64 = 64;
const UB_TITLE: u64 = 64;
const UB_SERIAL_NUMBER: u64 = 64;
const UB_PSEUDONYM: u64 = 128;
const UB_EMAIL_ADDRESS: u64 = 255;

/// `DirectoryString` with every alternative limited to `SIZE(1..upper)`.
///
/// `universalString` is not supported.
pub fn directory_string(upper: u64) -> Result<Schema, SchemaDefinitionError> {
    let size = Constraint::size(1..=upper)?;
    SchemaNode::choice([
        Component::required(
            "teletexString",
            &SchemaNode::teletex_string().constrained(size.clone()),
        ),
        Component::required(
            "printableString",
            &SchemaNode::printable_string().constrained(size.clone()),
        ),
        Component::required(
            "utf8String",
            &SchemaNode::utf8_string().constrained(size.clone()),
        ),
        Component::required("bmpString", &SchemaNode::bmp_string().constrained(size)),
    ])
}

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let oid = SchemaNode::object_identifier();
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let octet_string = SchemaNode::octet_string();
    let boolean = SchemaNode::boolean();
    let ia5 = SchemaNode::ia5_string();
    let null = SchemaNode::null();

    let algorithm_identifier = catalog.define(
        "pkix.AlgorithmIdentifier",
        SchemaNode::sequence([
            Component::required("algorithm", &oid),
            Component::optional(
                "parameters",
                &SchemaNode::any().bound_to("algorithm", ALGORITHM_IDENTIFIERS),
            ),
        ])?,
    )?;

    // Names.
    let directory = catalog.define("pkix.DirectoryString", directory_string(UB_NAME)?)?;
    let attribute_type_and_value = catalog.define(
        "pkix.AttributeTypeAndValue",
        SchemaNode::sequence([
            Component::required("type", &oid),
            Component::required(
                "value",
                &SchemaNode::any().bound_to("type", CERTIFICATE_ATTRIBUTES),
            ),
        ])?,
    )?;
    let rdn = catalog.define(
        "pkix.RelativeDistinguishedName",
        SchemaNode::set_of(&attribute_type_and_value).constrained(Constraint::non_empty()),
    )?;
    let rdn_sequence = catalog.define("pkix.RDNSequence", SchemaNode::sequence_of(&rdn))?;
    let name = catalog.define(
        "pkix.Name",
        SchemaNode::choice([Component::required("rdnSequence", &rdn_sequence)])?,
    )?;
    catalog.define(
        "pkix.Attribute",
        SchemaNode::sequence([
            Component::required("type", &oid),
            Component::required(
                "values",
                &SchemaNode::set_of(&SchemaNode::any()).bound_to("type", CERTIFICATE_ATTRIBUTES),
            ),
        ])?,
    )?;

    let another_name = catalog.define(
        "pkix.AnotherName",
        SchemaNode::sequence([
            Component::required("type-id", &oid),
            Component::required(
                "value",
                &SchemaNode::any()
                    .explicit(0)?
                    .bound_to("type-id", OTHER_NAMES),
            ),
        ])?,
    )?;
    let edi_party_name = catalog.define(
        "pkix.EDIPartyName",
        SchemaNode::sequence([
            Component::optional("nameAssigner", &directory.implicit(0)?),
            Component::required("partyName", &directory.implicit(1)?),
        ])?,
    )?;
    let general_name = catalog.define(
        "pkix.GeneralName",
        SchemaNode::choice([
            Component::required("otherName", &another_name.implicit(0)?),
            Component::required("rfc822Name", &ia5.implicit(1)?),
            Component::required("dNSName", &ia5.implicit(2)?),
            // ORAddress is kept as its raw components.
            Component::required(
                "x400Address",
                &SchemaNode::sequence_of(&SchemaNode::any()).implicit(3)?,
            ),
            Component::required("directoryName", &name.explicit(4)?),
            Component::required("ediPartyName", &edi_party_name.implicit(5)?),
            Component::required("uniformResourceIdentifier", &ia5.implicit(6)?),
            Component::required("iPAddress", &octet_string.implicit(7)?),
            Component::required("registeredID", &oid.implicit(8)?),
        ])?,
    )?;
    let general_names = catalog.define(
        "pkix.GeneralNames",
        SchemaNode::sequence_of(&general_name).constrained(Constraint::non_empty()),
    )?;

    // Certificates and CRLs.
    let time = catalog.define(
        "pkix.Time",
        SchemaNode::choice([
            Component::required("utcTime", &SchemaNode::utc_time()),
            Component::required("generalTime", &SchemaNode::generalized_time()),
        ])?,
    )?;
    let validity = catalog.define(
        "pkix.Validity",
        SchemaNode::sequence([
            Component::required("notBefore", &time),
            Component::required("notAfter", &time),
        ])?,
    )?;
    let subject_public_key_info = catalog.define(
        "pkix.SubjectPublicKeyInfo",
        SchemaNode::sequence([
            Component::required("algorithm", &algorithm_identifier),
            Component::required("subjectPublicKey", &bit_string),
        ])?,
    )?;
    let extension = catalog.define(
        "pkix.Extension",
        SchemaNode::sequence([
            Component::required("extnID", &oid),
            Component::defaulted("critical", &boolean, Value::Boolean(false)),
            Component::required(
                "extnValue",
                &octet_string.bound_to("extnID", CERTIFICATE_EXTENSIONS),
            ),
        ])?,
    )?;
    let extensions = catalog.define(
        "pkix.Extensions",
        SchemaNode::sequence_of(&extension).constrained(Constraint::non_empty()),
    )?;
    let version = catalog.define("pkix.Version", integer.clone())?;
    let unique_identifier = catalog.define("pkix.UniqueIdentifier", bit_string.clone())?;
    let tbs_certificate = catalog.define(
        "pkix.TBSCertificate",
        SchemaNode::sequence([
            Component::defaulted("version", &version.explicit(0)?, Value::integer(0)?),
            Component::required("serialNumber", &integer),
            Component::required("signature", &algorithm_identifier),
            Component::required("issuer", &name),
            Component::required("validity", &validity),
            Component::required("subject", &name),
            Component::required("subjectPublicKeyInfo", &subject_public_key_info),
            Component::optional("issuerUniqueID", &unique_identifier.implicit(1)?),
            Component::optional("subjectUniqueID", &unique_identifier.implicit(2)?),
            Component::optional("extensions", &extensions.explicit(3)?),
        ])?,
    )?;
    catalog.define(
        "pkix.Certificate",
        SchemaNode::sequence([
            Component::required("tbsCertificate", &tbs_certificate),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signature", &bit_string),
        ])?,
    )?;
    let revoked_certificate = SchemaNode::sequence([
        Component::required("userCertificate", &integer),
        Component::required("revocationDate", &time),
        Component::optional("crlEntryExtensions", &extensions),
    ])?;
    let tbs_cert_list = catalog.define(
        "pkix.TBSCertList",
        SchemaNode::sequence([
            Component::optional("version", &version),
            Component::required("signature", &algorithm_identifier),
            Component::required("issuer", &name),
            Component::required("thisUpdate", &time),
            Component::optional("nextUpdate", &time),
            Component::optional(
                "revokedCertificates",
                &SchemaNode::sequence_of(&revoked_certificate),
            ),
            Component::optional("crlExtensions", &extensions.explicit(0)?),
        ])?,
    )?;
    catalog.define(
        "pkix.CertificateList",
        SchemaNode::sequence([
            Component::required("tbsCertList", &tbs_cert_list),
            Component::required("signatureAlgorithm", &algorithm_identifier),
            Component::required("signatureValue", &bit_string),
        ])?,
    )?;

    // Extensions.
    let key_identifier = catalog.define("pkix.KeyIdentifier", octet_string.clone())?;
    let authority_key_identifier = catalog.define(
        "pkix.AuthorityKeyIdentifier",
        SchemaNode::sequence([
            Component::optional("keyIdentifier", &key_identifier.implicit(0)?),
            Component::optional("authorityCertIssuer", &general_names.implicit(1)?),
            Component::optional("authorityCertSerialNumber", &integer.implicit(2)?),
        ])?,
    )?;
    let key_usage = catalog.define("pkix.KeyUsage", bit_string.clone())?;
    let basic_constraints = catalog.define(
        "pkix.BasicConstraints",
        SchemaNode::sequence([
            Component::defaulted("cA", &boolean, Value::Boolean(false)),
            Component::optional(
                "pathLenConstraint",
                &integer.constrained(Constraint::value(0..)?),
            ),
        ])?,
    )?;
    let ext_key_usage = catalog.define(
        "pkix.ExtKeyUsageSyntax",
        SchemaNode::sequence_of(&oid).constrained(Constraint::non_empty()),
    )?;
    let distribution_point_name = catalog.define(
        "pkix.DistributionPointName",
        SchemaNode::choice([
            Component::required("fullName", &general_names.implicit(0)?),
            Component::required("nameRelativeToCRLIssuer", &rdn.implicit(1)?),
        ])?,
    )?;
    let distribution_point = catalog.define(
        "pkix.DistributionPoint",
        SchemaNode::sequence([
            Component::optional("distributionPoint", &distribution_point_name.implicit(0)?),
            Component::optional("reasons", &bit_string.implicit(1)?),
            Component::optional("cRLIssuer", &general_names.implicit(2)?),
        ])?,
    )?;
    let crl_distribution_points = catalog.define(
        "pkix.CRLDistributionPoints",
        SchemaNode::sequence_of(&distribution_point).constrained(Constraint::non_empty()),
    )?;
    let access_description = catalog.define(
        "pkix.AccessDescription",
        SchemaNode::sequence([
            Component::required("accessMethod", &oid),
            Component::required("accessLocation", &general_name),
        ])?,
    )?;
    let info_access = catalog.define(
        "pkix.AuthorityInfoAccessSyntax",
        SchemaNode::sequence_of(&access_description).constrained(Constraint::non_empty()),
    )?;
    // Policy qualifiers stay raw.
    let policy_qualifier_info = catalog.define(
        "pkix.PolicyQualifierInfo",
        SchemaNode::sequence([
            Component::required("policyQualifierId", &oid),
            Component::required("qualifier", &SchemaNode::any()),
        ])?,
    )?;
    let policy_information = catalog.define(
        "pkix.PolicyInformation",
        SchemaNode::sequence([
            Component::required("policyIdentifier", &oid),
            Component::optional(
                "policyQualifiers",
                &SchemaNode::sequence_of(&policy_qualifier_info).constrained(Constraint::non_empty()),
            ),
        ])?,
    )?;
    let certificate_policies = catalog.define(
        "pkix.CertificatePolicies",
        SchemaNode::sequence_of(&policy_information).constrained(Constraint::non_empty()),
    )?;
    let crl_number = catalog.define(
        "pkix.CRLNumber",
        integer.constrained(Constraint::value(0..)?),
    )?;
    let crl_reason = catalog.define("pkix.CRLReason", SchemaNode::enumerated())?;

    catalog.registry(CERTIFICATE_EXTENSIONS).merge_all([
        (ID_CE_SUBJECT_KEY_IDENTIFIER, key_identifier),
        (ID_CE_AUTHORITY_KEY_IDENTIFIER, authority_key_identifier),
        (ID_CE_KEY_USAGE, key_usage),
        (ID_CE_BASIC_CONSTRAINTS, basic_constraints),
        (ID_CE_EXT_KEY_USAGE, ext_key_usage),
        (ID_CE_SUBJECT_ALT_NAME, general_names.clone()),
        (ID_CE_ISSUER_ALT_NAME, general_names),
        (ID_CE_CRL_DISTRIBUTION_POINTS, crl_distribution_points),
        (ID_CE_CERTIFICATE_POLICIES, certificate_policies),
        (ID_PE_AUTHORITY_INFO_ACCESS, info_access.clone()),
        (ID_PE_SUBJECT_INFO_ACCESS, info_access),
        (ID_CE_CRL_NUMBER, crl_number),
        (ID_CE_CRL_REASONS, crl_reason),
    ])?;

    let printable = SchemaNode::printable_string();
    catalog.registry(CERTIFICATE_ATTRIBUTES).merge_all([
        (ID_AT_NAME, directory),
        (ID_AT_SURNAME, directory_string(UB_NAME)?),
        (ID_AT_GIVEN_NAME, directory_string(UB_NAME)?),
        (ID_AT_INITIALS, directory_string(UB_NAME)?),
        (ID_AT_GENERATION_QUALIFIER, directory_string(UB_NAME)?),
        (ID_AT_COMMON_NAME, directory_string(UB_COMMON_NAME)?),
        (ID_AT_LOCALITY_NAME, directory_string(UB_LOCALITY_NAME)?),
        (ID_AT_STATE_OR_PROVINCE_NAME, directory_string(UB_STATE_NAME)?),
        (ID_AT_ORGANIZATION_NAME, directory_string(UB_ORGANIZATION_NAME)?),
        (
            ID_AT_ORGANIZATIONAL_UNIT_NAME,
            directory_string(UB_ORGANIZATIONAL_UNIT_NAME)?,
        ),
        (ID_AT_TITLE, directory_string(UB_TITLE)?),
        (ID_AT_PSEUDONYM, directory_string(UB_PSEUDONYM)?),
        (ID_AT_COUNTRY_NAME, printable.constrained(Constraint::fixed_size(2))),
        (
            ID_AT_SERIAL_NUMBER,
            printable.constrained(Constraint::size(1..=UB_SERIAL_NUMBER)?),
        ),
        (ID_AT_DN_QUALIFIER, printable),
        (ID_DOMAIN_COMPONENT, ia5.clone()),
        (
            ID_EMAIL_ADDRESS,
            ia5.constrained(Constraint::size(1..=UB_EMAIL_ADDRESS)?),
        ),
    ])?;

    let ec_parameters = catalog.define(
        "pkix.ECParameters",
        SchemaNode::choice([
            Component::required("namedCurve", &oid),
            Component::required("implicitCurve", &null),
        ])?,
    )?;
    let null_parameters = [
        RSA_ENCRYPTION,
        MD2_WITH_RSA_ENCRYPTION,
        MD5_WITH_RSA_ENCRYPTION,
        SHA1_WITH_RSA_ENCRYPTION,
        SHA224_WITH_RSA_ENCRYPTION,
        SHA256_WITH_RSA_ENCRYPTION,
        SHA384_WITH_RSA_ENCRYPTION,
        SHA512_WITH_RSA_ENCRYPTION,
        ID_SHA1,
        ID_SHA224,
        ID_SHA256,
        ID_SHA384,
        ID_SHA512,
    ]
    .map(|oid| (oid, null.clone()));
    let algorithms = catalog.registry(ALGORITHM_IDENTIFIERS);
    algorithms.merge_all(null_parameters)?;
    algorithms.register(ID_EC_PUBLIC_KEY, ec_parameters)?;
    Ok(())
}
