//! Password based key derivation and MAC schemes, HKDF for CMS content
//! encryption keys and the X9.44 key derivation functions.
//!
//! Also carries the SHA-3 based RSA signature and KMAC identifiers. All of
//! them go into both `algorithmIdentifiers` and `smimeCapabilities`.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{ALGORITHM_IDENTIFIERS, SMIME_CAPABILITIES},
        schema::{
            constraint::Constraint,
            value::{OpenValue, Value},
            Component, Schema, SchemaNode,
        },
    },
    std::sync::Arc,
};

pub const MODULE: Module = Module {
    name:       "key_derivation",
    depends_on: &["pkix", "cms"],
    load,
};

pub const PKCS_5: Oid = Oid::new_unwrap("1.2.840.113549.1.5");
pub const ID_PBKDF2: Oid = Oid::new_unwrap("1.2.840.113549.1.5.12");
pub const ID_PBES2: Oid = Oid::new_unwrap("1.2.840.113549.1.5.13");
pub const ID_PBMAC1: Oid = Oid::new_unwrap("1.2.840.113549.1.5.14");

pub const ID_HMAC_WITH_SHA1: Oid = Oid::new_unwrap("1.2.840.113549.2.7");
pub const ID_HMAC_WITH_SHA224: Oid = Oid::new_unwrap("1.2.840.113549.2.8");
pub const ID_HMAC_WITH_SHA256: Oid = Oid::new_unwrap("1.2.840.113549.2.9");
pub const ID_HMAC_WITH_SHA384: Oid = Oid::new_unwrap("1.2.840.113549.2.10");
pub const ID_HMAC_WITH_SHA512: Oid = Oid::new_unwrap("1.2.840.113549.2.11");
pub const ID_HMAC_WITH_SHA512_224: Oid = Oid::new_unwrap("1.2.840.113549.2.12");
pub const ID_HMAC_WITH_SHA512_256: Oid = Oid::new_unwrap("1.2.840.113549.2.13");

pub const ID_ALG_CEK_HKDF_SHA256: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3.31");

/// X9.44 key derivation functions, parameterized by a hash algorithm.
pub const ID_KDF_KDF2: Oid = Oid::new_unwrap("1.3.133.16.840.9.44.1.1");
pub const ID_KDF_KDF3: Oid = Oid::new_unwrap("1.3.133.16.840.9.44.1.2");

pub const ID_RSASSA_PKCS1_V1_5_WITH_SHA3_224: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.13");
pub const ID_RSASSA_PKCS1_V1_5_WITH_SHA3_256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.14");
pub const ID_RSASSA_PKCS1_V1_5_WITH_SHA3_384: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.15");
pub const ID_RSASSA_PKCS1_V1_5_WITH_SHA3_512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.16");
pub const ID_KMAC128: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.21");
pub const ID_KMAC256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.2.22");

const HMACS: [Oid; 7] = [
    ID_HMAC_WITH_SHA1,
    ID_HMAC_WITH_SHA224,
    ID_HMAC_WITH_SHA256,
    ID_HMAC_WITH_SHA384,
    ID_HMAC_WITH_SHA512,
    ID_HMAC_WITH_SHA512_224,
    ID_HMAC_WITH_SHA512_256,
];

/// `algid-hmacWithSHA1`, the PBKDF2 default PRF, as the decoder produces it.
fn hmac_with_sha1(null: &Schema) -> Value {
    Value::sequence([
        ("algorithm", Value::ObjectIdentifier(ID_HMAC_WITH_SHA1)),
        (
            "parameters",
            Value::Open(OpenValue::Resolved {
                schema: Arc::clone(null),
                value:  Box::new(Value::Null),
            }),
        ),
    ])
}

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let null = SchemaNode::null();
    let positive = SchemaNode::integer().constrained(Constraint::value(1..)?);
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;

    let salt = SchemaNode::choice([
        Component::required("specified", &SchemaNode::octet_string()),
        Component::required("otherSource", &algorithm_identifier),
    ])?;
    let pbkdf2_params = catalog.define(
        "key_derivation.PBKDF2-params",
        SchemaNode::sequence([
            Component::required("salt", &salt),
            Component::required("iterationCount", &positive),
            Component::optional("keyLength", &positive),
            Component::defaulted("prf", &algorithm_identifier, hmac_with_sha1(&null)),
        ])?,
    )?;
    let pbes2_params = catalog.define(
        "key_derivation.PBES2-params",
        SchemaNode::sequence([
            Component::required("keyDerivationFunc", &algorithm_identifier),
            Component::required("encryptionScheme", &algorithm_identifier),
        ])?,
    )?;
    let pbmac1_params = catalog.define(
        "key_derivation.PBMAC1-params",
        SchemaNode::sequence([
            Component::required("keyDerivationFunc", &algorithm_identifier),
            Component::required("messageAuthScheme", &algorithm_identifier),
        ])?,
    )?;
    let customization = catalog.define(
        "key_derivation.Customization",
        SchemaNode::octet_string(),
    )?;

    let mut entries = vec![
        (ID_PBKDF2, pbkdf2_params),
        (ID_PBES2, pbes2_params),
        (ID_PBMAC1, pbmac1_params),
        (ID_ALG_CEK_HKDF_SHA256, algorithm_identifier.clone()),
        (ID_KDF_KDF2, algorithm_identifier.clone()),
        (ID_KDF_KDF3, algorithm_identifier),
        (ID_KMAC128, customization.clone()),
        (ID_KMAC256, customization),
    ];
    entries.extend(HMACS.map(|oid| (oid, null.clone())));
    entries.extend(
        [
            ID_RSASSA_PKCS1_V1_5_WITH_SHA3_224,
            ID_RSASSA_PKCS1_V1_5_WITH_SHA3_256,
            ID_RSASSA_PKCS1_V1_5_WITH_SHA3_384,
            ID_RSASSA_PKCS1_V1_5_WITH_SHA3_512,
        ]
        .map(|oid| (oid, null.clone())),
    );

    catalog
        .registry(ALGORITHM_IDENTIFIERS)
        .merge_all(entries.iter().cloned())?;
    catalog.registry(SMIME_CAPABILITIES).merge_all(entries)?;
    Ok(())
}
