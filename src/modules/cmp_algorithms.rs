//! Algorithm parameters used with CMP message protection and key management.
//!
//! Covers the ephemeral-static Diffie-Hellman and elliptic curve key
//! agreement schemes, whose parameter is the key wrap algorithm, together
//! with AES-CBC and AES-GMAC. Digest, signature and EdDSA identifiers of the
//! same profile take no parameters and have nothing to register.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{ALGORITHM_IDENTIFIERS, SMIME_CAPABILITIES},
        schema::{constraint::Constraint, value::Value, Component, Schema, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "cmp_algorithms",
    depends_on: &["pkix", "cms"],
    load,
};

pub const ID_ALG_ESDH: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3.5");

pub const DH_SINGLE_PASS_STD_DH_SHA224KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.11.0");
pub const DH_SINGLE_PASS_STD_DH_SHA256KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.11.1");
pub const DH_SINGLE_PASS_STD_DH_SHA384KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.11.2");
pub const DH_SINGLE_PASS_STD_DH_SHA512KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.11.3");
pub const DH_SINGLE_PASS_COFACTOR_DH_SHA224KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.14.0");
pub const DH_SINGLE_PASS_COFACTOR_DH_SHA256KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.14.1");
pub const DH_SINGLE_PASS_COFACTOR_DH_SHA384KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.14.2");
pub const DH_SINGLE_PASS_COFACTOR_DH_SHA512KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.14.3");
pub const MQV_SINGLE_PASS_SHA224KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.15.0");
pub const MQV_SINGLE_PASS_SHA256KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.15.1");
pub const MQV_SINGLE_PASS_SHA384KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.15.2");
pub const MQV_SINGLE_PASS_SHA512KDF_SCHEME: Oid = Oid::new_unwrap("1.3.132.1.15.3");

pub const AES: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1");
pub const ID_AES128_CBC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.2");
pub const ID_AES192_CBC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.22");
pub const ID_AES256_CBC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.42");
pub const ID_AES128_GMAC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.9");
pub const ID_AES192_GMAC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.29");
pub const ID_AES256_GMAC: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.1.49");

/// Key agreement schemes parameterized by their key wrap algorithm.
pub const KEY_AGREEMENT: [Oid; 13] = [
    ID_ALG_ESDH,
    DH_SINGLE_PASS_STD_DH_SHA224KDF_SCHEME,
    DH_SINGLE_PASS_STD_DH_SHA256KDF_SCHEME,
    DH_SINGLE_PASS_STD_DH_SHA384KDF_SCHEME,
    DH_SINGLE_PASS_STD_DH_SHA512KDF_SCHEME,
    DH_SINGLE_PASS_COFACTOR_DH_SHA224KDF_SCHEME,
    DH_SINGLE_PASS_COFACTOR_DH_SHA256KDF_SCHEME,
    DH_SINGLE_PASS_COFACTOR_DH_SHA384KDF_SCHEME,
    DH_SINGLE_PASS_COFACTOR_DH_SHA512KDF_SCHEME,
    MQV_SINGLE_PASS_SHA224KDF_SCHEME,
    MQV_SINGLE_PASS_SHA256KDF_SCHEME,
    MQV_SINGLE_PASS_SHA384KDF_SCHEME,
    MQV_SINGLE_PASS_SHA512KDF_SCHEME,
];

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let key_wrap_algorithm = catalog.schema("pkix.AlgorithmIdentifier")?;
    let aes_iv = catalog.define(
        "cmp_algorithms.AES-IV",
        SchemaNode::octet_string().constrained(Constraint::fixed_size(16)),
    )?;
    let icv_len = SchemaNode::integer().constrained(Constraint::value(12..=16)?);
    let gcm_parameters = catalog.define(
        "cmp_algorithms.GCMParameters",
        SchemaNode::sequence([
            Component::required("aes-nonce", &SchemaNode::octet_string()),
            Component::defaulted("aes-ICVlen", &icv_len, Value::integer(12)?),
        ])?,
    )?;

    let mut entries: Vec<(Oid, Schema)> = KEY_AGREEMENT
        .iter()
        .map(|oid| (*oid, key_wrap_algorithm.clone()))
        .collect();
    entries.extend([ID_AES128_CBC, ID_AES192_CBC, ID_AES256_CBC].map(|oid| (oid, aes_iv.clone())));
    entries.extend(
        [ID_AES128_GMAC, ID_AES192_GMAC, ID_AES256_GMAC].map(|oid| (oid, gcm_parameters.clone())),
    );

    catalog
        .registry(ALGORITHM_IDENTIFIERS)
        .merge_all(entries.iter().cloned())?;
    catalog.registry(SMIME_CAPABILITIES).merge_all(entries)?;
    Ok(())
}
