//! Post-quantum signature and key establishment algorithms.
//!
//! None of these algorithms take parameters, so nothing is added to
//! `algorithmIdentifiers`. The module provides the identifiers and the key
//! formats, which callers apply to `SubjectPublicKeyInfo.subjectPublicKey`
//! and `OneAsymmetricKey.privateKey` themselves.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        schema::{constraint::Constraint, Component, Schema, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "post_quantum",
    depends_on: &["pkix"],
    load,
};

/// NIST signature algorithms, `sigAlgs`.
pub const SIG_ALGS: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3");
/// NIST key establishment algorithms, `kems`.
pub const KEMS: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.4");

pub const ID_ML_DSA_44: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.17");
pub const ID_ML_DSA_65: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.18");
pub const ID_ML_DSA_87: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.19");

pub const ID_SLH_DSA_SHA2_128S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.20");
pub const ID_SLH_DSA_SHA2_128F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.21");
pub const ID_SLH_DSA_SHA2_192S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.22");
pub const ID_SLH_DSA_SHA2_192F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.23");
pub const ID_SLH_DSA_SHA2_256S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.24");
pub const ID_SLH_DSA_SHA2_256F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.25");
pub const ID_SLH_DSA_SHAKE_128S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.26");
pub const ID_SLH_DSA_SHAKE_128F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.27");
pub const ID_SLH_DSA_SHAKE_192S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.28");
pub const ID_SLH_DSA_SHAKE_192F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.29");
pub const ID_SLH_DSA_SHAKE_256S: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.30");
pub const ID_SLH_DSA_SHAKE_256F: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.31");

/// SLH-DSA over a pre-hashed message, arcs 35 to 46 of `sigAlgs`.
pub const ID_HASH_SLH_DSA_SHA2_128S_WITH_SHA256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.35");
pub const ID_HASH_SLH_DSA_SHA2_128F_WITH_SHA256: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.36");
pub const ID_HASH_SLH_DSA_SHA2_192S_WITH_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.37");
pub const ID_HASH_SLH_DSA_SHA2_192F_WITH_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.38");
pub const ID_HASH_SLH_DSA_SHA2_256S_WITH_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.39");
pub const ID_HASH_SLH_DSA_SHA2_256F_WITH_SHA512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.3.40");
pub const ID_HASH_SLH_DSA_SHAKE_128S_WITH_SHAKE128: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.41");
pub const ID_HASH_SLH_DSA_SHAKE_128F_WITH_SHAKE128: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.42");
pub const ID_HASH_SLH_DSA_SHAKE_192S_WITH_SHAKE256: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.43");
pub const ID_HASH_SLH_DSA_SHAKE_192F_WITH_SHAKE256: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.44");
pub const ID_HASH_SLH_DSA_SHAKE_256S_WITH_SHAKE256: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.45");
pub const ID_HASH_SLH_DSA_SHAKE_256F_WITH_SHAKE256: Oid =
    Oid::new_unwrap("2.16.840.1.101.3.4.3.46");

pub const ID_ALG_ML_KEM_512: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.4.1");
pub const ID_ALG_ML_KEM_768: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.4.2");
pub const ID_ALG_ML_KEM_1024: Oid = Oid::new_unwrap("2.16.840.1.101.3.4.4.3");

pub const ID_ALG_HSS_LMS_HASHSIG: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3.17");
pub const ID_ALG_XMSS_HASHSIG: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.6.34");
pub const ID_ALG_XMSSMT_HASHSIG: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.6.35");

/// Seed and expanded private key sizes, and public key size, in octets.
struct ParameterSet {
    name:         &'static str,
    seed:         u64,
    expanded_key: u64,
    public_key:   u64,
}

const ML_DSA: [ParameterSet; 3] = [
    ParameterSet { name: "ML-DSA-44", seed: 32, expanded_key: 2560, public_key: 1312 },
    ParameterSet { name: "ML-DSA-65", seed: 32, expanded_key: 4032, public_key: 1952 },
    ParameterSet { name: "ML-DSA-87", seed: 32, expanded_key: 4896, public_key: 2592 },
];

const ML_KEM: [ParameterSet; 3] = [
    ParameterSet { name: "ML-KEM-512", seed: 64, expanded_key: 1632, public_key: 800 },
    ParameterSet { name: "ML-KEM-768", seed: 64, expanded_key: 2400, public_key: 1184 },
    ParameterSet { name: "ML-KEM-1024", seed: 64, expanded_key: 3168, public_key: 1568 },
];

/// `seed [0] | expandedKey | both`.
fn private_key(set: &ParameterSet) -> Result<Schema> {
    let seed = SchemaNode::octet_string().constrained(Constraint::fixed_size(set.seed));
    let expanded_key =
        SchemaNode::octet_string().constrained(Constraint::fixed_size(set.expanded_key));
    Ok(SchemaNode::choice([
        Component::required("seed", &seed.implicit(0)?),
        Component::required("expandedKey", &expanded_key),
        Component::required(
            "both",
            &SchemaNode::sequence([
                Component::required("seed", &seed),
                Component::required("expandedKey", &expanded_key),
            ])?,
        ),
    ])?)
}

fn load(catalog: &SchemaCatalog) -> Result<()> {
    for set in ML_DSA.iter().chain(&ML_KEM) {
        catalog.define(
            &format!("post_quantum.{}-PrivateKey", set.name),
            private_key(set)?,
        )?;
        catalog.define(
            &format!("post_quantum.{}-PublicKey", set.name),
            SchemaNode::octet_string().constrained(Constraint::fixed_size(set.public_key)),
        )?;
    }

    catalog.define(
        "post_quantum.SLH-DSA-PrivateKey",
        SchemaNode::octet_string()
            .constrained(Constraint::union([64, 96, 128].map(Constraint::fixed_size))),
    )?;
    catalog.define(
        "post_quantum.SLH-DSA-PublicKey",
        SchemaNode::octet_string()
            .constrained(Constraint::union([32, 48, 64].map(Constraint::fixed_size))),
    )?;

    let octet_string = SchemaNode::octet_string();
    for name in [
        "HSS-LMS-HashSig-PublicKey",
        "HSS-LMS-HashSig-Signature",
        "XMSS-HashSig-PublicKey",
        "XMSS-HashSig-Signature",
        "XMSSMT-HashSig-PublicKey",
        "XMSSMT-HashSig-Signature",
    ] {
        catalog.define(&format!("post_quantum.{name}"), octet_string.clone())?;
    }
    Ok(())
}
