//! RSA-KEM algorithm parameters for KEM recipients and S/MIME capabilities.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{ALGORITHM_IDENTIFIERS, SMIME_CAPABILITIES},
        schema::{constraint::Constraint, Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "kem_rsa",
    depends_on: &["pkix", "cms", "key_derivation"],
    load,
};

/// RSA-KEM as a key transport algorithm, also used in public key info.
pub const ID_RSA_KEM: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3.14");
/// The ISO 18033-2 KEM-RSA mechanism inside the generic hybrid cipher.
pub const ID_KEM_RSA: Oid = Oid::new_unwrap("1.0.18033.2.2.4");
pub const ID_ALG_CMS3DES_WRAP: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.3.6");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let algorithm_identifier = catalog.schema("pkix.AlgorithmIdentifier")?;

    let key_length = catalog.define(
        "kem_rsa.KeyLength",
        SchemaNode::integer().constrained(Constraint::value(1..)?),
    )?;
    let generic_hybrid_parameters = catalog.define(
        "kem_rsa.GenericHybridParameters",
        SchemaNode::sequence([
            Component::required("kem", &algorithm_identifier),
            Component::required("dem", &algorithm_identifier),
        ])?,
    )?;
    let rsa_kem_parameters = catalog.define(
        "kem_rsa.RsaKemParameters",
        SchemaNode::sequence([
            Component::required("keyDerivationFunction", &algorithm_identifier),
            Component::required("keyLength", &key_length),
        ])?,
    )?;

    let entries = [
        (ID_RSA_KEM, generic_hybrid_parameters),
        (ID_KEM_RSA, rsa_kem_parameters),
        (ID_ALG_CMS3DES_WRAP, SchemaNode::null()),
    ];
    catalog
        .registry(ALGORITHM_IDENTIFIERS)
        .merge_all(entries.iter().cloned())?;
    catalog.registry(SMIME_CAPABILITIES).merge_all(entries)?;
    Ok(())
}
