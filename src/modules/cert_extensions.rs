//! Certificate extensions without content.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog, error::Result, oid::Oid, registry::CERTIFICATE_EXTENSIONS,
        schema::SchemaNode,
    },
};

pub const MODULE: Module = Module {
    name:       "cert_extensions",
    depends_on: &["pkix"],
    load,
};

/// No revocation information is available for the certificate.
pub const ID_CE_NO_REV_AVAIL: Oid = Oid::new_unwrap("2.5.29.56");
/// Certificate may be used to sign delegated credentials.
pub const ID_PE_DELEGATION_USAGE: Oid = Oid::new_unwrap("1.3.6.1.4.1.44363.44");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let null = SchemaNode::null();
    catalog.registry(CERTIFICATE_EXTENSIONS).merge_all([
        (ID_CE_NO_REV_AVAIL, null.clone()),
        (ID_PE_DELEGATION_USAGE, null),
    ])
}
