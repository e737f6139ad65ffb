//! Catalog of ASN.1 schemas with OID-keyed open-type registries.
//!
//! Schemas are plain run-time values ([`Schema`]) built from a small set of
//! combinators. A [`SchemaCatalog`] owns the named registries that map object
//! identifiers to schemas, and a table of named types used to tie recursive
//! definitions together. Catalog [`modules`] populate both while they load.
//!
//! Decoding is driven by a schema: whenever a field is declared as an open
//! type, the value of its selector field is looked up in the bound registry
//! and, on a hit, the field is decoded further. Unknown identifiers are not an
//! error, the field is kept as the raw encoding instead. Decoding DER and
//! encoding the result reproduces the input bytes exactly.
//!
//! ```no_run
//! use asn1_catalog::{modules, SchemaCatalog};
//!
//! # fn main() -> asn1_catalog::Result<()> {
//! # let der: &[u8] = &[];
//! let catalog = SchemaCatalog::new();
//! modules::load_all(&catalog)?;
//! let certificate = catalog.schema("pkix.Certificate")?;
//! let value = catalog.decode_exact(der, &certificate)?;
//! assert_eq!(catalog.encode(&value, &certificate)?, der);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod codec;
mod error;
pub mod modules;
pub mod oid;
pub mod registry;
pub mod schema;

pub use self::{
    catalog::{get_registry, CatalogConfig, SchemaCatalog},
    codec::Leniency,
    error::{Error, Result, SchemaDefinitionError},
    oid::{Oid, OidExt},
    registry::Registry,
    schema::{
        constraint::Constraint,
        value::{Fields, OpenValue, Value},
        Component, Kind, OpenTypeBinding, Presence, Schema, SchemaNode, TagClass, TagMode,
        TagOverride, TextKind,
    },
};

/// Return early with an error if a condition is not met.
#[macro_export]
macro_rules! ensure_err {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err.into());
        }
    };
}
