//! Object identifiers.
//!
//! Catalog modules export absolute `const` identifiers. [`OidExt::child`] is
//! the run-time append-arc operation, used to build identifiers from their
//! parent arc and to check the constants against it.

use const_oid::db::DB;

pub use const_oid::ObjectIdentifier as Oid;

pub trait OidExt: Sized {
    /// Identifier extended by one arc.
    fn child(&self, arc: u32) -> der::Result<Self>;

    /// Human readable name, when the OID database knows it.
    fn db_name(&self) -> Option<&'static str>;
}

impl OidExt for Oid {
    fn child(&self, arc: u32) -> der::Result<Self> {
        Ok(self.push_arc(arc)?)
    }

    fn db_name(&self) -> Option<&'static str> {
        DB.by_oid(self)
    }
}

/// Display helper that prints the dotted form and the database name if any.
pub(crate) struct Named<'a>(pub &'a Oid);

impl std::fmt::Display for Named<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.db_name() {
            Some(name) => write!(f, "{} ({name})", self.0),
            None => write!(f, "{}", self.0),
        }
    }
}
