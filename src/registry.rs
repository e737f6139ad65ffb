//! OID-keyed schema registries used to resolve open types.

use {
    crate::{
        codec::Leniency,
        error::{Error, Result},
        oid::{Named, Oid},
        schema::Schema,
    },
    std::{
        collections::BTreeMap,
        sync::{Arc, PoisonError, RwLock},
    },
    tracing::{trace, warn},
};

/// Certificate and CRL extensions, selected by `Extension.extnID`.
pub const CERTIFICATE_EXTENSIONS: &str = "certificateExtensions";
/// Directory and PKCS#10 attributes, selected by the attribute type.
pub const CERTIFICATE_ATTRIBUTES: &str = "certificateAttributes";
/// CMS signed and unsigned attributes, and CRMF controls.
pub const CMS_ATTRIBUTES: &str = "cmsAttributes";
pub const CMS_CONTENT_TYPES: &str = "cmsContentTypes";
/// CMP `InfoTypeAndValue` types.
pub const CMP_INFO_TYPES: &str = "cmpInfoTypes";
/// `AlgorithmIdentifier` parameters.
pub const ALGORITHM_IDENTIFIERS: &str = "algorithmIdentifiers";
/// `otherName` values of a `GeneralName`.
pub const OTHER_NAMES: &str = "otherNames";
pub const SMIME_CAPABILITIES: &str = "smimeCapabilities";
pub const OCSP_RESPONSE_TYPES: &str = "ocspResponseTypes";
pub const OTHER_RECIPIENT_INFO: &str = "otherRecipientInfo";

/// Append-only map from OID to schema.
#[derive(Debug)]
pub struct Registry {
    name:     String,
    conflict: Leniency,
    entries:  RwLock<BTreeMap<Oid, Schema>>,
}

impl Registry {
    /// Empty registry. `conflict` decides what happens when an OID is
    /// registered again with a different schema.
    pub fn new(name: &str, conflict: Leniency) -> Self {
        Self {
            name: name.to_owned(),
            conflict,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Merge a batch of registrations under one lock.
    ///
    /// Registering the same schema again is a no-op. With
    /// [`Leniency::Strict`] a conflicting entry rejects the whole batch and
    /// leaves the registry unchanged.
    pub fn merge_all(&self, updates: impl IntoIterator<Item = (Oid, Schema)>) -> Result<()> {
        let updates: Vec<_> = updates.into_iter().collect();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);

        if self.conflict == Leniency::Strict {
            // Earlier entries of the same batch count as registered.
            let mut batch: BTreeMap<Oid, &Schema> = BTreeMap::new();
            for (oid, schema) in &updates {
                let existing = batch.get(oid).copied().or_else(|| entries.get(oid));
                if existing.is_some_and(|existing| !same_schema(existing, schema)) {
                    return Err(Error::RegistryConflict {
                        registry: self.name.clone(),
                        oid:      *oid,
                    });
                }
                batch.insert(*oid, schema);
            }
        }

        for (oid, schema) in updates {
            match entries.get(&oid) {
                Some(existing) if same_schema(existing, &schema) => continue,
                Some(existing) if self.conflict == Leniency::Warn => warn!(
                    registry = %self.name,
                    oid = %Named(&oid),
                    old = %existing,
                    new = %schema,
                    "replacing registered schema"
                ),
                _ => trace!(registry = %self.name, oid = %Named(&oid), "registered {schema}"),
            }
            entries.insert(oid, schema);
        }
        Ok(())
    }

    pub fn register(&self, oid: Oid, schema: Schema) -> Result<()> {
        self.merge_all([(oid, schema)])
    }

    /// Registered schema, `None` for unknown OIDs.
    pub fn lookup(&self, oid: &Oid) -> Option<Schema> {
        self.read().get(oid).cloned()
    }

    pub fn contains(&self, oid: &Oid) -> bool {
        self.read().contains_key(oid)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered OIDs in ascending order.
    pub fn oids(&self) -> Vec<Oid> {
        self.read().keys().copied().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<Oid, Schema>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn same_schema(a: &Schema, b: &Schema) -> bool {
    Arc::ptr_eq(a, b) || a == b
}
