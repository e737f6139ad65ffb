//! Registries, named types and the entry points for encoding and decoding.

use {
    crate::{
        codec::{Decoder, Encoder, Leniency},
        error::{Error, Result, SchemaDefinitionError},
        registry::Registry,
        schema::{value::Value, Schema},
    },
    std::{
        collections::{BTreeMap, BTreeSet, HashMap},
        sync::{Arc, Mutex, OnceLock, PoisonError, RwLock},
    },
    tracing::{debug, trace},
};

/// Behaviour knobs of a [`SchemaCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Registering a different schema for an OID that is already registered.
    pub registry_conflict:  Leniency,
    /// Decoded values that violate a constraint of their schema.
    pub decode_constraints: Leniency,
    /// Decode open types whose selector is registered.
    pub resolve_open_types: bool,
    /// Nesting limit for decoding, encoding and deferred references.
    pub max_depth:          usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            registry_conflict:  Leniency::Warn,
            decode_constraints: Leniency::Strict,
            resolve_open_types: true,
            max_depth:          64,
        }
    }
}

/// Named registries and named types.
///
/// A catalog is an ordinary value that can be passed around and shared
/// between threads. [`SchemaCatalog::global`] is a process wide instance for
/// callers that prefer not to thread one through.
#[derive(Debug, Default)]
pub struct SchemaCatalog {
    config:     CatalogConfig,
    registries: RwLock<BTreeMap<String, Arc<Registry>>>,
    types:      RwLock<HashMap<String, Schema>>,
    loaded:     Mutex<BTreeSet<&'static str>>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CatalogConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Process wide catalog, created empty on first use.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<SchemaCatalog> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Registry by name, created empty if it does not exist yet.
    pub fn registry(&self, name: &str) -> Arc<Registry> {
        if let Some(registry) = self
            .registries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Arc::clone(registry);
        }
        let mut registries = self.registries.write().unwrap_or_else(PoisonError::into_inner);
        let registry = registries.entry(name.to_owned()).or_insert_with(|| {
            trace!(registry = name, "created registry");
            Arc::new(Registry::new(name, self.config.registry_conflict))
        });
        Arc::clone(registry)
    }

    /// Names of the registries created so far.
    pub fn registry_names(&self) -> Vec<String> {
        self.registries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Give a schema a catalog name so that deferred references can find it.
    ///
    /// Defining the same name again with an equal schema returns the
    /// existing definition.
    pub fn define(&self, name: &str, schema: Schema) -> Result<Schema, SchemaDefinitionError> {
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = types.get(name) {
            if **existing == *schema {
                return Ok(Arc::clone(existing));
            }
            return Err(SchemaDefinitionError::Redefined(name.to_owned()));
        }
        // Aliases keep the name of the type they refer to.
        let schema = if schema.name().is_some() {
            schema
        } else {
            schema.named(name)
        };
        types.insert(name.to_owned(), Arc::clone(&schema));
        Ok(schema)
    }

    /// Named type, an error if it was never defined.
    pub fn schema(&self, name: &str) -> Result<Schema> {
        self.lookup_type(name)
            .ok_or_else(|| SchemaDefinitionError::UnknownType(name.to_owned()).into())
    }

    pub fn lookup_type(&self, name: &str) -> Option<Schema> {
        self.types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Defined type names, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .types
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Whether the catalog module `name` has been loaded into this catalog.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded().contains(name)
    }

    pub(crate) fn loaded(&self) -> std::sync::MutexGuard<'_, BTreeSet<&'static str>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode one value from the start of `der`, returning the rest.
    pub fn decode<'a>(&self, der: &'a [u8], schema: &Schema) -> Result<(Value, &'a [u8])> {
        Decoder::new(self).decode(der, schema)
    }

    /// Decode a value that spans all of `der`.
    pub fn decode_exact(&self, der: &[u8], schema: &Schema) -> Result<Value> {
        let (value, rest) = self.decode(der, schema)?;
        if !rest.is_empty() {
            debug!(trailing = %hex::encode(&rest[..rest.len().min(16)]), "trailing data");
            return Err(Error::TrailingData {
                path:      schema.display_name().to_owned(),
                remaining: rest.len(),
            });
        }
        Ok(value)
    }

    pub fn encode(&self, value: &Value, schema: &Schema) -> Result<Vec<u8>> {
        Encoder::new(self).encode(value, schema)
    }
}

/// Registry `name` of the global catalog.
pub fn get_registry(name: &str) -> Arc<Registry> {
    SchemaCatalog::global().registry(name)
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            registry::CERTIFICATE_EXTENSIONS,
            schema::{constraint::Constraint, Component, SchemaNode},
        },
        hex_literal::hex,
    };

    #[test]
    fn test_registry_identity() {
        let catalog = SchemaCatalog::new();
        let a = catalog.registry(CERTIFICATE_EXTENSIONS);
        let b = catalog.registry(CERTIFICATE_EXTENSIONS);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(catalog.registry_names(), [CERTIFICATE_EXTENSIONS]);
        assert!(Arc::ptr_eq(
            &get_registry(CERTIFICATE_EXTENSIONS),
            &SchemaCatalog::global().registry(CERTIFICATE_EXTENSIONS)
        ));
    }

    #[test]
    fn test_define() {
        let catalog = SchemaCatalog::new();
        let version = catalog
            .define("test.Version", SchemaNode::integer())
            .unwrap();
        assert_eq!(version.name(), Some("test.Version"));
        assert!(catalog.define("test.Version", SchemaNode::integer()).is_ok());
        assert_eq!(
            catalog.define("test.Version", SchemaNode::null()).unwrap_err(),
            SchemaDefinitionError::Redefined("test.Version".into())
        );
        let alias = catalog.define("test.Alias", version).unwrap();
        assert_eq!(alias.name(), Some("test.Version"));
        assert_eq!(catalog.type_names(), ["test.Alias", "test.Version"]);
        assert!(matches!(
            catalog.schema("test.Missing"),
            Err(Error::Definition(SchemaDefinitionError::UnknownType(_)))
        ));
    }

    #[test]
    fn test_decode_exact_rejects_trailing_data() {
        let catalog = SchemaCatalog::new();
        let (value, rest) = catalog.decode(&hex!("0500 ff"), &SchemaNode::null()).unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(rest, [0xff]);
        assert!(matches!(
            catalog.decode_exact(&hex!("0500 ff"), &SchemaNode::null()),
            Err(Error::TrailingData { remaining: 1, .. })
        ));
    }

    #[test]
    fn test_constraint_leniency() {
        let schema = SchemaNode::octet_string().constrained(Constraint::fixed_size(2));
        let short = hex!("0401 00");
        assert!(matches!(
            SchemaCatalog::new().decode_exact(&short, &schema),
            Err(Error::ConstraintViolation { .. })
        ));
        let lenient = SchemaCatalog::with_config(CatalogConfig {
            decode_constraints: Leniency::Allow,
            ..CatalogConfig::default()
        });
        let value = lenient.decode_exact(&short, &schema).unwrap();
        assert_eq!(value, Value::OctetString(vec![0]));
        // Encoding is always strict.
        assert!(lenient.encode(&value, &schema).is_err());
    }

    #[test]
    fn test_depth_limit() {
        let catalog = SchemaCatalog::with_config(CatalogConfig {
            max_depth: 4,
            ..CatalogConfig::default()
        });
        let list = SchemaNode::sequence([Component::optional(
            "next",
            &SchemaNode::deferred("test.List"),
        )])
        .unwrap();
        let list = catalog.define("test.List", list).unwrap();
        assert!(catalog.decode_exact(&hex!("3002 3000"), &list).is_ok());
        let deep = hex!("300e 300c 300a 3008 3006 3004 3002 3000");
        assert!(matches!(
            catalog.decode_exact(&deep, &list),
            Err(Error::DepthExceeded { limit: 4, .. })
        ));
    }
}
