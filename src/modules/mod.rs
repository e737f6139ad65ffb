//! Catalog modules.
//!
//! Each module describes one data format: its object identifiers, the named
//! types it defines and the schemas it contributes to the shared registries.
//! Loading a module loads its dependencies first. A module is loaded at most
//! once per catalog.

pub mod attribute_certificate;
pub mod cert_extensions;
pub mod cmp;
pub mod cmp_algorithms;
pub mod cms;
pub mod crmf;
pub mod csr_templates;
pub mod kem_recipient;
pub mod kem_rsa;
pub mod key_derivation;
pub mod key_purposes;
pub mod ocsp;
pub mod other_names;
pub mod pkcs10;
pub mod pkix;
pub mod post_quantum;
pub mod private_keys;
pub mod related_certs;
pub mod rpki;
pub mod snmp;

use {
    crate::{
        catalog::SchemaCatalog,
        error::{Result, SchemaDefinitionError},
    },
    std::fmt::{self, Debug, Formatter},
    tracing::debug,
};

/// Declarative description of a catalog module.
pub struct Module {
    pub name:       &'static str,
    pub depends_on: &'static [&'static str],
    load:           fn(&SchemaCatalog) -> Result<()>,
}

impl Debug for Module {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

/// Every module, dependencies before dependents.
pub const ALL: &[Module] = &[
    pkix::MODULE,
    cms::MODULE,
    pkcs10::MODULE,
    crmf::MODULE,
    attribute_certificate::MODULE,
    cmp::MODULE,
    cmp_algorithms::MODULE,
    key_purposes::MODULE,
    cert_extensions::MODULE,
    related_certs::MODULE,
    other_names::MODULE,
    csr_templates::MODULE,
    rpki::MODULE,
    kem_recipient::MODULE,
    private_keys::MODULE,
    key_derivation::MODULE,
    kem_rsa::MODULE,
    post_quantum::MODULE,
    ocsp::MODULE,
    snmp::MODULE,
];

pub fn find(name: &str) -> Option<&'static Module> {
    ALL.iter().find(|module| module.name == name)
}

/// Load the named modules and their dependencies into `catalog`.
pub fn load(catalog: &SchemaCatalog, names: &[&str]) -> Result<()> {
    let order = resolve(ALL, names)?;
    let mut loaded = catalog.loaded();
    for module in order {
        if loaded.contains(module.name) {
            continue;
        }
        let types = catalog.type_names().len();
        let entries = registry_entries(catalog);
        (module.load)(catalog)?;
        loaded.insert(module.name);
        debug!(
            module = module.name,
            types = catalog.type_names().len() - types,
            registered = registry_entries(catalog) - entries,
            "loaded catalog module"
        );
    }
    Ok(())
}

/// Entries over all registries of `catalog`.
fn registry_entries(catalog: &SchemaCatalog) -> usize {
    catalog
        .registry_names()
        .iter()
        .map(|name| catalog.registry(name).len())
        .sum()
}

pub fn load_all(catalog: &SchemaCatalog) -> Result<()> {
    let names: Vec<_> = ALL.iter().map(|module| module.name).collect();
    load(catalog, &names)
}

/// Modules in load order: every module after all of its dependencies.
fn resolve<'t>(table: &'t [Module], names: &[&str]) -> Result<Vec<&'t Module>> {
    fn visit<'t>(
        table: &'t [Module],
        name: &str,
        visiting: &mut Vec<&'t str>,
        order: &mut Vec<&'t Module>,
    ) -> Result<()> {
        if order.iter().any(|module| module.name == name) {
            return Ok(());
        }
        let module = table
            .iter()
            .find(|module| module.name == name)
            .ok_or_else(|| SchemaDefinitionError::UnknownModule(name.to_owned()))?;
        if visiting.contains(&module.name) {
            return Err(SchemaDefinitionError::DependencyCycle(name.to_owned()).into());
        }
        visiting.push(module.name);
        for dependency in module.depends_on {
            visit(table, dependency, visiting, order)?;
        }
        visiting.pop();
        order.push(module);
        Ok(())
    }

    let mut order = Vec::new();
    for name in names {
        visit(table, name, &mut Vec::new(), &mut order)?;
    }
    Ok(order)
}
