//! Community based SNMPv2 message wrapper.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        schema::{Component, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "snmp",
    depends_on: &[],
    load,
};

/// `version-2c`.
pub const VERSION_2C: i64 = 1;

fn load(catalog: &SchemaCatalog) -> Result<()> {
    catalog.define(
        "snmp.Message",
        SchemaNode::sequence([
            Component::required("version", &SchemaNode::integer()),
            Component::required("community", &SchemaNode::octet_string()),
            Component::required("data", &SchemaNode::any()),
        ])?,
    )?;
    Ok(())
}
