//! Resource PKI: IP address and AS number extensions, route origin
//! authorizations and trust anchor keys.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::{CERTIFICATE_EXTENSIONS, CMS_CONTENT_TYPES},
        schema::{constraint::Constraint, value::Value, Component, Schema, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "rpki",
    depends_on: &["pkix", "cms"],
    load,
};

pub const ID_PE_IP_ADDR_BLOCKS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.7");
pub const ID_PE_AUTONOMOUS_SYS_IDS: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.8");
/// Validation reconsidered variants of the resource extensions.
pub const ID_PE_IP_ADDR_BLOCKS_V2: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.28");
pub const ID_PE_AUTONOMOUS_SYS_IDS_V2: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.1.29");

pub const ID_CT_ROUTE_ORIGIN_AUTHZ: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.1.24");
pub const ID_CT_SIGNED_TAL: Oid = Oid::new_unwrap("1.2.840.113549.1.9.16.1.50");

const MAX_ASID: i128 = 4_294_967_295;

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let integer = SchemaNode::integer();
    let bit_string = SchemaNode::bit_string();
    let null = SchemaNode::null();

    let ip_address_range = catalog.define(
        "rpki.IPAddressRange",
        SchemaNode::sequence([
            Component::required("min", &bit_string),
            Component::required("max", &bit_string),
        ])?,
    )?;
    let ip_address_or_range = catalog.define(
        "rpki.IPAddressOrRange",
        SchemaNode::choice([
            Component::required("addressPrefix", &bit_string),
            Component::required("addressRange", &ip_address_range),
        ])?,
    )?;
    let ip_address_choice = catalog.define(
        "rpki.IPAddressChoice",
        SchemaNode::choice([
            Component::required("inherit", &null),
            Component::required(
                "addressesOrRanges",
                &SchemaNode::sequence_of(&ip_address_or_range),
            ),
        ])?,
    )?;
    let ip_address_family = catalog.define(
        "rpki.IPAddressFamily",
        SchemaNode::sequence([
            Component::required(
                "addressFamily",
                &SchemaNode::octet_string().constrained(Constraint::size(2..=3)?),
            ),
            Component::required("ipAddressChoice", &ip_address_choice),
        ])?,
    )?;
    let ip_addr_blocks = catalog.define(
        "rpki.IPAddrBlocks",
        SchemaNode::sequence_of(&ip_address_family),
    )?;

    let as_range = catalog.define(
        "rpki.ASRange",
        SchemaNode::sequence([
            Component::required("min", &integer),
            Component::required("max", &integer),
        ])?,
    )?;
    let as_id_or_range = catalog.define(
        "rpki.ASIdOrRange",
        SchemaNode::choice([
            Component::required("id", &integer),
            Component::required("range", &as_range),
        ])?,
    )?;
    let as_identifier_choice = catalog.define(
        "rpki.ASIdentifierChoice",
        SchemaNode::choice([
            Component::required("inherit", &null),
            Component::required("asIdsOrRanges", &SchemaNode::sequence_of(&as_id_or_range)),
        ])?,
    )?;
    let as_identifiers = catalog.define(
        "rpki.ASIdentifiers",
        SchemaNode::sequence([
            Component::optional("asnum", &as_identifier_choice.explicit(0)?),
            Component::optional("rdi", &as_identifier_choice.explicit(1)?),
        ])?,
    )?;

    let roa = route_origin_attestation(catalog)?;
    let tak = trust_anchor_key(catalog)?;

    catalog.registry(CERTIFICATE_EXTENSIONS).merge_all([
        (ID_PE_IP_ADDR_BLOCKS, ip_addr_blocks.clone()),
        (ID_PE_AUTONOMOUS_SYS_IDS, as_identifiers.clone()),
        (ID_PE_IP_ADDR_BLOCKS_V2, ip_addr_blocks),
        (ID_PE_AUTONOMOUS_SYS_IDS_V2, as_identifiers),
    ])?;
    catalog
        .registry(CMS_CONTENT_TYPES)
        .merge_all([(ID_CT_ROUTE_ORIGIN_AUTHZ, roa), (ID_CT_SIGNED_TAL, tak)])?;
    Ok(())
}

fn route_origin_attestation(catalog: &SchemaCatalog) -> Result<Schema> {
    let integer = SchemaNode::integer();
    let address = catalog.define(
        "rpki.ROAIPAddress",
        SchemaNode::sequence([
            Component::required("address", &SchemaNode::bit_string()),
            Component::optional(
                "maxLength",
                &integer.constrained(Constraint::value(0..=128)?),
            ),
        ])?,
    )?;
    let family = catalog.define(
        "rpki.ROAIPAddressFamily",
        SchemaNode::sequence([
            Component::required(
                "addressFamily",
                &SchemaNode::octet_string().constrained(Constraint::fixed_size(2)),
            ),
            Component::required(
                "addresses",
                &SchemaNode::sequence_of(&address).constrained(Constraint::non_empty()),
            ),
        ])?,
    )?;
    Ok(catalog.define(
        "rpki.RouteOriginAttestation",
        SchemaNode::sequence([
            Component::defaulted("version", &integer.explicit(0)?, Value::integer(0)?),
            Component::required(
                "asID",
                &integer.constrained(Constraint::value(0..=MAX_ASID)?),
            ),
            Component::required(
                "ipAddrBlocks",
                &SchemaNode::sequence_of(&family).constrained(Constraint::size(1..=2)?),
            ),
        ])?,
    )?)
}

fn trust_anchor_key(catalog: &SchemaCatalog) -> Result<Schema> {
    let comment = SchemaNode::utf8_string().constrained(Constraint::non_empty());
    let certificate_uri = SchemaNode::ia5_string();
    let key = catalog.define(
        "rpki.TAKey",
        SchemaNode::sequence([
            Component::required("comments", &SchemaNode::sequence_of(&comment)),
            Component::required(
                "certificateURIs",
                &SchemaNode::sequence_of(&certificate_uri).constrained(Constraint::non_empty()),
            ),
            Component::required(
                "subjectPublicKeyInfo",
                &catalog.schema("pkix.SubjectPublicKeyInfo")?,
            ),
        ])?,
    )?;
    Ok(catalog.define(
        "rpki.TAK",
        SchemaNode::sequence([
            Component::defaulted("version", &SchemaNode::integer(), Value::integer(0)?),
            Component::required("current", &key),
            Component::optional("predecessor", &key.explicit(0)?),
            Component::optional("successor", &key.explicit(1)?),
        ])?,
    )?)
}
