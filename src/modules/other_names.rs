//! Internationalized email addresses as `otherName` values.

use {
    super::Module,
    crate::{
        catalog::SchemaCatalog,
        error::Result,
        oid::Oid,
        registry::OTHER_NAMES,
        schema::{constraint::Constraint, SchemaNode},
    },
};

pub const MODULE: Module = Module {
    name:       "other_names",
    depends_on: &["pkix"],
    load,
};

/// `id-on`.
pub const ID_ON: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.8");
pub const ID_ON_SMTP_UTF8_MAILBOX: Oid = Oid::new_unwrap("1.3.6.1.5.5.7.8.9");

fn load(catalog: &SchemaCatalog) -> Result<()> {
    let mailbox = catalog.define(
        "other_names.SmtpUTF8Mailbox",
        SchemaNode::utf8_string().constrained(Constraint::non_empty()),
    )?;
    catalog
        .registry(OTHER_NAMES)
        .register(ID_ON_SMTP_UTF8_MAILBOX, mailbox)
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{oid::OidExt, schema::value::Value},
        hex_literal::hex,
    };

    #[test]
    fn test_mailbox_other_name() {
        assert_eq!(ID_ON.child(9).unwrap(), ID_ON_SMTP_UTF8_MAILBOX);
        let catalog = SchemaCatalog::new();
        crate::modules::load(&catalog, &["other_names"]).unwrap();
        let general_name = catalog.schema("pkix.GeneralName").unwrap();
        // otherName { id-on-SmtpUTF8Mailbox, [0] "δ@x.io" }
        let der = hex!("a015 0608 2b06010505070809 a009 0c07 ceb440782e696f");
        let value = catalog.decode_exact(&der, &general_name).unwrap();
        assert_eq!(value.get("otherName.value").and_then(Value::as_str), Some("δ@x.io"));
        assert_eq!(catalog.encode(&value, &general_name).unwrap(), der);
    }
}
