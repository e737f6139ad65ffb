use {
    super::{child_path, index_path, is_constructed, text},
    crate::{
        catalog::SchemaCatalog,
        ensure_err,
        error::{Error, Result},
        schema::{
            value::{int_content, Fields, OpenValue, Value},
            Component, Kind, Presence, Schema, TagMode,
        },
    },
    der::{asn1::AnyRef, Decode, Encode, Tag},
};

/// Encodes values as DER. Constraints are always enforced.
pub(crate) struct Encoder<'c> {
    catalog: &'c SchemaCatalog,
}

impl<'c> Encoder<'c> {
    pub(crate) const fn new(catalog: &'c SchemaCatalog) -> Self {
        Self { catalog }
    }

    pub(crate) fn encode(&self, value: &Value, schema: &Schema) -> Result<Vec<u8>> {
        self.node(value, schema, schema.display_name(), 0)
    }

    fn node(&self, value: &Value, schema: &Schema, path: &str, depth: usize) -> Result<Vec<u8>> {
        let limit = self.catalog.config().max_depth;
        ensure_err!(
            depth <= limit,
            Error::DepthExceeded {
                path: path.to_owned(),
                limit,
            }
        );
        // Open values are checked by the schema they were resolved with.
        if !matches!(value, Value::Open(_)) {
            if let Some(constraint) = schema.constraints().iter().find(|c| !c.accepts(value)) {
                return Err(Error::ConstraintViolation {
                    path:       path.to_owned(),
                    constraint: constraint.clone(),
                });
            }
        }
        match schema.tag() {
            None => self.untagged(value, schema, path, depth),
            Some(tag) => match tag.mode {
                TagMode::Explicit => {
                    let inner = self.untagged(value, schema, path, depth)?;
                    tlv(tag.der_tag(true), &inner, path)
                }
                TagMode::Implicit => {
                    let content = self.content(value, schema, path, depth)?;
                    tlv(tag.der_tag(is_constructed(schema.kind())), &content, path)
                }
            },
        }
    }

    fn untagged(&self, value: &Value, schema: &Schema, path: &str, depth: usize) -> Result<Vec<u8>> {
        match schema.kind() {
            Kind::Choice(alternatives) => {
                let Value::Choice { alternative, value } = value else {
                    return Err(Error::mismatch(path, "CHOICE", value.kind_name()));
                };
                let selected = alternatives
                    .iter()
                    .find(|a| &a.name == alternative)
                    .ok_or_else(|| Error::UnknownComponent {
                        path: path.to_owned(),
                        name: alternative.clone(),
                    })?;
                self.node(value, &selected.schema, &child_path(path, alternative), depth + 1)
            }
            Kind::Any => self.open(value, path, depth),
            Kind::Deferred(name) => {
                let target = self.catalog.schema(name)?;
                self.node(value, &target, path, depth + 1)
            }
            kind => {
                let tag = kind
                    .universal_tag()
                    .ok_or_else(|| Error::mismatch(path, "universal type", kind.name()))?;
                let content = self.content(value, schema, path, depth)?;
                tlv(tag, &content, path)
            }
        }
    }

    /// Complete encoding of an open-type value.
    fn open(&self, value: &Value, path: &str, depth: usize) -> Result<Vec<u8>> {
        match value {
            Value::Open(OpenValue::Raw(any)) => any.to_der().map_err(|e| Error::codec(path, e)),
            Value::Open(OpenValue::Resolved { schema, value }) => {
                self.node(value, schema, path, depth + 1)
            }
            other => Err(Error::mismatch(path, "open type", other.kind_name())),
        }
    }

    fn content(&self, value: &Value, schema: &Schema, path: &str, depth: usize) -> Result<Vec<u8>> {
        let kind = schema.kind();
        let mismatch = || Error::mismatch(path, kind.name(), value.kind_name());
        match (kind, value) {
            (Kind::Boolean, Value::Boolean(b)) => Ok(vec![if *b { 0xff } else { 0x00 }]),
            (Kind::Integer, Value::Integer(int)) | (Kind::Enumerated, Value::Enumerated(int)) => {
                int_content(int).map_err(|e| Error::codec(path, e))
            }
            (Kind::BitString, Value::BitString(bits)) => {
                let der = bits.to_der().map_err(|e| Error::codec(path, e))?;
                let any = AnyRef::from_der(&der).map_err(|e| Error::codec(path, e))?;
                Ok(any.value().to_vec())
            }
            (Kind::OctetString, Value::OctetString(bytes)) => Ok(bytes.clone()),
            // The octets hold the encoding of an open type.
            (Kind::OctetString, Value::Open(_)) => self.open(value, path, depth),
            (Kind::Null, Value::Null) => Ok(Vec::new()),
            (Kind::ObjectIdentifier, Value::ObjectIdentifier(oid)) => Ok(oid.as_bytes().to_vec()),
            (Kind::Text(text_kind), Value::Text(string)) => {
                text::encode(*text_kind, string).ok_or_else(|| {
                    Error::mismatch(path, text_kind.name(), format!("unrepresentable {string:?}"))
                })
            }
            (Kind::Sequence(components), Value::Sequence(fields)) => {
                self.sequence(components, fields, path, depth)
            }
            (Kind::SequenceOf(element), Value::SequenceOf(items)) => {
                let mut content = Vec::new();
                for (i, item) in items.iter().enumerate() {
                    content.extend(self.node(item, element, &index_path(path, i), depth + 1)?);
                }
                Ok(content)
            }
            (Kind::SetOf(element), Value::SequenceOf(items)) => {
                let mut encodings = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.node(item, element, &index_path(path, i), depth + 1))
                    .collect::<Result<Vec<_>>>()?;
                // DER orders SET OF elements by their encodings.
                encodings.sort();
                Ok(encodings.concat())
            }
            _ => Err(mismatch()),
        }
    }

    fn sequence(
        &self,
        components: &[Component],
        fields: &Fields,
        path: &str,
        depth: usize,
    ) -> Result<Vec<u8>> {
        if let Some(unknown) = fields
            .names()
            .find(|name| !components.iter().any(|c| c.name == *name))
        {
            return Err(Error::UnknownComponent {
                path: path.to_owned(),
                name: unknown.to_owned(),
            });
        }
        let mut content = Vec::new();
        for component in components {
            let field_path = child_path(path, &component.name);
            match (fields.get(&component.name), &component.presence) {
                (None, Presence::Required) => {
                    return Err(Error::MissingComponent { path: field_path })
                }
                (None, _) => {}
                // DER omits components equal to their default.
                (Some(value), Presence::Default(default)) if value == default => {}
                (Some(value), _) => {
                    content.extend(self.node(value, &component.schema, &field_path, depth + 1)?);
                }
            }
        }
        Ok(content)
    }
}

fn tlv(tag: Tag, content: &[u8], path: &str) -> Result<Vec<u8>> {
    AnyRef::new(tag, content)
        .and_then(|any| any.to_der())
        .map_err(|e| Error::codec(path, e))
}
