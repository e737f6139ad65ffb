use {
    super::{child_path, index_path, is_constructed, lenient, text},
    crate::{
        catalog::SchemaCatalog,
        ensure_err,
        error::{Error, Result},
        oid::Named,
        schema::{
            value::{Fields, OpenValue, Value},
            Component, Kind, Presence, Schema, TagMode,
        },
    },
    der::{
        asn1::{AnyRef, BitString, Int, Null},
        Any, Choice, Decode, DecodeValue, Encode, Reader, SliceReader, Tag, Tagged,
    },
    tracing::trace,
};

/// Decodes DER against a schema, resolving open types on the way.
pub(crate) struct Decoder<'c> {
    catalog: &'c SchemaCatalog,
}

impl<'c> Decoder<'c> {
    pub(crate) const fn new(catalog: &'c SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Decode one value and return the bytes that follow it.
    pub(crate) fn decode<'a>(&self, bytes: &'a [u8], schema: &Schema) -> Result<(Value, &'a [u8])> {
        let path = schema.display_name();
        let mut reader = SliceReader::new(bytes).map_err(|e| Error::codec(path, e))?;
        let value = self.node(&mut reader, schema, path, 0)?;
        let consumed = usize::try_from(reader.position()).map_err(|e| Error::codec(path, e))?;
        Ok((value, bytes.get(consumed..).unwrap_or_default()))
    }

    /// Decode one value that must span all of `bytes`.
    fn exact(&self, bytes: &[u8], schema: &Schema, path: &str, depth: usize) -> Result<Value> {
        let mut reader = SliceReader::new(bytes).map_err(|e| Error::codec(path, e))?;
        let value = self.node(&mut reader, schema, path, depth)?;
        finish(&reader, path)?;
        Ok(value)
    }

    fn node<'a>(
        &self,
        reader: &mut SliceReader<'a>,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<Value> {
        self.check_depth(path, depth)?;
        let value = match schema.tag() {
            None => self.untagged(reader, schema, path, depth)?,
            Some(tag) => {
                let tlv = read_tlv(reader, path)?;
                ensure_err!(tag.matches(tlv.tag()), Error::mismatch(path, tag, tlv.tag()));
                match tag.mode {
                    TagMode::Explicit => {
                        let mut inner =
                            SliceReader::new(tlv.value()).map_err(|e| Error::codec(path, e))?;
                        let value = self.untagged(&mut inner, schema, path, depth)?;
                        finish(&inner, path)?;
                        value
                    }
                    TagMode::Implicit => {
                        let expected = tag.der_tag(is_constructed(schema.kind()));
                        ensure_err!(tlv.tag() == expected, Error::mismatch(path, tag, tlv.tag()));
                        self.content(schema, tlv.value(), path, depth)?
                    }
                }
            }
        };
        for constraint in schema.constraints() {
            if !constraint.accepts(&value) {
                lenient(self.catalog.config().decode_constraints, || {
                    Error::ConstraintViolation {
                        path:       path.to_owned(),
                        constraint: constraint.clone(),
                    }
                })?;
            }
        }
        Ok(value)
    }

    fn untagged<'a>(
        &self,
        reader: &mut SliceReader<'a>,
        schema: &Schema,
        path: &str,
        depth: usize,
    ) -> Result<Value> {
        match schema.kind() {
            Kind::Choice(alternatives) => {
                let tag = reader.peek_tag().map_err(|e| Error::codec(path, e))?;
                for alternative in alternatives {
                    if self.starts_with(&alternative.schema, tag, depth)? {
                        let path = child_path(path, &alternative.name);
                        let value = self.node(reader, &alternative.schema, &path, depth + 1)?;
                        return Ok(Value::choice(&alternative.name, value));
                    }
                }
                Err(Error::NoAlternative {
                    path: path.to_owned(),
                    tag,
                })
            }
            Kind::Any => {
                let tlv = read_tlv(reader, path)?;
                let any = Any::new(tlv.tag(), tlv.value()).map_err(|e| Error::codec(path, e))?;
                Ok(Value::Open(OpenValue::Raw(any)))
            }
            Kind::Deferred(name) => {
                let target = self.catalog.schema(name)?;
                self.node(reader, &target, path, depth + 1)
            }
            kind => {
                let tlv = read_tlv(reader, path)?;
                let expected = kind.universal_tag();
                ensure_err!(
                    expected == Some(tlv.tag()),
                    Error::mismatch(path, kind.name(), tlv.tag())
                );
                self.content(schema, tlv.value(), path, depth)
            }
        }
    }

    /// Value of a non-CHOICE, non-ANY kind from its content octets.
    fn content(&self, schema: &Schema, bytes: &[u8], path: &str, depth: usize) -> Result<Value> {
        Ok(match schema.kind() {
            Kind::Boolean => Value::Boolean(primitive::<bool>(Tag::Boolean, bytes, path)?),
            Kind::Integer => Value::Integer(primitive::<Int>(Tag::Integer, bytes, path)?),
            // Same content rules as INTEGER.
            Kind::Enumerated => Value::Enumerated(primitive::<Int>(Tag::Integer, bytes, path)?),
            Kind::BitString => Value::BitString(primitive::<BitString>(Tag::BitString, bytes, path)?),
            Kind::OctetString => Value::OctetString(bytes.to_vec()),
            Kind::Null => {
                primitive::<Null>(Tag::Null, bytes, path)?;
                Value::Null
            }
            Kind::ObjectIdentifier => Value::ObjectIdentifier(primitive(Tag::ObjectIdentifier, bytes, path)?),
            Kind::Text(kind) => Value::Text(
                text::decode(*kind, bytes)
                    .ok_or_else(|| Error::mismatch(path, kind.name(), "invalid characters"))?,
            ),
            Kind::Sequence(components) => self.sequence(components, bytes, path, depth)?,
            Kind::SequenceOf(element) | Kind::SetOf(element) => {
                let mut reader = SliceReader::new(bytes).map_err(|e| Error::codec(path, e))?;
                let mut items = Vec::new();
                while !reader.is_finished() {
                    let path = index_path(path, items.len());
                    items.push(self.node(&mut reader, element, &path, depth + 1)?);
                }
                Value::SequenceOf(items)
            }
            kind @ (Kind::Choice(_) | Kind::Any | Kind::Deferred(_)) => {
                return Err(Error::mismatch(path, "implicitly taggable type", kind.name()))
            }
        })
    }

    fn sequence(
        &self,
        components: &[Component],
        bytes: &[u8],
        path: &str,
        depth: usize,
    ) -> Result<Value> {
        let mut reader = SliceReader::new(bytes).map_err(|e| Error::codec(path, e))?;
        let mut fields = Fields::new();
        for component in components {
            let field_path = child_path(path, &component.name);
            let present = if reader.is_finished() {
                false
            } else {
                let tag = reader.peek_tag().map_err(|e| Error::codec(&field_path, e))?;
                // A required component is decoded anyway to report the mismatch.
                component.is_required() || self.starts_with(&component.schema, tag, depth)?
            };
            if present {
                let value = self.node(&mut reader, &component.schema, &field_path, depth + 1)?;
                fields.insert(&component.name, value);
                continue;
            }
            match &component.presence {
                Presence::Required => return Err(Error::MissingComponent { path: field_path }),
                Presence::Optional => {}
                Presence::Default(value) => {
                    fields.insert(&component.name, value.clone());
                }
            }
        }
        finish(&reader, path)?;
        if self.catalog.config().resolve_open_types {
            self.resolve_open_types(components, &mut fields, path, depth)?;
        }
        Ok(Value::Sequence(fields))
    }

    /// Replace raw open-type fields with values decoded by registered schemas.
    fn resolve_open_types(
        &self,
        components: &[Component],
        fields: &mut Fields,
        path: &str,
        depth: usize,
    ) -> Result<()> {
        for component in components {
            let Some(binding) = component.schema.open_type() else {
                continue;
            };
            let Some(oid) = fields.get(&binding.selector).and_then(Value::as_oid) else {
                continue;
            };
            let Some(target) = self.catalog.registry(&binding.registry).lookup(&oid) else {
                trace!(registry = %binding.registry, oid = %Named(&oid), "open type left raw");
                continue;
            };
            let field_path = child_path(path, &component.name);
            if let Some(field) = fields.get_mut(&component.name) {
                trace!(registry = %binding.registry, oid = %Named(&oid), "resolving {field_path}");
                *field = self.resolve(field, &target, &field_path, depth + 1)?;
            }
        }
        Ok(())
    }

    fn resolve(&self, field: &Value, target: &Schema, path: &str, depth: usize) -> Result<Value> {
        let encoding = match field {
            Value::Open(OpenValue::Raw(any)) => any.to_der().map_err(|e| Error::codec(path, e))?,
            Value::OctetString(bytes) => bytes.clone(),
            Value::SequenceOf(items) => {
                return items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.resolve(item, target, &index_path(path, i), depth))
                    .collect::<Result<_>>()
                    .map(Value::SequenceOf)
            }
            // Defaults and values resolved before are left alone.
            other => return Ok(other.clone()),
        };
        let value = self.exact(&encoding, target, path, depth)?;
        Ok(Value::Open(OpenValue::Resolved {
            schema: target.clone(),
            value:  Box::new(value),
        }))
    }

    /// Whether a value of `schema` can start with `tag`.
    fn starts_with(&self, schema: &Schema, tag: Tag, depth: usize) -> Result<bool> {
        if let Some(own) = schema.tag() {
            return Ok(own.matches(tag));
        }
        Ok(match schema.kind() {
            Kind::Any => true,
            Kind::Choice(alternatives) => {
                for alternative in alternatives {
                    if self.starts_with(&alternative.schema, tag, depth)? {
                        return Ok(true);
                    }
                }
                false
            }
            Kind::Deferred(name) => {
                self.check_depth(name, depth)?;
                let target = self.catalog.schema(name)?;
                self.starts_with(&target, tag, depth + 1)?
            }
            kind => kind.universal_tag() == Some(tag),
        })
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<()> {
        let limit = self.catalog.config().max_depth;
        ensure_err!(
            depth <= limit,
            Error::DepthExceeded {
                path: path.to_owned(),
                limit,
            }
        );
        Ok(())
    }
}

fn read_tlv<'a>(reader: &mut SliceReader<'a>, path: &str) -> Result<AnyRef<'a>> {
    AnyRef::decode(reader).map_err(|e| Error::codec(path, e))
}

fn primitive<'a, T>(tag: Tag, bytes: &'a [u8], path: &str) -> Result<T>
where
    T: Choice<'a> + DecodeValue<'a>,
{
    AnyRef::new(tag, bytes)
        .and_then(AnyRef::decode_as)
        .map_err(|e| Error::codec(path, e))
}

fn finish(reader: &SliceReader<'_>, path: &str) -> Result<()> {
    let remaining = usize::try_from(reader.remaining_len()).map_err(|e| Error::codec(path, e))?;
    ensure_err!(
        remaining == 0,
        Error::TrailingData {
            path: path.to_owned(),
            remaining,
        }
    );
    Ok(())
}
