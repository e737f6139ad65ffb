//! Decoded values.

use {
    super::Schema,
    crate::oid::Oid,
    der::{
        asn1::{AnyRef, BitString, Int},
        Any, Decode, Encode,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Boolean(bool),
    Integer(Int),
    Enumerated(Int),
    BitString(BitString),
    OctetString(Vec<u8>),
    Null,
    ObjectIdentifier(Oid),
    /// Character strings and times, as text.
    Text(String),
    Sequence(Fields),
    /// Elements of a SEQUENCE OF or SET OF.
    SequenceOf(Vec<Value>),
    Choice {
        alternative: String,
        value:       Box<Value>,
    },
    Open(OpenValue),
}

/// Content of an open-type field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenValue {
    /// No schema is registered for the selector, the encoding is kept as is.
    Raw(Any),

    /// Decoded with the schema registered for the selector.
    Resolved { schema: Schema, value: Box<Value> },
}

/// SEQUENCE components in wire order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields(Vec<(String, Value)>);

impl Fields {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder style [`Fields::insert`].
    #[must_use]
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, keeping its position if it already exists.
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        match self.get_mut(name) {
            Some(existing) => Some(std::mem::replace(existing, value)),
            None => {
                self.0.push((name.to_owned(), value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(index).1)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, Value)> for Fields {
    fn from_iter<T: IntoIterator<Item = (&'a str, Value)>>(iter: T) -> Self {
        let mut fields = Self::new();
        for (name, value) in iter {
            fields.insert(name, value);
        }
        fields
    }
}

impl Value {
    pub fn integer(n: i64) -> der::Result<Self> {
        Ok(Self::Integer(int_from_i64(n)?))
    }

    pub fn enumerated(n: i64) -> der::Result<Self> {
        Ok(Self::Enumerated(int_from_i64(n)?))
    }

    pub fn text(text: &str) -> Self {
        Self::Text(text.to_owned())
    }

    pub fn sequence<'a>(fields: impl IntoIterator<Item = (&'a str, Self)>) -> Self {
        Self::Sequence(fields.into_iter().collect())
    }

    pub fn choice(alternative: &str, value: Self) -> Self {
        Self::Choice {
            alternative: alternative.to_owned(),
            value:       Box::new(value),
        }
    }

    /// Raw open-type content from a complete TLV encoding.
    pub fn raw(der: &[u8]) -> der::Result<Self> {
        Ok(Self::Open(OpenValue::Raw(Any::from_der(der)?)))
    }

    /// Value behind a resolved open type, otherwise `self`.
    pub fn resolved(&self) -> &Self {
        match self {
            Self::Open(OpenValue::Resolved { value, .. }) => value.resolved(),
            other => other,
        }
    }

    /// Look up a value by path.
    ///
    /// Segments are separated by `.`, list elements are addressed as
    /// `name[i]` or `[i]`, choice alternatives by name. Resolved open types
    /// are looked through.
    ///
    /// ```
    /// # use asn1_catalog::Value;
    /// let value = Value::sequence([(
    ///     "names",
    ///     Value::SequenceOf(vec![Value::choice("dNSName", Value::text("example.com"))]),
    /// )]);
    /// assert_eq!(
    ///     value.get("names[0].dNSName").and_then(Value::as_str),
    ///     Some("example.com")
    /// );
    /// ```
    pub fn get(&self, path: &str) -> Option<&Self> {
        let mut current = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let (name, indices) = match segment.find('[') {
                Some(open) => (&segment[..open], &segment[open..]),
                None => (segment, ""),
            };
            if !name.is_empty() {
                current = match current.resolved() {
                    Self::Sequence(fields) => fields.get(name)?,
                    Self::Choice { alternative, value } if alternative == name => &**value,
                    _ => return None,
                };
            }
            for index in indices.split('[').filter(|s| !s.is_empty()) {
                let index: usize = index.strip_suffix(']')?.parse().ok()?;
                current = match current.resolved() {
                    Self::SequenceOf(items) => items.get(index)?,
                    _ => return None,
                };
            }
        }
        Some(current.resolved())
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i128(&self) -> Option<i128> {
        match self.resolved() {
            Self::Integer(int) | Self::Enumerated(int) => int_to_i128(int),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_i128().and_then(|n| i64::try_from(n).ok())
    }

    pub fn as_oid(&self) -> Option<Oid> {
        match self.resolved() {
            Self::ObjectIdentifier(oid) => Some(*oid),
            _ => None,
        }
    }

    /// Octets of an OCTET STRING, or of a BIT STRING.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self.resolved() {
            Self::OctetString(bytes) => Some(bytes.as_slice()),
            Self::BitString(bits) => Some(bits.raw_bytes()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.resolved() {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&Fields> {
        match self.resolved() {
            Self::Sequence(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Self]> {
        match self.resolved() {
            Self::SequenceOf(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<(&str, &Self)> {
        match self.resolved() {
            Self::Choice { alternative, value } => Some((alternative.as_str(), &**value)),
            _ => None,
        }
    }

    pub const fn as_open(&self) -> Option<&OpenValue> {
        match self {
            Self::Open(open) => Some(open),
            _ => None,
        }
    }

    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Open(OpenValue::Resolved { .. }))
    }

    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "BOOLEAN",
            Self::Integer(_) => "INTEGER",
            Self::Enumerated(_) => "ENUMERATED",
            Self::BitString(_) => "BIT STRING",
            Self::OctetString(_) => "OCTET STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier(_) => "OBJECT IDENTIFIER",
            Self::Text(_) => "string",
            Self::Sequence(_) => "SEQUENCE",
            Self::SequenceOf(_) => "SEQUENCE OF",
            Self::Choice { .. } => "CHOICE",
            Self::Open(OpenValue::Raw(_)) => "raw open type",
            Self::Open(OpenValue::Resolved { .. }) => "resolved open type",
        }
    }
}

pub(crate) fn int_from_i64(n: i64) -> der::Result<Int> {
    Int::from_der(&n.to_der()?)
}

/// Minimal two's complement content octets of an INTEGER.
pub(crate) fn int_content(int: &Int) -> der::Result<Vec<u8>> {
    let der = int.to_der()?;
    Ok(AnyRef::from_der(&der)?.value().to_vec())
}

pub(crate) fn int_to_i128(int: &Int) -> Option<i128> {
    let bytes = int_content(int).ok()?;
    if bytes.is_empty() || bytes.len() > 16 {
        return None;
    }
    let fill = if bytes[0] & 0x80 == 0 { 0x00 } else { 0xff };
    let mut buf = [fill; 16];
    buf[16 - bytes.len()..].copy_from_slice(&bytes);
    Some(i128::from_be_bytes(buf))
}

pub(crate) fn int_is_negative(int: &Int) -> bool {
    int_content(int).is_ok_and(|bytes| bytes.first().is_some_and(|b| b & 0x80 != 0))
}
