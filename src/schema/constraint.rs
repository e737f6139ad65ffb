//! Subtype constraints.
//!
//! Constraints are predicates over decoded [`Value`]s. They do not look at
//! the encoding, so the same check runs before encoding and after decoding.

use {
    super::value::{int_is_negative, int_to_i128, Value},
    crate::error::SchemaDefinitionError,
    std::{
        fmt::{self, Display, Formatter},
        ops::{Bound, RangeBounds},
    },
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Inclusive bounds on the size of a value, `max: None` is unbounded.
    ///
    /// Size is counted in octets for OCTET STRING, bits for BIT STRING,
    /// characters for character strings and elements for SEQUENCE OF / SET OF.
    SizeRange { min: u64, max: Option<u64> },

    /// Inclusive bounds on an INTEGER or ENUMERATED value.
    ValueRange { min: Option<i128>, max: Option<i128> },

    /// Satisfied if any member is.
    Union(Vec<Constraint>),

    /// The named SEQUENCE component is present, or the named CHOICE
    /// alternative is selected.
    ComponentPresent(String),
}

impl Constraint {
    /// `SIZE(..)` from a range, `Constraint::size(1..=64)` is `SIZE(1..64)`.
    pub fn size(range: impl RangeBounds<u64>) -> Result<Self, SchemaDefinitionError> {
        let min = match range.start_bound() {
            Bound::Included(&n) => Some(n),
            Bound::Excluded(&n) => n.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let max = match range.end_bound() {
            Bound::Included(&n) => Some(Some(n)),
            Bound::Excluded(&n) => n.checked_sub(1).map(Some),
            Bound::Unbounded => Some(None),
        };
        match (min, max) {
            (Some(min), Some(max)) if max.map_or(true, |max| min <= max) => {
                Ok(Self::SizeRange { min, max })
            }
            _ => Err(SchemaDefinitionError::EmptyRange(format!("SIZE{}", bounds(&range)))),
        }
    }

    /// `SIZE(1..MAX)`.
    pub const fn non_empty() -> Self {
        Self::SizeRange { min: 1, max: None }
    }

    /// Value range, `Constraint::value(0..=255)`.
    pub fn value(range: impl RangeBounds<i128>) -> Result<Self, SchemaDefinitionError> {
        let min = match range.start_bound() {
            Bound::Included(&n) => Some(Some(n)),
            Bound::Excluded(&n) => n.checked_add(1).map(Some),
            Bound::Unbounded => Some(None),
        };
        let max = match range.end_bound() {
            Bound::Included(&n) => Some(Some(n)),
            Bound::Excluded(&n) => n.checked_sub(1).map(Some),
            Bound::Unbounded => Some(None),
        };
        match (min, max) {
            (Some(min), Some(max)) if min.zip(max).map_or(true, |(min, max)| min <= max) => {
                Ok(Self::ValueRange { min, max })
            }
            _ => Err(SchemaDefinitionError::EmptyRange(bounds(&range))),
        }
    }

    /// Exact size, `SIZE(n)`.
    pub const fn fixed_size(n: u64) -> Self {
        Self::SizeRange {
            min: n,
            max: Some(n),
        }
    }

    pub fn union(members: impl IntoIterator<Item = Self>) -> Self {
        Self::Union(members.into_iter().collect())
    }

    pub fn present(component: &str) -> Self {
        Self::ComponentPresent(component.to_owned())
    }

    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::SizeRange { min, max } => size_of(value).is_some_and(|size| {
                size >= *min && max.map_or(true, |max| size <= max)
            }),
            Self::ValueRange { min, max } => value_in_range(value, *min, *max),
            Self::Union(members) => members.iter().any(|c| c.accepts(value)),
            Self::ComponentPresent(name) => match value {
                Value::Sequence(fields) => fields.contains(name),
                Value::Choice { alternative, .. } => alternative == name,
                _ => false,
            },
        }
    }
}

fn size_of(value: &Value) -> Option<u64> {
    let size = match value {
        Value::OctetString(bytes) => bytes.len(),
        Value::BitString(bits) => bits.bit_len(),
        Value::Text(text) => text.chars().count(),
        Value::SequenceOf(items) => items.len(),
        _ => return None,
    };
    u64::try_from(size).ok()
}

fn value_in_range(value: &Value, min: Option<i128>, max: Option<i128>) -> bool {
    let (Value::Integer(int) | Value::Enumerated(int)) = value else {
        return false;
    };
    match int_to_i128(int) {
        Some(n) => min.map_or(true, |min| n >= min) && max.map_or(true, |max| n <= max),
        // Beyond i128: only the sign matters against finite bounds.
        None if int_is_negative(int) => min.is_none(),
        None => max.is_none(),
    }
}

impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeRange { min, max: Some(max) } if min == max => write!(f, "SIZE({min})"),
            Self::SizeRange { min, max } => {
                write!(f, "SIZE({min}..")?;
                match max {
                    Some(max) => write!(f, "{max})"),
                    None => f.write_str("MAX)"),
                }
            }
            Self::ValueRange { min, max } => {
                match min {
                    Some(min) => write!(f, "({min}..")?,
                    None => f.write_str("(MIN..")?,
                }
                match max {
                    Some(max) => write!(f, "{max})"),
                    None => f.write_str("MAX)"),
                }
            }
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::ComponentPresent(name) => write!(f, "WITH COMPONENT {name} PRESENT"),
        }
    }
}

/// Range bounds as written, for error messages.
fn bounds<T: Display>(range: &impl RangeBounds<T>) -> String {
    let start = match range.start_bound() {
        Bound::Included(n) => n.to_string(),
        Bound::Excluded(n) => format!("{n}<"),
        Bound::Unbounded => "MIN".to_owned(),
    };
    let end = match range.end_bound() {
        Bound::Included(n) => n.to_string(),
        Bound::Excluded(n) => format!("<{n}"),
        Bound::Unbounded => "MAX".to_owned(),
    };
    format!("({start}..{end})")
}
