//! Run-time description of ASN.1 types.
//!
//! A [`SchemaNode`] is built once and shared as a [`Schema`] (an `Arc`) by
//! every enclosing type, registry entry and catalog name that refers to it.
//! Nodes are never mutated after construction. Deriving a tagged,
//! constrained or named variant produces a new node and leaves the original
//! untouched.

pub mod constraint;
pub mod value;

use {
    self::{constraint::Constraint, value::Value},
    crate::error::SchemaDefinitionError,
    der::{Class, Tag, TagNumber},
    std::{
        fmt::{self, Display, Formatter},
        sync::Arc,
    },
};

pub type Schema = Arc<SchemaNode>;

/// Largest tag number that fits the low-tag-number form.
pub const MAX_TAG_NUMBER: u8 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagClass {
    Application,
    Context,
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagMode {
    Explicit,
    Implicit,
}

/// Tag that replaces (implicit) or wraps (explicit) the natural tag of a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagOverride {
    pub class:  TagClass,
    pub number: u8,
    pub mode:   TagMode,
}

impl TagOverride {
    pub const fn context(number: u8, mode: TagMode) -> Self {
        Self {
            class: TagClass::Context,
            number,
            mode,
        }
    }

    const fn der_class(self) -> Class {
        match self.class {
            TagClass::Application => Class::Application,
            TagClass::Context => Class::ContextSpecific,
            TagClass::Private => Class::Private,
        }
    }

    /// Wire tag. Explicit tags are always constructed.
    pub(crate) fn der_tag(self, constructed: bool) -> Tag {
        let constructed = constructed || self.mode == TagMode::Explicit;
        let number = TagNumber::new(self.number);
        match self.class {
            TagClass::Application => Tag::Application {
                constructed,
                number,
            },
            TagClass::Context => Tag::ContextSpecific {
                constructed,
                number,
            },
            TagClass::Private => Tag::Private {
                constructed,
                number,
            },
        }
    }

    /// Class and number match, and an explicit tag is constructed. For an
    /// implicit tag the constructed bit depends on the underlying kind.
    pub(crate) fn matches(self, tag: Tag) -> bool {
        tag.class() == self.der_class()
            && tag.number().value() == self.number
            && (self.mode == TagMode::Implicit || tag.is_constructed())
    }
}

impl Display for TagOverride {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let class = match self.class {
            TagClass::Application => "APPLICATION ",
            TagClass::Context => "",
            TagClass::Private => "PRIVATE ",
        };
        let mode = match self.mode {
            TagMode::Explicit => "EXPLICIT",
            TagMode::Implicit => "IMPLICIT",
        };
        write!(f, "[{class}{}] {mode}", self.number)
    }
}

/// Character string and time types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextKind {
    Utf8,
    Printable,
    Ia5,
    Visible,
    Numeric,
    /// Read and written as Latin-1.
    Teletex,
    /// UCS-2, big endian.
    Bmp,
    UtcTime,
    GeneralizedTime,
}

impl TextKind {
    pub const fn tag(self) -> Tag {
        match self {
            Self::Utf8 => Tag::Utf8String,
            Self::Printable => Tag::PrintableString,
            Self::Ia5 => Tag::Ia5String,
            Self::Visible => Tag::VisibleString,
            Self::Numeric => Tag::NumericString,
            Self::Teletex => Tag::TeletexString,
            Self::Bmp => Tag::BmpString,
            Self::UtcTime => Tag::UtcTime,
            Self::GeneralizedTime => Tag::GeneralizedTime,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF8String",
            Self::Printable => "PrintableString",
            Self::Ia5 => "IA5String",
            Self::Visible => "VisibleString",
            Self::Numeric => "NumericString",
            Self::Teletex => "TeletexString",
            Self::Bmp => "BMPString",
            Self::UtcTime => "UTCTime",
            Self::GeneralizedTime => "GeneralizedTime",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Boolean,
    Integer,
    Enumerated,
    BitString,
    OctetString,
    Null,
    ObjectIdentifier,
    Text(TextKind),
    Sequence(Vec<Component>),
    SequenceOf(Schema),
    SetOf(Schema),
    Choice(Vec<Component>),
    /// Any single TLV. Decoded values stay raw unless resolved as an open type.
    Any,
    /// Reference to a type defined in the catalog, resolved on use.
    Deferred(String),
}

impl Kind {
    /// Natural tag of an untagged value, `None` for kinds without one.
    pub const fn universal_tag(&self) -> Option<Tag> {
        Some(match self {
            Self::Boolean => Tag::Boolean,
            Self::Integer => Tag::Integer,
            Self::Enumerated => Tag::Enumerated,
            Self::BitString => Tag::BitString,
            Self::OctetString => Tag::OctetString,
            Self::Null => Tag::Null,
            Self::ObjectIdentifier => Tag::ObjectIdentifier,
            Self::Text(kind) => kind.tag(),
            Self::Sequence(_) | Self::SequenceOf(_) => Tag::Sequence,
            Self::SetOf(_) => Tag::Set,
            Self::Choice(_) | Self::Any | Self::Deferred(_) => return None,
        })
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Integer => "INTEGER",
            Self::Enumerated => "ENUMERATED",
            Self::BitString => "BIT STRING",
            Self::OctetString => "OCTET STRING",
            Self::Null => "NULL",
            Self::ObjectIdentifier => "OBJECT IDENTIFIER",
            Self::Text(kind) => kind.name(),
            Self::Sequence(_) => "SEQUENCE",
            Self::SequenceOf(_) => "SEQUENCE OF",
            Self::SetOf(_) => "SET OF",
            Self::Choice(_) => "CHOICE",
            Self::Any => "ANY",
            Self::Deferred(_) => "deferred reference",
        }
    }
}

/// Selects the type of an open field from a registry, keyed by the value of an
/// earlier OBJECT IDENTIFIER field of the same sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OpenTypeBinding {
    pub selector: String,
    pub registry: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Default(Value),
}

/// Named field of a SEQUENCE, or alternative of a CHOICE.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub name:     String,
    pub schema:   Schema,
    pub presence: Presence,
}

impl Component {
    pub fn required(name: &str, schema: &Schema) -> Self {
        Self::new(name, schema, Presence::Required)
    }

    pub fn optional(name: &str, schema: &Schema) -> Self {
        Self::new(name, schema, Presence::Optional)
    }

    pub fn defaulted(name: &str, schema: &Schema, default: Value) -> Self {
        Self::new(name, schema, Presence::Default(default))
    }

    fn new(name: &str, schema: &Schema, presence: Presence) -> Self {
        Self {
            name: name.to_owned(),
            schema: Arc::clone(schema),
            presence,
        }
    }

    pub const fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }
}

#[derive(Clone, Debug)]
pub struct SchemaNode {
    kind:        Kind,
    tag:         Option<TagOverride>,
    constraints: Vec<Constraint>,
    open_type:   Option<OpenTypeBinding>,
    name:        Option<Arc<str>>,
}

/// Structural equality. Diagnostic names are ignored.
impl PartialEq for SchemaNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.tag == other.tag
            && self.constraints == other.constraints
            && self.open_type == other.open_type
    }
}

impl Eq for SchemaNode {}

impl SchemaNode {
    fn new(kind: Kind) -> Schema {
        Arc::new(Self {
            kind,
            tag: None,
            constraints: Vec::new(),
            open_type: None,
            name: None,
        })
    }

    pub fn boolean() -> Schema {
        Self::new(Kind::Boolean)
    }

    pub fn integer() -> Schema {
        Self::new(Kind::Integer)
    }

    pub fn enumerated() -> Schema {
        Self::new(Kind::Enumerated)
    }

    pub fn bit_string() -> Schema {
        Self::new(Kind::BitString)
    }

    pub fn octet_string() -> Schema {
        Self::new(Kind::OctetString)
    }

    pub fn null() -> Schema {
        Self::new(Kind::Null)
    }

    pub fn object_identifier() -> Schema {
        Self::new(Kind::ObjectIdentifier)
    }

    pub fn text(kind: TextKind) -> Schema {
        Self::new(Kind::Text(kind))
    }

    pub fn utf8_string() -> Schema {
        Self::text(TextKind::Utf8)
    }

    pub fn printable_string() -> Schema {
        Self::text(TextKind::Printable)
    }

    pub fn ia5_string() -> Schema {
        Self::text(TextKind::Ia5)
    }

    pub fn visible_string() -> Schema {
        Self::text(TextKind::Visible)
    }

    pub fn numeric_string() -> Schema {
        Self::text(TextKind::Numeric)
    }

    pub fn teletex_string() -> Schema {
        Self::text(TextKind::Teletex)
    }

    pub fn bmp_string() -> Schema {
        Self::text(TextKind::Bmp)
    }

    pub fn utc_time() -> Schema {
        Self::text(TextKind::UtcTime)
    }

    pub fn generalized_time() -> Schema {
        Self::text(TextKind::GeneralizedTime)
    }

    pub fn any() -> Schema {
        Self::new(Kind::Any)
    }

    pub fn sequence_of(element: &Schema) -> Schema {
        Self::new(Kind::SequenceOf(Arc::clone(element)))
    }

    pub fn set_of(element: &Schema) -> Schema {
        Self::new(Kind::SetOf(Arc::clone(element)))
    }

    /// Reference to a catalog type that may not be defined yet.
    pub fn deferred(name: &str) -> Schema {
        Self::new(Kind::Deferred(name.to_owned()))
    }

    /// SEQUENCE with components in wire order.
    pub fn sequence(
        components: impl IntoIterator<Item = Component>,
    ) -> Result<Schema, SchemaDefinitionError> {
        let components: Vec<_> = components.into_iter().collect();
        check_names("SEQUENCE", &components)?;
        check_bindings(&components)?;
        Ok(Self::new(Kind::Sequence(components)))
    }

    /// CHOICE. Decoding selects the first alternative whose tag matches.
    pub fn choice(
        alternatives: impl IntoIterator<Item = Component>,
    ) -> Result<Schema, SchemaDefinitionError> {
        let mut alternatives: Vec<_> = alternatives.into_iter().collect();
        check_names("CHOICE", &alternatives)?;
        for alternative in &mut alternatives {
            if alternative.schema.open_type.is_some() {
                return Err(SchemaDefinitionError::InvalidBinding {
                    field:    alternative.name.clone(),
                    selector: String::new(),
                    reason:   "open types must be sequence components",
                });
            }
            alternative.presence = Presence::Required;
        }
        for (i, first) in alternatives.iter().enumerate() {
            let Some(first_tags) = first.schema.leading_tags() else {
                continue;
            };
            for second in &alternatives[i + 1..] {
                let Some(second_tags) = second.schema.leading_tags() else {
                    continue;
                };
                if first_tags.iter().any(|tag| second_tags.contains(tag)) {
                    return Err(SchemaDefinitionError::AmbiguousChoice {
                        first:  first.name.clone(),
                        second: second.name.clone(),
                    });
                }
            }
        }
        Ok(Self::new(Kind::Choice(alternatives)))
    }

    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    pub const fn tag(&self) -> Option<TagOverride> {
        self.tag
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub const fn open_type(&self) -> Option<&OpenTypeBinding> {
        self.open_type.as_ref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Components of a SEQUENCE or alternatives of a CHOICE.
    pub fn components(&self) -> &[Component] {
        match &self.kind {
            Kind::Sequence(components) | Kind::Choice(components) => components,
            _ => &[],
        }
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components().iter().find(|c| c.name == name)
    }

    /// `[n] EXPLICIT` context tag.
    pub fn explicit(&self, number: u8) -> Result<Schema, SchemaDefinitionError> {
        self.tagged(TagOverride::context(number, TagMode::Explicit))
    }

    /// `[n] IMPLICIT` context tag. Promoted to explicit for CHOICE and ANY.
    pub fn implicit(&self, number: u8) -> Result<Schema, SchemaDefinitionError> {
        self.tagged(TagOverride::context(number, TagMode::Implicit))
    }

    pub fn tagged(&self, tag: TagOverride) -> Result<Schema, SchemaDefinitionError> {
        if tag.number > MAX_TAG_NUMBER {
            return Err(SchemaDefinitionError::InvalidTag(format!(
                "tag number {} exceeds {MAX_TAG_NUMBER}",
                tag.number
            )));
        }
        if let Some(existing) = self.tag {
            return Err(SchemaDefinitionError::InvalidTag(format!(
                "{} is already tagged {existing}",
                self.display_name()
            )));
        }
        let mode = match (&self.kind, tag.mode) {
            (Kind::Choice(_) | Kind::Any, TagMode::Implicit) => TagMode::Explicit,
            (Kind::Deferred(name), TagMode::Implicit) => {
                return Err(SchemaDefinitionError::InvalidTag(format!(
                    "implicit tag on deferred reference `{name}`"
                )))
            }
            (_, mode) => mode,
        };
        Ok(Arc::new(Self {
            tag: Some(TagOverride { mode, ..tag }),
            ..self.clone()
        }))
    }

    /// Same type with an additional constraint. All constraints must hold.
    pub fn constrained(&self, constraint: Constraint) -> Schema {
        let mut node = self.clone();
        node.constraints.push(constraint);
        Arc::new(node)
    }

    /// Declare this field an open type selected by `selector` from `registry`.
    ///
    /// Legal on ANY, OCTET STRING (the octets hold the encoding) and
    /// SEQUENCE OF / SET OF ANY. Checked when the enclosing SEQUENCE is built.
    pub fn bound_to(&self, selector: &str, registry: &str) -> Schema {
        Arc::new(Self {
            open_type: Some(OpenTypeBinding {
                selector: selector.to_owned(),
                registry: registry.to_owned(),
            }),
            ..self.clone()
        })
    }

    pub fn named(&self, name: &str) -> Schema {
        Arc::new(Self {
            name: Some(name.into()),
            ..self.clone()
        })
    }

    pub fn display_name(&self) -> &str {
        self.name().unwrap_or_else(|| self.kind.name())
    }

    /// Tags a value of this type can start with, `None` if unknown or any.
    fn leading_tags(&self) -> Option<Vec<(Class, u8)>> {
        if let Some(tag) = self.tag {
            return Some(vec![(tag.der_class(), tag.number)]);
        }
        match &self.kind {
            Kind::Choice(alternatives) => {
                let mut tags = Vec::new();
                for alternative in alternatives {
                    tags.extend(alternative.schema.leading_tags()?);
                }
                Some(tags)
            }
            kind => kind
                .universal_tag()
                .map(|tag| vec![(tag.class(), tag.number().value())]),
        }
    }
}

impl Display for SchemaNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag {
            write!(f, "{tag} ")?;
        }
        f.write_str(self.display_name())?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

fn check_names(container: &'static str, components: &[Component]) -> Result<(), SchemaDefinitionError> {
    if components.is_empty() {
        return Err(SchemaDefinitionError::Empty(container));
    }
    for (i, component) in components.iter().enumerate() {
        if components[..i].iter().any(|c| c.name == component.name) {
            return Err(SchemaDefinitionError::DuplicateComponent(
                component.name.clone(),
            ));
        }
    }
    Ok(())
}

fn check_bindings(components: &[Component]) -> Result<(), SchemaDefinitionError> {
    for (i, component) in components.iter().enumerate() {
        let Some(binding) = component.schema.open_type() else {
            continue;
        };
        let invalid = |reason| SchemaDefinitionError::InvalidBinding {
            field: component.name.clone(),
            selector: binding.selector.clone(),
            reason,
        };
        let holds_encoding = match component.schema.kind() {
            Kind::Any | Kind::OctetString => true,
            Kind::SequenceOf(element) | Kind::SetOf(element) => {
                matches!(element.kind(), Kind::Any) && element.tag().is_none()
            }
            _ => false,
        };
        if !holds_encoding {
            return Err(invalid(
                "only ANY, OCTET STRING or a collection of ANY can be an open type",
            ));
        }
        let selector = components[..i]
            .iter()
            .find(|c| c.name == binding.selector)
            .ok_or_else(|| invalid("selector must be an earlier component"))?;
        if selector.schema.kind() != &Kind::ObjectIdentifier || selector.schema.tag().is_some() {
            return Err(invalid("selector must be a plain OBJECT IDENTIFIER"));
        }
    }
    Ok(())
}
