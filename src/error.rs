use {
    crate::{oid::Oid, schema::constraint::Constraint},
    der::Tag,
    thiserror::Error,
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A schema that cannot be built as described.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaDefinitionError {
    #[error("{0} must have at least one component")]
    Empty(&'static str),

    #[error("constraint {0} admits no value")]
    EmptyRange(String),

    #[error("duplicate component name `{0}`")]
    DuplicateComponent(String),

    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("alternatives `{first}` and `{second}` start with the same tag")]
    AmbiguousChoice { first: String, second: String },

    #[error("open type `{field}` cannot be selected by `{selector}`: {reason}")]
    InvalidBinding {
        field:    String,
        selector: String,
        reason:   &'static str,
    },

    #[error("unknown schema type `{0}`")]
    UnknownType(String),

    #[error("schema type `{0}` is already defined differently")]
    Redefined(String),

    #[error("unknown catalog module `{0}`")]
    UnknownModule(String),

    #[error("catalog module `{0}` depends on itself")]
    DependencyCycle(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Definition(#[from] SchemaDefinitionError),

    #[error("{path}: value violates constraint {constraint}")]
    ConstraintViolation { path: String, constraint: Constraint },

    #[error("registry `{registry}` already maps {oid} to a different schema")]
    RegistryConflict { registry: String, oid: Oid },

    #[error(transparent)]
    Der(#[from] der::Error),

    #[error("{path}: {source}")]
    Codec {
        path:   String,
        #[source]
        source: der::Error,
    },

    #[error("{path}: expected {expected}, found {found}")]
    Mismatch {
        path:     String,
        expected: String,
        found:    String,
    },

    #[error("{path}: no alternative starts with tag {tag}")]
    NoAlternative { path: String, tag: Tag },

    #[error("{path}: missing required component")]
    MissingComponent { path: String },

    #[error("{path}: no component named `{name}`")]
    UnknownComponent { path: String, name: String },

    #[error("{path}: {remaining} bytes of trailing data")]
    TrailingData { path: String, remaining: usize },

    #[error("{path}: schema nesting deeper than {limit}")]
    DepthExceeded { path: String, limit: usize },
}

impl Error {
    pub(crate) fn codec(path: &str, source: der::Error) -> Self {
        Self::Codec {
            path: path.to_owned(),
            source,
        }
    }

    pub(crate) fn mismatch(path: &str, expected: impl ToString, found: impl ToString) -> Self {
        Self::Mismatch {
            path:     path.to_owned(),
            expected: expected.to_string(),
            found:    found.to_string(),
        }
    }
}
