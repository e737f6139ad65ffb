//! Schema driven DER codec.
//!
//! Framing (tags, lengths) and primitive content rules are delegated to the
//! `der` crate. This module walks a [`Schema`](crate::Schema) and assembles
//! [`Value`](crate::Value)s from the pieces, resolving open types through the
//! catalog's registries.

mod decoder;
mod encoder;
mod text;

pub(crate) use self::{decoder::Decoder, encoder::Encoder};
use {
    crate::{
        error::{Error, Result},
        schema::Kind,
    },
    tracing::warn,
};

/// How to handle correctable problems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Leniency {
    /// Accept silently.
    Allow,

    /// Accept, but log a warning.
    Warn,

    /// Be strict and return an error.
    Strict,
}

pub(crate) fn lenient(leniency: Leniency, error: impl FnOnce() -> Error) -> Result<()> {
    match leniency {
        Leniency::Strict => Err(error()),
        Leniency::Warn => {
            warn!("{}", error());
            Ok(())
        }
        Leniency::Allow => Ok(()),
    }
}

const fn is_constructed(kind: &Kind) -> bool {
    matches!(
        kind,
        Kind::Sequence(_) | Kind::SequenceOf(_) | Kind::SetOf(_)
    )
}

fn child_path(path: &str, name: &str) -> String {
    format!("{path}.{name}")
}

fn index_path(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}
