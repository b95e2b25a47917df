use std::fmt::Display;

use serde_json::Value;
use thiserror::Error;

use crate::encoding::leaf::ScalarKind;

/// Failures of the string transcoder.
#[derive(Error, Debug)]
pub enum Error {
    #[error("expected {expected}, found {found}")]
    ShapeMismatch { expected: &'static str, found: &'static str },
    #[error("cannot coerce {value:?} into {kind}: {reason}")]
    InvalidLeaf { kind: ScalarKind, value: String, reason: String },
    #[error("unsupported shape: {0}")]
    Unsupported(&'static str),
    #[error("{0}")]
    Message(String),
    #[error("at `{path}`: {source}")]
    AtPath { path: String, source: Box<Error> },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        Self::ShapeMismatch { expected, found: kind_name(found) }
    }

    /// Attach a JSON path. The root path (`.`) adds nothing.
    pub(crate) fn at(path: String, source: Error) -> Self {
        if path.is_empty() || path == "." {
            source
        } else {
            Self::AtPath { path, source: Box::new(source) }
        }
    }

    /// The innermost error, with any path wrappers removed.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::AtPath { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Self::AtPath { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }
}

pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
