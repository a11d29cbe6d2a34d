//! Error types for dict operations
//!
//! Every fallible operation returns [`DictResult<T>`]. Errors are raised at the
//! point of violation and carry no recovery state; [`DictError::kind`] groups
//! them into the broad classes callers usually branch on.

use crate::AutoStr;
use miette::Diagnostic;
use thiserror::Error;

/// Broad class of a [`DictError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// Unsupported argument shape or key type
    Type,
    /// Attribute-style write to a name owned by the dict API
    AttributeReadOnly,
    /// Delete of an absent key, or a new key on a frozen dict
    MissingKey,
    /// `+` between incompatible operands
    UnsupportedOperand,
    /// Path traversal through a value that is not a mapping
    NotADict,
    /// Encoding to an external format failed
    Serialization,
}

/// Error type for dict operations
///
/// # Examples
///
/// ```rust
/// use auto_dict::{DictError, ErrorKind};
///
/// let err = DictError::MissingKey { key: "'a'".into() };
/// assert_eq!(err.to_string(), "missing key 'a'");
/// assert_eq!(err.kind(), ErrorKind::MissingKey);
/// ```
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum DictError {
    /// Positional argument that is neither a mapping nor pairs
    #[error("auto-dict does not understand {found} types")]
    #[diagnostic(
        code(auto_dict_E0001),
        help("Pass a mapping, a (key, value) tuple or a sequence of pairs")
    )]
    UnsupportedArg { found: AutoStr },

    /// Sequence element that does not unpack into exactly two items
    #[error("expected a (key, value) pair, found {len} items")]
    #[diagnostic(code(auto_dict_E0002))]
    BadPair { len: usize },

    /// Value that cannot be used as a key
    #[error("unhashable type: '{found}'")]
    #[diagnostic(
        code(auto_dict_E0003),
        help("Keys must be strings, integers, booleans or tuples of those")
    )]
    Unhashable { found: AutoStr },

    /// More than one positional source passed to `update`
    #[error("update expected at most 1 positional argument, got {count}")]
    #[diagnostic(code(auto_dict_E0004))]
    TooManyArgs { count: usize },

    /// Empty key path
    #[error("empty key path")]
    #[diagnostic(code(auto_dict_E0005), help("A path needs at least one key"))]
    EmptyPath,

    #[error("'Dict' object attribute '{name}' is read-only")]
    #[diagnostic(
        code(auto_dict_E0101),
        help("'{name}' names a Dict operation; store it with `set` instead")
    )]
    ReadOnly { name: AutoStr },

    #[error("missing key {key}")]
    #[diagnostic(code(auto_dict_E0201))]
    MissingKey { key: AutoStr },

    #[error("unsupported operand type(s) for {op}: '{left}' and '{right}'")]
    #[diagnostic(code(auto_dict_E0301))]
    UnsupportedOperand {
        op: &'static str,
        left: AutoStr,
        right: AutoStr,
    },

    #[error("cannot descend into key {key}: value is {found}, not a mapping")]
    #[diagnostic(code(auto_dict_E0401))]
    NotADict { key: AutoStr, found: AutoStr },

    #[error("serialization error: {format} - {message}")]
    #[diagnostic(code(auto_dict_E0501))]
    Serialization { format: AutoStr, message: AutoStr },
}

impl DictError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DictError::UnsupportedArg { .. }
            | DictError::BadPair { .. }
            | DictError::Unhashable { .. }
            | DictError::TooManyArgs { .. }
            | DictError::EmptyPath => ErrorKind::Type,
            DictError::ReadOnly { .. } => ErrorKind::AttributeReadOnly,
            DictError::MissingKey { .. } => ErrorKind::MissingKey,
            DictError::UnsupportedOperand { .. } => ErrorKind::UnsupportedOperand,
            DictError::NotADict { .. } => ErrorKind::NotADict,
            DictError::Serialization { .. } => ErrorKind::Serialization,
        }
    }

    pub(crate) fn json(err: serde_json::Error) -> Self {
        DictError::Serialization {
            format: "JSON".into(),
            message: err.to_string().into(),
        }
    }
}

/// Result type for dict operations
pub type DictResult<T> = Result<T, DictError>;
