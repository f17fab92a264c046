use crate::tag::TagKind;
use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Alias for [`Error`], the single failure type returned by every decode entry point.
pub type DecodeError = Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Occurs when the byte source can't be read, or its compression envelope isn't valid. Also
    /// occurs when the decompressed stream grows past the configured maximum size.
    Transport(String),
    /// The tag stream ended before a value was complete.
    TruncatedInput {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// A signed length prefix was negative.
    MalformedLength { step: &'static str, length: i64 },
    /// The tag stream was well-framed, but isn't a schematic this crate accepts.
    SchemaViolation(Violation),
}

/// Failure category of an [`Error`], without any of the diagnostic payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Transport,
    TruncatedInput,
    MalformedLength,
    SchemaViolation,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_) => ErrorKind::Transport,
            Error::TruncatedInput { .. } => ErrorKind::TruncatedInput,
            Error::MalformedLength { .. } => ErrorKind::MalformedLength,
            Error::SchemaViolation(_) => ErrorKind::SchemaViolation,
        }
    }
}

/// The ways a tag stream can break the schematic layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The top level tag wasn't a compound.
    RootKind(TagKind),
    /// The top level compound wasn't named `Schematic`.
    RootName(String),
    /// A member of the root compound has a name we don't recognize.
    UnknownField { kind: TagKind, name: String },
    /// A member of an entity compound has a name we don't recognize.
    UnknownEntityField { kind: TagKind, name: String },
    /// A known field, or an element of a list, carried the wrong tag kind.
    UnexpectedKind {
        field: &'static str,
        expected: TagKind,
        actual: TagKind,
    },
    /// A tag kind byte outside the known set.
    UnknownKind(u8),
    /// The `Materials` field wasn't the one supported variant.
    Materials(String),
    /// One of `Width`, `Length`, or `Height` was below zero.
    NegativeDimension { field: &'static str, value: i16 },
    /// A block buffer doesn't have exactly one byte per cell.
    BufferLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Transport(ref err) => write!(f, "Failed to read input stream: {}", err),
            Error::TruncatedInput {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::MalformedLength { step, length } => {
                write!(f, "Invalid length {} on step [{}]", length, step)
            }
            Error::SchemaViolation(ref v) => write!(f, "Schema violation: {}", v),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Violation::RootKind(kind) => {
                write!(f, "Top level tag must be a compound, got {}", kind)
            }
            Violation::RootName(ref name) => {
                write!(f, "Unexpected top level name '{}', want 'Schematic'", name)
            }
            Violation::UnknownField { kind, ref name } => {
                write!(f, "Unknown field '{}' of kind {}", name, kind)
            }
            Violation::UnknownEntityField { kind, ref name } => {
                write!(f, "Unknown entity field '{}' of kind {}", name, kind)
            }
            Violation::UnexpectedKind {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Field '{}' must be of kind {}, got {}",
                field, expected, actual
            ),
            Violation::UnknownKind(byte) => write!(f, "Unknown tag kind 0x{:02x}", byte),
            Violation::Materials(ref materials) => write!(
                f,
                "Materials must have '{}' value, got '{}'",
                crate::SUPPORTED_MATERIALS,
                materials
            ),
            Violation::NegativeDimension { field, value } => {
                write!(f, "Field '{}' must not be negative, got {}", field, value)
            }
            Violation::BufferLength {
                field,
                expected,
                actual,
            } => write!(
                f,
                "Field '{}' must hold {} bytes (one per cell), got {}",
                field, expected, actual
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<Violation> for Error {
    fn from(v: Violation) -> Self {
        Error::SchemaViolation(v)
    }
}
