//! Defines the error taxonomy and source locations.
//!
//! Three failure kinds cover parsing and binding: a block whose lines do not
//! fit the grammar, a required constructor parameter with no matching key,
//! and scalar text that cannot be coerced to its declared kind. All three
//! name the target type they were produced for. `Io` wraps reader and
//! folder failures from the input layer.

use std::fmt;

/// Line position within the source document (1-indexed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    pub(crate) line: u32,
}

impl Location {
    /// Sentinel value meaning "location unknown".
    ///
    /// Used when a precise position is not available at error creation time;
    /// binding errors, which operate on an already-parsed value tree, always
    /// carry this.
    pub const UNKNOWN: Self = Self { line: 0 };

    /// Create a new location record from a 1-indexed line number.
    pub(crate) const fn new(line: u32) -> Self {
        Self { line }
    }

    /// 1-indexed line number in the input stream.
    pub fn line(&self) -> u64 {
        self.line as u64
    }

    #[inline]
    fn is_known(&self) -> bool {
        self.line != 0
    }
}

/// Error raised while parsing a block document or binding it to a type.
#[derive(Debug)]
pub enum Error {
    /// A non-blank line matches neither the `key: value` pattern nor the
    /// `- ` sequence-item pattern at the expected indentation.
    MalformedBlock {
        /// Name of the target type the block was being parsed for.
        type_name: &'static str,
        /// What the parser found instead of a valid line.
        reason: String,
        /// Line of the offending input, if known.
        location: Location,
    },
    /// A required constructor parameter's external key is absent from the
    /// parsed mapping.
    MissingRequiredProperty {
        type_name: &'static str,
        /// The external key that was expected in the input.
        key: &'static str,
    },
    /// A scalar's text cannot be converted to its declared kind, or a value
    /// has the wrong shape for its parameter (a nested block where a scalar
    /// is declared, and the reverse).
    TypeCoercionFailure {
        type_name: &'static str,
        /// External key of the offending parameter; empty at document root.
        key: &'static str,
        detail: String,
    },
    /// Unexpected I/O error. This may happen only when reading from a
    /// reader or a folder source.
    Io { cause: std::io::Error },
}

impl Error {
    /// Construct a `MalformedBlock` error with no known location.
    ///
    /// Called by:
    /// - The block parser and the lazy boundary scanner; the location is
    ///   patched in with [`Error::at`] where the offending line is known.
    pub(crate) fn malformed<S: Into<String>>(type_name: &'static str, reason: S) -> Self {
        Error::MalformedBlock {
            type_name,
            reason: reason.into(),
            location: Location::UNKNOWN,
        }
    }

    /// Construct a `TypeCoercionFailure` for the given parameter key.
    pub(crate) fn coercion<S: Into<String>>(
        type_name: &'static str,
        key: &'static str,
        detail: S,
    ) -> Self {
        Error::TypeCoercionFailure {
            type_name,
            key,
            detail: detail.into(),
        }
    }

    /// Attach a concrete line to this error and return it.
    ///
    /// Only `MalformedBlock` carries a location; the other kinds are
    /// produced after parsing, when line information is gone.
    pub(crate) fn at(mut self, line: u32) -> Self {
        if let Error::MalformedBlock { location, .. } = &mut self {
            *location = Location::new(line);
        }
        self
    }

    /// If the error has a known source location, return it.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::MalformedBlock { location, .. } if location.is_known() => Some(*location),
            _ => None,
        }
    }

    /// Name of the target type this error was raised for, when one applies.
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Error::MalformedBlock { type_name, .. }
            | Error::MissingRequiredProperty { type_name, .. }
            | Error::TypeCoercionFailure { type_name, .. } => Some(type_name),
            Error::Io { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedBlock {
                type_name,
                reason,
                location,
            } => fmt_with_location(
                f,
                &format!("malformed block for `{type_name}`: {reason}"),
                location,
            ),
            Error::MissingRequiredProperty { type_name, key } => {
                write!(f, "missing required property `{key}` for `{type_name}`")
            }
            Error::TypeCoercionFailure {
                type_name,
                key,
                detail,
            } => {
                if key.is_empty() {
                    write!(f, "cannot bind `{type_name}`: {detail}")
                } else {
                    write!(f, "cannot bind `{type_name}.{key}`: {detail}")
                }
            }
            Error::Io { cause } => write!(f, "IO error: {cause}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(cause: std::io::Error) -> Self {
        Error::Io { cause }
    }
}

/// Print a message optionally suffixed with "at line X".
fn fmt_with_location(f: &mut fmt::Formatter<'_>, msg: &str, location: &Location) -> fmt::Result {
    if location.is_known() {
        write!(f, "{msg} at line {}", location.line)
    } else {
        write!(f, "{msg}")
    }
}
