//! Error types for jsonxml

use std::fmt;
use thiserror::Error;

/// Position in the XML source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in the XML source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// The three families of failure a caller has to tell apart
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input is not well-formed XML
    MalformedXml,
    /// Well-formed XML that breaks the object/array encoding rules
    StructuralAmbiguity,
    /// The decoded value can't be turned into the requested shape
    UnsupportedTargetShape,
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    UnexpectedClosingTag { name: String },
    MultipleRoots,
    MissingRoot,
    InvalidEntity { entity: String },
    InvalidUtf8,
    DuplicateAttribute { name: String },
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
    BlankFieldName,
    DuplicateField { name: String },
    MixedContent { name: String },
    TooManyArrayChildren { count: usize },
    UnexpectedArrayChild { name: String },
    UnsupportedTargetShape { expected: String, found: String },
    Io,
}

impl ErrorKind {
    /// Which family this kind belongs to
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidToken
            | Self::UnexpectedEof
            | Self::MismatchedTag { .. }
            | Self::UnexpectedClosingTag { .. }
            | Self::MultipleRoots
            | Self::MissingRoot
            | Self::InvalidEntity { .. }
            | Self::InvalidUtf8
            | Self::DuplicateAttribute { .. }
            | Self::MaxDepthExceeded { .. }
            | Self::MaxSizeExceeded { .. }
            | Self::Io => ErrorCategory::MalformedXml,
            Self::BlankFieldName
            | Self::DuplicateField { .. }
            | Self::MixedContent { .. }
            | Self::TooManyArrayChildren { .. }
            | Self::UnexpectedArrayChild { .. } => ErrorCategory::StructuralAmbiguity,
            Self::UnsupportedTargetShape { .. } => ErrorCategory::UnsupportedTargetShape,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::UnexpectedClosingTag { name } => write!(f, "unexpected closing tag </{name}>"),
            Self::MultipleRoots => write!(f, "multiple root elements"),
            Self::MissingRoot => write!(f, "document has no root element"),
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
            Self::BlankFieldName => write!(f, "an object's property name can't be blank"),
            Self::DuplicateField { name } => {
                write!(f, "field <{name}> appears more than once outside of an array")
            }
            Self::MixedContent { name } => write!(
                f,
                "an object's property can't have a name if its value is a direct text mixed with children: <{name}>"
            ),
            Self::TooManyArrayChildren { count } => write!(
                f,
                "array element can't contain more than one child, array element had {count} children"
            ),
            Self::UnexpectedArrayChild { name } => {
                write!(f, "array children must be named <element>, found <{name}>")
            }
            Self::UnsupportedTargetShape { expected, found } => {
                write!(f, "can't convert {found} into {expected}")
            }
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for jsonxml
#[derive(Error, Clone, Debug, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Error raised when a value doesn't fit the requested shape
    pub fn unsupported_shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::UnsupportedTargetShape {
                expected: expected.into(),
                found: found.into(),
            },
            Span::empty(),
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::at(pos))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span == Span::empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "error at {}: {}", self.span.start, self.message)
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::with_message(ErrorKind::Io, Span::empty(), err.to_string())
    }
}

/// Result type alias for jsonxml
pub type Result<T> = std::result::Result<T, Error>;
