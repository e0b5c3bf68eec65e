//! Events produced by the XML pull reader

use crate::error::Span;

/// One `name="value"` pair on a start tag, entities already decoded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Events emitted by [`Reader`](super::Reader)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Opening tag; self-closing tags are followed by a matching `End`
    Start {
        name: String,
        attributes: Vec<Attribute>,
        span: Span,
    },
    /// Closing tag
    End { name: String, span: Span },
    /// Character data, including CDATA sections
    Text { text: String, span: Span },
    /// End of input after the root element
    Eof,
}

impl Event {
    pub fn span(&self) -> Span {
        match self {
            Self::Start { span, .. } | Self::End { span, .. } | Self::Text { span, .. } => *span,
            Self::Eof => Span::empty(),
        }
    }

    /// Text made only of XML whitespace, as left by indentation
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Self::Text { text, .. } if is_blank(text))
    }
}

pub fn is_blank(text: &str) -> bool {
    text.bytes().all(super::cursor::is_xml_whitespace)
}
