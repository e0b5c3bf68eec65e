//! Configuration for the encoder, the decoder and the pretty printer

/// Root tag used for objects and scalars when the caller doesn't pick one
pub const DEFAULT_ROOT_NAME: &str = "JsonObject";
/// Root tag used for arrays when the caller doesn't pick one
pub const DEFAULT_ARRAY_ROOT_NAME: &str = "JsonArray";
/// Attribute flagging an element as an array container
pub const ARRAY_ATTRIBUTE: &str = "isArray";
/// Tag wrapping every array member
pub const ARRAY_ITEM_TAG: &str = "element";
/// Tag wrapping an object that is an array member
pub const OBJECT_WRAPPER_TAG: &str = "obj";
/// Tag wrapping an array that is an array member
pub const ARRAY_WRAPPER_TAG: &str = "array";

/// Configuration for the decoder
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum element nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
    /// Accept `<root><element>..</element></root>` as an array without `isArray`
    pub root_array_allowed: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
            root_array_allowed: true,
        }
    }
}

impl DecodeConfig {
    /// No depth or size limits
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            root_array_allowed: true,
        }
    }

    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
            root_array_allowed: true,
        }
    }

    #[must_use]
    pub const fn with_root_array_allowed(mut self, allowed: bool) -> Self {
        self.root_array_allowed = allowed;
        self
    }
}

/// Whitespace policy for pretty printing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndentConfig {
    /// Spaces per nesting level
    pub indent_spaces: usize,
    /// Line break written before each indented tag
    pub newline: String,
    /// Whether pretty output ends with `newline`
    pub trailing_newline: bool,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self {
            indent_spaces: 4,
            newline: "\n".to_string(),
            trailing_newline: true,
        }
    }
}

impl IndentConfig {
    pub fn new(indent_spaces: usize, newline: impl Into<String>) -> Self {
        Self {
            indent_spaces,
            newline: newline.into(),
            ..Self::default()
        }
    }

    /// No line breaks, no indentation
    pub fn compact() -> Self {
        Self {
            indent_spaces: 0,
            newline: String::new(),
            trailing_newline: false,
        }
    }

    #[must_use]
    pub fn with_trailing_newline(mut self, trailing_newline: bool) -> Self {
        self.trailing_newline = trailing_newline;
        self
    }
}

/// Configuration for the encoder
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Root tag for objects and scalars
    pub root_name: String,
    /// Root tag for arrays
    pub array_root_name: String,
    /// Write `<?xml version="1.0" encoding="UTF-8"?>` first
    pub xml_declaration: bool,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            array_root_name: DEFAULT_ARRAY_ROOT_NAME.to_string(),
            xml_declaration: false,
        }
    }
}

/// Everything an [`XmlManager`](crate::XmlManager) needs
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub encode: EncodeConfig,
    pub indent: IndentConfig,
    pub decode: DecodeConfig,
}

impl Config {
    #[must_use]
    pub fn with_indent(mut self, indent: IndentConfig) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn with_decode(mut self, decode: DecodeConfig) -> Self {
        self.decode = decode;
        self
    }

    #[must_use]
    pub fn with_encode(mut self, encode: EncodeConfig) -> Self {
        self.encode = encode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.indent.indent_spaces, 4);
        assert_eq!(config.indent.newline, "\n");
        assert!(config.indent.trailing_newline);
        assert_eq!(config.encode.root_name, "JsonObject");
        assert!(config.decode.root_array_allowed);
        assert_eq!(config.decode.max_depth, 128);
    }

    #[test]
    fn test_unlimited_decode() {
        let config = DecodeConfig::unlimited().with_root_array_allowed(false);
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_size, 0);
        assert!(!config.root_array_allowed);
    }

    #[test]
    fn test_indent_builders() {
        let indent = IndentConfig::new(2, "\r\n").with_trailing_newline(false);
        assert_eq!(indent.indent_spaces, 2);
        assert_eq!(indent.newline, "\r\n");
        assert!(!indent.trailing_newline);
        assert!(IndentConfig::compact().newline.is_empty());
    }
}
