//! Value tree to XML text
//!
//! Objects become elements whose children are their fields, in insertion
//! order. Arrays carry `isArray="true"` and wrap each member in `<element>`;
//! object members get an extra `<obj>` wrapper and nested arrays an
//! `<array isArray="true">` wrapper so the decoder can tell them apart from a
//! one-field object.

use tracing::warn;

use crate::config::{
    EncodeConfig, ARRAY_ATTRIBUTE, ARRAY_ITEM_TAG, ARRAY_WRAPPER_TAG, OBJECT_WRAPPER_TAG,
};
use crate::indent::Indenter;
use crate::value::{Array, Object, Value};
use crate::xml::escape::escape;
use crate::xml::reader::is_valid_name;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Configured XML writer. Immutable and cheap to share.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encoder {
    config: EncodeConfig,
    indenter: Indenter,
}

impl Encoder {
    pub const fn new(config: EncodeConfig, indenter: Indenter) -> Self {
        Self { config, indenter }
    }

    /// Default root names, no whitespace
    pub fn compact() -> Self {
        Self::new(EncodeConfig::default(), Indenter::compact())
    }

    /// Default root names, default indentation
    pub fn pretty() -> Self {
        Self::new(EncodeConfig::default(), Indenter::default())
    }

    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encode with the configured root name (`JsonArray` for arrays,
    /// `JsonObject` otherwise by default)
    pub fn encode(&self, value: &Value) -> String {
        let root = match value {
            Value::Array(_) => &self.config.array_root_name,
            _ => &self.config.root_name,
        };
        self.encode_with_root(value, root)
    }

    pub fn encode_with_root(&self, value: &Value, root: &str) -> String {
        let mut emitter = Emitter::new(&self.indenter);
        if self.config.xml_declaration {
            emitter.out.push_str(XML_DECLARATION);
            emitter.started = true;
        }
        emitter.element(root, value, 0);
        self.indenter.finish(&mut emitter.out);
        emitter.out
    }
}

struct Emitter<'e> {
    out: String,
    indenter: &'e Indenter,
    started: bool,
}

impl<'e> Emitter<'e> {
    fn new(indenter: &'e Indenter) -> Self {
        Self {
            out: String::new(),
            indenter,
            started: false,
        }
    }

    /// Line break before every tag except the very first one
    fn line(&mut self, level: usize) {
        if self.started {
            self.indenter.write_indentation(&mut self.out, level);
        }
        self.started = true;
    }

    fn open(&mut self, name: &str, level: usize, is_array: bool, empty: bool) {
        self.line(level);
        self.out.push('<');
        self.out.push_str(name);
        if is_array {
            self.out.push(' ');
            self.out.push_str(ARRAY_ATTRIBUTE);
            self.out.push_str("=\"true\"");
        }
        self.out.push_str(if empty { "/>" } else { ">" });
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    fn element(&mut self, name: &str, value: &Value, level: usize) {
        match value {
            Value::Null => self.open(name, level, false, true),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                self.open(name, level, false, false);
                if let Some(text) = value.scalar_text() {
                    self.out.push_str(&escape(&text));
                }
                self.close(name);
            }
            Value::Object(obj) => self.object(name, obj, level),
            Value::Array(arr) => self.array(name, arr, level),
        }
    }

    fn object(&mut self, name: &str, obj: &Object, level: usize) {
        if obj.is_empty() {
            self.open(name, level, false, true);
            return;
        }

        self.open(name, level, false, false);
        for (key, child) in obj {
            if !is_valid_name(key) {
                warn!(key = %key, "object key is not a valid XML name, output won't parse back");
            }
            self.element(key, child, level + 1);
        }
        self.line(level);
        self.close(name);
    }

    fn array(&mut self, name: &str, arr: &Array, level: usize) {
        if arr.is_empty() {
            self.open(name, level, true, true);
            return;
        }

        self.open(name, level, true, false);
        for item in arr {
            self.item(item, level + 1);
        }
        self.line(level);
        self.close(name);
    }

    fn item(&mut self, item: &Value, level: usize) {
        match item {
            Value::Null => self.open(ARRAY_ITEM_TAG, level, false, true),
            Value::Bool(_) | Value::Number(_) | Value::String(_) => {
                self.element(ARRAY_ITEM_TAG, item, level);
            }
            Value::Object(_) | Value::Array(_) => {
                let wrapper = if item.is_array() {
                    ARRAY_WRAPPER_TAG
                } else {
                    OBJECT_WRAPPER_TAG
                };
                self.open(ARRAY_ITEM_TAG, level, false, false);
                self.element(wrapper, item, level + 1);
                self.line(level);
                self.close(ARRAY_ITEM_TAG);
            }
        }
    }
}
