//! jsonxml - map JSON-like value trees to XML and back
//!
//! Objects become elements with one child per field. Arrays are flagged with
//! `isArray="true"` and every member is wrapped in `<element>`, which is
//! what lets the decoder tell a one-member array from a one-field object.
//!
//! # Quick Start
//!
//! ```
//! use jsonxml::{from_xml, to_xml, Object, Value};
//! # fn main() -> Result<(), jsonxml::Error> {
//! let value = Value::from(Object::new().with("name", "Stromgol").with("age", 42));
//! let xml = to_xml(&value);
//! assert_eq!(xml, "<JsonObject><name>Stromgol</name><age>42</age></JsonObject>");
//!
//! // XML has no scalar types: every leaf comes back as a string
//! let back = from_xml(&xml)?;
//! let age = back
//!     .as_object()
//!     .and_then(|obj| obj.get("age"))
//!     .and_then(Value::as_str)
//!     .unwrap_or_default();
//! assert_eq!(age, "42");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::instrument;

pub mod error;
pub use error::{Error, ErrorCategory, ErrorKind, Pos, Result, Span};

pub mod value;
pub use value::{Array, Object, Value, ValueKind};

pub mod compare;
pub use compare::text_equivalent;

pub mod config;
pub use config::{Config, DecodeConfig, EncodeConfig, IndentConfig};

pub mod xml;

pub mod indent;
pub use indent::Indenter;

pub mod encode;
pub use encode::Encoder;

pub mod decode;
pub use decode::Decoder;

pub mod typed;
pub use typed::{FromValue, ToValue};

pub mod manager;
pub use manager::{PostConstructHook, XmlManager};

/// Serialize without any whitespace, under the default root name
pub fn to_xml(value: &Value) -> String {
    Encoder::compact().encode(value)
}

/// Serialize with the default indentation, under the default root name
pub fn to_xml_pretty(value: &Value) -> String {
    Encoder::pretty().encode(value)
}

/// Decode with the default limits
#[instrument(level = "debug", skip_all, fields(len = xml.len()))]
pub fn from_xml(xml: &str) -> Result<Value> {
    Decoder::new(xml.as_bytes(), DecodeConfig::default()).decode()
}

/// Decode raw bytes with the default limits
pub fn from_xml_bytes(bytes: &[u8]) -> Result<Value> {
    Decoder::new(bytes, DecodeConfig::default()).decode()
}

/// Decode with custom limits
pub fn from_xml_with_config(xml: &str, config: DecodeConfig) -> Result<Value> {
    Decoder::new(xml.as_bytes(), config).decode()
}

/// Decode a document whose root must be an object
pub fn from_xml_to_object(xml: &str) -> Result<Object> {
    Object::from_value(from_xml(xml)?)
}

/// Decode a document whose root must be an array
pub fn from_xml_to_array(xml: &str) -> Result<Array> {
    Array::from_value(from_xml(xml)?)
}
