//! Minimal XML pull reader and escaping helpers

pub mod cursor;
pub mod escape;
pub mod event;
pub mod reader;

pub use cursor::Cursor;
pub use escape::{escape, unescape};
pub use event::{Attribute, Event};
pub use reader::{is_valid_name, Reader};
