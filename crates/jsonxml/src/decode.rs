//! XML text to value tree
//!
//! Recursive descent over the [`Reader`] event stream with a single event of
//! pushback. Every open tag is classified by [`determine_kind`]: an
//! `isArray="true"` attribute makes it an array container, anything else an
//! object whose remaining attributes become leading string fields.
//!
//! Decoded scalars are always [`Value::String`]; the text is kept as written
//! (entities decoded, no trimming). Whitespace-only text is treated as
//! indentation and ignored.

use tracing::{debug, instrument, trace};

use crate::config::{DecodeConfig, ARRAY_ATTRIBUTE, ARRAY_ITEM_TAG};
use crate::error::{Error, ErrorKind, Result, Span};
use crate::value::{Array, Object, Value};
use crate::xml::event::{is_blank, Attribute, Event};
use crate::xml::reader::Reader;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// What an open tag turned out to be
#[derive(Debug, PartialEq)]
enum Kind {
    Array,
    /// Object container, pre-filled with its attributes
    Object(Object),
}

#[derive(Debug)]
pub struct Decoder<'a> {
    reader: Reader<'a>,
    pushback: Option<Event>,
    config: DecodeConfig,
    depth: u16,
    input_len: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(input: &'a [u8], config: DecodeConfig) -> Self {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        Self {
            reader: Reader::new(input),
            pushback: None,
            config,
            depth: 0,
            input_len: input.len(),
        }
    }

    /// Decode the whole document
    #[instrument(level = "debug", skip_all, fields(len = self.input_len))]
    pub fn decode(mut self) -> Result<Value> {
        if self.config.max_size > 0 && self.input_len > self.config.max_size {
            return Err(Error::new(
                ErrorKind::MaxSizeExceeded {
                    max: self.config.max_size,
                },
                Span::empty(),
            ));
        }

        let value = self.parse_document()?;
        debug!(kind = %value.kind(), "decoded xml document");
        Ok(value)
    }

    fn parse_document(&mut self) -> Result<Value> {
        let value = match self.next_event()? {
            Event::Start {
                name,
                attributes,
                span,
            } => self.parse_root(&name, attributes, span)?,
            other => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    other.span(),
                    "expected the root element",
                ));
            }
        };

        match self.next_event()? {
            Event::Eof => Ok(value),
            Event::Start { span, .. } => Err(Error::new(ErrorKind::MultipleRoots, span)),
            other => Err(Error::with_message(
                ErrorKind::InvalidToken,
                other.span(),
                "unexpected content after the root element",
            )),
        }
    }

    fn parse_root(&mut self, name: &str, attributes: Vec<Attribute>, span: Span) -> Result<Value> {
        self.enter(span)?;
        let value = match determine_kind(attributes) {
            Kind::Array => Value::Array(self.parse_array_body(name)?),
            Kind::Object(fields) if fields.is_empty() && self.config.root_array_allowed => {
                // siblings are only scanned when the first child is an <element>
                let first = self.next_significant()?;
                let starts_with_item = matches!(
                    &first,
                    Event::Start { name, .. } if local_name(name) == ARRAY_ITEM_TAG
                );
                self.push_back(first);

                if starts_with_item && self.children_are_all_items()? {
                    trace!(root = name, "root children are all <element>, reading an array");
                    Value::Array(self.parse_array_body(name)?)
                } else {
                    self.parse_object_body(name, fields)?
                }
            }
            Kind::Object(fields) => self.parse_object_body(name, fields)?,
        };
        self.leave();
        Ok(value)
    }

    /// Fields of a non-array element, up to and including its end tag.
    ///
    /// Returns a string when the element holds only text, otherwise an
    /// object (empty when the element is empty).
    fn parse_object_body(&mut self, name: &str, fields: Object) -> Result<Value> {
        let mut obj = fields;
        let has_attributes = !obj.is_empty();
        let mut has_children = false;
        let mut text = String::new();
        let mut text_span = Span::empty();

        loop {
            match self.next_event()? {
                Event::Text { text: chunk, span } => {
                    if !is_blank(&chunk) && is_blank(&text) {
                        text_span = span;
                    }
                    text.push_str(&chunk);
                }
                Event::Start {
                    name: child,
                    attributes,
                    span,
                } => {
                    if !is_blank(&text) {
                        return Err(mixed_content(name, text_span));
                    }
                    let key = field_name(&child, span)?;
                    let value = self.parse_field(&key, attributes, span)?;
                    if obj.contains_key(&key) {
                        return Err(Error::new(ErrorKind::DuplicateField { name: key }, span));
                    }
                    obj.insert(key, value);
                    has_children = true;
                }
                Event::End { .. } => break,
                Event::Eof => return Err(self.unexpected_eof()),
            }
        }

        if is_blank(&text) {
            return Ok(Value::Object(obj));
        }
        if has_children || has_attributes {
            return Err(mixed_content(name, text_span));
        }
        Ok(Value::String(text))
    }

    /// Value of a field whose start tag (already read) is `key`
    fn parse_field(&mut self, key: &str, attributes: Vec<Attribute>, span: Span) -> Result<Value> {
        self.enter(span)?;
        let value = match determine_kind(attributes) {
            Kind::Array => Value::Array(self.parse_array_body(key)?),
            Kind::Object(fields) => self.parse_object_body(key, fields)?,
        };
        self.leave();
        Ok(value)
    }

    /// `<element>` children of an array container, up to and including the
    /// container's end tag
    fn parse_array_body(&mut self, container: &str) -> Result<Array> {
        let mut items = Array::new();
        let mut last_was_text = false;

        loop {
            match self.next_event()? {
                Event::Text { text, span } => {
                    if is_blank(&text) {
                        continue;
                    }
                    if items.is_empty() {
                        return Err(mixed_content(container, span));
                    }
                    // Bare text after a complete <element> becomes one more
                    // member instead of an error.
                    if last_was_text {
                        if let Some(Value::String(previous)) = items.pop() {
                            items.push(Value::String(previous + &text));
                        }
                    } else {
                        debug!(container, "bare text in array container, appending it as a member");
                        items.push(Value::String(text));
                    }
                    last_was_text = true;
                }
                Event::Start {
                    name,
                    attributes,
                    span,
                } => {
                    if local_name(&name) != ARRAY_ITEM_TAG {
                        return Err(Error::new(ErrorKind::UnexpectedArrayChild { name }, span));
                    }
                    self.enter(span)?;
                    let item = self.parse_array_item(attributes)?;
                    self.leave();
                    items.push(item);
                    last_was_text = false;
                }
                Event::End { .. } => return Ok(items),
                Event::Eof => return Err(self.unexpected_eof()),
            }
        }
    }

    /// Content of one `<element>`, up to and including `</element>`
    fn parse_array_item(&mut self, attributes: Vec<Attribute>) -> Result<Value> {
        if determine_kind(attributes) == Kind::Array {
            return Ok(Value::Array(self.parse_array_body(ARRAY_ITEM_TAG)?));
        }

        let mut text = String::new();
        let mut child: Option<Value> = None;

        loop {
            match self.next_event()? {
                Event::Text { text: chunk, span } => {
                    if child.is_some() && !is_blank(&chunk) {
                        return Err(self.too_many_children(2, false, span));
                    }
                    text.push_str(&chunk);
                }
                Event::Start {
                    name,
                    attributes,
                    span,
                } => {
                    if child.is_some() || !is_blank(&text) {
                        return Err(self.too_many_children(2, true, span));
                    }
                    let key = field_name(&name, span)?;
                    child = Some(self.parse_item_child(key, attributes, span)?);
                }
                Event::End { .. } => break,
                Event::Eof => return Err(self.unexpected_eof()),
            }
        }

        Ok(match child {
            Some(value) => value,
            None if !is_blank(&text) => Value::String(text),
            None => Value::Object(Object::new()),
        })
    }

    /// The single child element of an `<element>`.
    ///
    /// Containers are returned as they are, so wrapper names such as `obj`
    /// and `array` are dropped. A leaf `<k>text</k>` is the one-field
    /// object `{k: text}`.
    fn parse_item_child(&mut self, key: String, attributes: Vec<Attribute>, span: Span) -> Result<Value> {
        self.enter(span)?;
        let value = match determine_kind(attributes) {
            Kind::Array => Value::Array(self.parse_array_body(&key)?),
            Kind::Object(fields) => match self.parse_object_body(&key, fields)? {
                Value::String(text) => {
                    let mut obj = Object::with_capacity(1);
                    obj.insert(key, text);
                    Value::Object(obj)
                }
                container => container,
            },
        };
        self.leave();
        Ok(value)
    }

    /// Builds the error for an `<element>` with more than one child,
    /// consuming the rest of it to report the full count.
    ///
    /// `seen` counts the children found so far; `inside_child` is set when
    /// the last one was a start tag whose content hasn't been read.
    fn too_many_children(&mut self, seen: usize, inside_child: bool, span: Span) -> Error {
        let mut count = seen;
        let mut depth = usize::from(inside_child);
        loop {
            match self.next_event() {
                Ok(Event::Start { .. }) => {
                    if depth == 0 {
                        count += 1;
                    }
                    depth += 1;
                }
                Ok(Event::End { .. }) => {
                    if depth == 0 {
                        return Error::new(ErrorKind::TooManyArrayChildren { count }, span);
                    }
                    depth -= 1;
                }
                Ok(Event::Text { text, .. }) => {
                    if depth == 0 && !is_blank(&text) {
                        count += 1;
                    }
                }
                Ok(Event::Eof) => return self.unexpected_eof(),
                Err(err) => return err,
            }
        }
    }

    fn next_event(&mut self) -> Result<Event> {
        match self.pushback.take() {
            Some(event) => Ok(event),
            None => self.reader.next_event(),
        }
    }

    /// Next event that isn't whitespace-only text
    fn next_significant(&mut self) -> Result<Event> {
        loop {
            let event = self.next_event()?;
            if !event.is_blank_text() {
                return Ok(event);
            }
        }
    }

    /// Whether the element whose start tag was just read has at least one
    /// child and every direct child is named `element`. Reads ahead on a
    /// copy of the reader, so nothing is consumed.
    fn children_are_all_items(&self) -> Result<bool> {
        let mut reader = self.reader.clone();
        let mut pending = self.pushback.clone();
        let mut depth = 0usize;
        let mut seen_item = false;

        loop {
            let event = match pending.take() {
                Some(event) => event,
                None => reader.next_event()?,
            };
            match event {
                Event::Start { name, .. } => {
                    if depth == 0 {
                        if local_name(&name) != ARRAY_ITEM_TAG {
                            return Ok(false);
                        }
                        seen_item = true;
                    }
                    depth += 1;
                }
                Event::End { .. } => {
                    if depth == 0 {
                        return Ok(seen_item);
                    }
                    depth -= 1;
                }
                Event::Text { .. } => {}
                Event::Eof => return Ok(false),
            }
        }
    }

    fn push_back(&mut self, event: Event) {
        debug_assert!(self.pushback.is_none(), "pushback buffer holds one event");
        self.pushback = Some(event);
    }

    fn enter(&mut self, span: Span) -> Result<()> {
        self.depth = self.depth.saturating_add(1);
        if self.config.max_depth > 0 && self.depth > self.config.max_depth {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.config.max_depth,
                },
                span,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn unexpected_eof(&self) -> Error {
        Error::new(ErrorKind::UnexpectedEof, Span::empty())
    }
}

/// Classify an open tag by its attributes.
///
/// Only `isArray="true"` (exact, case-sensitive) marks an array. Any other
/// attribute, including `isArray` with a different value, becomes a string
/// field. Namespace declarations are dropped.
fn determine_kind(attributes: Vec<Attribute>) -> Kind {
    let mut fields = Object::new();
    let mut is_array = false;

    for Attribute { name, value } in attributes {
        if name == "xmlns" || name.starts_with("xmlns:") {
            trace!(attribute = %name, "dropping namespace declaration");
            continue;
        }
        if name == ARRAY_ATTRIBUTE && value == "true" {
            is_array = true;
            continue;
        }
        fields.insert(local_name(&name), value);
    }

    if is_array {
        if !fields.is_empty() {
            debug!(count = fields.len(), "ignoring extra attributes on an array container");
        }
        Kind::Array
    } else {
        Kind::Object(fields)
    }
}

/// `dc:date` becomes `date`; the prefix is lost
fn local_name(name: &str) -> &str {
    match name.rsplit_once(':') {
        Some((prefix, local)) => {
            trace!(prefix, local, "flattening namespaced name");
            local
        }
        None => name,
    }
}

fn field_name(name: &str, span: Span) -> Result<String> {
    let key = local_name(name);
    if key.trim().is_empty() {
        return Err(Error::with_message(
            ErrorKind::BlankFieldName,
            span,
            format!("an object's property name can't be blank: <{name}>"),
        ));
    }
    Ok(key.to_string())
}

fn mixed_content(name: &str, span: Span) -> Error {
    Error::new(
        ErrorKind::MixedContent {
            name: name.to_string(),
        },
        span,
    )
}
