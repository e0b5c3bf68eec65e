//! XML pull reader
//!
//! Turns XML text into a flat stream of [`Event`]s. It checks
//! well-formedness (tag nesting, attribute syntax, entities, UTF-8) but knows
//! nothing about the object/array convention; that lives in the decoder.

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::cursor::{is_xml_whitespace, Cursor};
use crate::xml::escape::unescape;
use crate::xml::event::{is_blank, Attribute, Event};

#[derive(Clone, Debug)]
pub struct Reader<'a> {
    cursor: Cursor<'a>,
    open: Vec<String>,
    pending_end: Option<Event>,
    root_seen: bool,
}

impl<'a> Reader<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
            open: Vec::new(),
            pending_end: None,
            root_seen: false,
        }
    }

    pub fn next_event(&mut self) -> Result<Event> {
        if let Some(event) = self.pending_end.take() {
            return Ok(event);
        }

        loop {
            if self.cursor.is_eof() {
                return self.end_of_input();
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                return self.read_cdata();
            }

            if self.cursor.starts_with(b"<!") {
                self.skip_doctype()?;
                continue;
            }

            if self.cursor.starts_with(b"</") {
                return self.read_end_tag();
            }

            if self.cursor.current() == Some(b'<') {
                return self.read_start_tag();
            }

            if let Some(event) = self.read_text()? {
                return Ok(event);
            }
        }
    }

    fn end_of_input(&self) -> Result<Event> {
        if let Some(name) = self.open.last() {
            return Err(Error::with_message(
                ErrorKind::UnexpectedEof,
                Span::at(self.cursor.position()),
                format!("unexpected end of input inside <{name}>"),
            ));
        }
        if !self.root_seen {
            return Err(Error::at(ErrorKind::MissingRoot, self.cursor.position()));
        }
        Ok(Event::Eof)
    }

    fn read_start_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance();

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        let self_closing = self.cursor.consume(b"/");
        self.expect_byte(b'>')?;
        let span = Span::new(start, self.cursor.position());

        self.root_seen = true;
        if self_closing {
            self.pending_end = Some(Event::End {
                name: name.clone(),
                span,
            });
        } else {
            self.open.push(name.clone());
        }

        Ok(Event::Start {
            name,
            attributes,
            span,
        })
    }

    fn read_end_tag(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        self.cursor.advance_by(2);

        let name = self.parse_name()?;
        self.cursor.skip_whitespace();
        self.expect_byte(b'>')?;
        let span = Span::new(start, self.cursor.position());

        match self.open.pop() {
            Some(expected) if expected == name => Ok(Event::End { name, span }),
            Some(expected) => Err(Error::new(
                ErrorKind::MismatchedTag {
                    expected,
                    found: name,
                },
                span,
            )),
            None => Err(Error::new(ErrorKind::UnexpectedClosingTag { name }, span)),
        }
    }

    fn read_cdata(&mut self) -> Result<Event> {
        let start = self.cursor.position();
        if self.open.is_empty() {
            return Err(self.error_here("CDATA section outside of the root element"));
        }
        self.cursor.advance_by(b"<![CDATA[".len());

        let content_start = self.cursor.pos();
        loop {
            if self.cursor.starts_with(b"]]>") {
                let text = bytes_to_string(self.cursor.slice_from(content_start), start)?;
                self.cursor.advance_by(3);
                return Ok(Event::Text {
                    text,
                    span: Span::new(start, self.cursor.position()),
                });
            }
            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated CDATA section"));
            }
            self.cursor.advance();
        }
    }

    /// Reads character data up to the next `<`. Blank text outside of the
    /// root element is skipped and yields `None`.
    fn read_text(&mut self) -> Result<Option<Event>> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }
        let span = Span::new(start_pos, self.cursor.position());

        let raw = bytes_to_string(self.cursor.slice_from(start), start_pos)?;
        if self.open.is_empty() {
            if is_blank(&raw) {
                return Ok(None);
            }
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                span,
                "text outside of the root element",
            ));
        }

        let text = unescape(&raw, span)?.into_owned();
        Ok(Some(Event::Text { text, span }))
    }

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attrs: Vec<Attribute> = Vec::new();

        loop {
            let had_space = self.cursor.current().is_some_and(is_xml_whitespace);
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) if !had_space => {
                    return Err(self.error_here("expected whitespace before attribute"));
                }
                Some(_) => {}
                None => return Err(Error::at(ErrorKind::UnexpectedEof, self.cursor.position())),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.iter().any(|attr| attr.name == name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            attrs.push(Attribute { name, value });
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        let start_pos = self.cursor.position();
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = bytes_to_string(self.cursor.slice_from(start), start_pos)?;
                self.cursor.advance();
                let span = Span::new(start_pos, self.cursor.position());
                return Ok(unescape(&raw, span)?.into_owned());
            }
            if b == b'<' {
                return Err(self.error_here("'<' is not allowed in attribute values"));
            }
            self.cursor.advance();
        }

        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::at(start_pos),
            "unterminated attribute value",
        ))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(b) if is_name_start(b) => self.cursor.advance(),
            Some(_) => return Err(self.error_here("expected a name")),
            None => return Err(Error::at(ErrorKind::UnexpectedEof, start_pos)),
        }
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), start_pos)
    }

    /// Skips `<!DOCTYPE ...>`, including an internal subset in brackets
    fn skip_doctype(&mut self) -> Result<()> {
        let start = self.cursor.position();
        let mut brackets = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::at(start),
            "unterminated markup declaration",
        ))
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        let start = self.cursor.position();
        while !self.cursor.is_eof() {
            if self.cursor.consume(pattern) {
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(Error::with_message(
            ErrorKind::UnexpectedEof,
            Span::at(start),
            "unterminated markup",
        ))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.current() == Some(expected) {
            self.cursor.advance();
            Ok(())
        } else if self.cursor.is_eof() {
            Err(Error::at(ErrorKind::UnexpectedEof, self.cursor.position()))
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::at(self.cursor.position()),
            message,
        )
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Whether `name` can be written as an element name as-is
pub fn is_valid_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    bytes.next().is_some_and(is_name_start) && bytes.all(is_name_char)
}
