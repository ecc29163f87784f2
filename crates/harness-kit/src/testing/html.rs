//! Minimal HTML fragment parser for test fixtures.
//!
//! Handles elements, quoted and unquoted attributes, void elements,
//! self-closing tags, comments, doctypes and the common character
//! references. Mismatched or unclosed tags are errors rather than being
//! repaired.

use crate::result::{HarnessError, HarnessResult};
use crate::testing::tree::MockNode;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse a fragment into top-level nodes
pub fn parse_fragment(html: &str) -> HarnessResult<Vec<MockNode>> {
    Parser::new(html).run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    // Open elements with the offset of their start tag
    stack: Vec<(MockNode, usize)>,
    top_level: Vec<MockNode>,
}

impl<'a> Parser<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            stack: Vec::new(),
            top_level: Vec::new(),
        }
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> HarnessError {
        HarnessError::InvalidMarkup {
            offset,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        let src = self.src;
        &src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn emit(&mut self, node: MockNode) {
        match self.stack.last_mut() {
            Some((parent, _)) => parent.push_child(node),
            None => self.top_level.push(node),
        }
    }

    fn run(mut self) -> HarnessResult<Vec<MockNode>> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                let end = rest
                    .find("-->")
                    .ok_or_else(|| self.error(self.pos, "unterminated comment"))?;
                self.pos += end + 3;
            } else if rest.starts_with("<!") {
                let end = rest
                    .find('>')
                    .ok_or_else(|| self.error(self.pos, "unterminated declaration"))?;
                self.pos += end + 1;
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with('<') {
                self.open_tag()?;
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let text = decode_entities(&rest[..end]);
                self.pos += end;
                self.emit(MockNode::text_node(text));
            }
        }
        if let Some((node, offset)) = self.stack.last() {
            return Err(self.error(
                *offset,
                format!("unclosed <{}>", node.tag().unwrap_or_default()),
            ));
        }
        Ok(self.top_level)
    }

    fn tag_name(&mut self) -> HarnessResult<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
        {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error(start, "expected tag name"));
        }
        Ok(self.src[start..self.pos].to_ascii_lowercase())
    }

    fn close_tag(&mut self) -> HarnessResult<()> {
        let start = self.pos;
        self.pos += 2;
        let name = self.tag_name()?;
        self.skip_whitespace();
        if self.bump() != Some('>') {
            return Err(self.error(self.pos, "expected '>'"));
        }
        match self.stack.pop() {
            Some((node, _)) if node.tag() == Some(name.as_str()) => {
                self.emit(node);
                Ok(())
            }
            Some((node, _)) => Err(self.error(
                start,
                format!(
                    "</{name}> does not close <{}>",
                    node.tag().unwrap_or_default()
                ),
            )),
            None => Err(self.error(start, format!("unexpected </{name}>"))),
        }
    }

    fn open_tag(&mut self) -> HarnessResult<()> {
        let start = self.pos;
        self.pos += 1;
        let name = self.tag_name()?;
        let mut node = MockNode::element(name.as_str());

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    if VOID_ELEMENTS.contains(&name.as_str()) {
                        self.emit(node);
                    } else {
                        self.stack.push((node, start));
                    }
                    return Ok(());
                }
                Some('/') => {
                    self.bump();
                    if self.bump() != Some('>') {
                        return Err(self.error(self.pos, "expected '>' after '/'"));
                    }
                    self.emit(node);
                    return Ok(());
                }
                Some(_) => {
                    let (attr, value) = self.attribute()?;
                    node = node.attr(attr, value);
                }
                None => return Err(self.error(start, format!("unterminated <{name}>"))),
            }
        }
    }

    fn attribute(&mut self) -> HarnessResult<(String, String)> {
        let src = self.src;
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| !ch.is_whitespace() && !matches!(ch, '=' | '>' | '/' | '"' | '\''))
        {
            self.bump();
        }
        if start == self.pos {
            return Err(self.error(start, "expected attribute name"));
        }
        let name = src[start..self.pos].to_ascii_lowercase();
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Ok((name, String::new()));
        }
        self.bump();
        self.skip_whitespace();

        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let value_start = self.pos;
                let end = self
                    .rest()
                    .find(quote)
                    .ok_or_else(|| self.error(value_start, "unterminated attribute value"))?;
                self.pos += end + 1;
                &src[value_start..value_start + end]
            }
            _ => {
                let value_start = self.pos;
                while self
                    .peek()
                    .is_some_and(|ch| !ch.is_whitespace() && ch != '>')
                {
                    self.bump();
                }
                &src[value_start..self.pos]
            }
        };
        Ok((name, decode_entities(value)))
    }
}

/// Decode named and numeric character references
#[must_use]
pub fn decode_entities(src: &str) -> String {
    if !src.contains('&') {
        return src.to_string();
    }
    let mut out = String::with_capacity(src.len());
    let mut rest = src;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').and_then(|semi| {
            let entity = &rest[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .map_or_else(
                        || entity.strip_prefix('#').and_then(|dec| dec.parse::<u32>().ok()),
                        |hex| u32::from_str_radix(hex, 16).ok(),
                    )
                    .and_then(char::from_u32),
            };
            ch.map(|ch| (ch, semi))
        });
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
