//! CSS selector subset for the mock tree.
//!
//! Supported: selector lists, descendant and child combinators, `tag`, `*`,
//! `#id`, `.class`, attribute conditions (`[a]`, `=`, `^=`, `$=`, `*=`, `~=`)
//! and the pseudo-classes `:first-child`, `:last-child`, `:checked`,
//! `:disabled`, `:enabled`, `:focus` and `:not(...)`.

use crate::element::ElementId;
use crate::result::{HarnessError, HarnessResult};
use crate::selector::split_selector_groups;
use crate::testing::tree::MockTree;

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    groups: Vec<Vec<SelectorPart>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    compound: Compound,
    // Relation to the part on the left
    combinator: Option<Combinator>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrCondition>,
    pseudo_classes: Vec<PseudoClass>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { name: String },
    Equals { name: String, value: String },
    Prefix { name: String, value: String },
    Suffix { name: String, value: String },
    Substring { name: String, value: String },
    Includes { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PseudoClass {
    FirstChild,
    LastChild,
    Checked,
    Disabled,
    Enabled,
    Focus,
    Not(SelectorList),
}

struct ParseError<'a> {
    selector: &'a str,
}

impl ParseError<'_> {
    fn at(&self, message: impl Into<String>) -> HarnessError {
        HarnessError::InvalidSelector {
            selector: self.selector.to_string(),
            message: message.into(),
        }
    }
}

impl SelectorList {
    /// Parse a selector list
    pub fn parse(selector: &str) -> HarnessResult<Self> {
        let groups = split_selector_groups(selector)?
            .iter()
            .map(|group| parse_chain(group))
            .collect::<HarnessResult<Vec<_>>>()?;
        Ok(Self { groups })
    }

    /// Whether element `id` matches any alternative
    #[must_use]
    pub fn matches(&self, tree: &MockTree, id: ElementId) -> bool {
        self.groups
            .iter()
            .any(|parts| matches_from(tree, id, parts, parts.len() - 1))
    }
}

fn matches_from(tree: &MockTree, id: ElementId, parts: &[SelectorPart], index: usize) -> bool {
    let part = &parts[index];
    if !part.compound.matches(tree, id) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match part.combinator.unwrap_or(Combinator::Descendant) {
        Combinator::Child => tree
            .parent_element(id)
            .is_some_and(|parent| matches_from(tree, parent, parts, index - 1)),
        Combinator::Descendant => {
            let mut cursor = tree.parent_element(id);
            while let Some(ancestor) = cursor {
                if matches_from(tree, ancestor, parts, index - 1) {
                    return true;
                }
                cursor = tree.parent_element(ancestor);
            }
            false
        }
    }
}

impl Compound {
    fn matches(&self, tree: &MockTree, id: ElementId) -> bool {
        let Some(tag) = tree.tag_name(id) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|expected| expected != tag) {
            return false;
        }
        if let Some(expected) = &self.id {
            if tree.attribute(id, "id") != Some(expected.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|class| tree.has_class(id, class)) {
            return false;
        }
        if !self.attributes.iter().all(|condition| condition.matches(tree, id)) {
            return false;
        }
        self.pseudo_classes
            .iter()
            .all(|pseudo| pseudo.matches(tree, id))
    }
}

impl AttrCondition {
    fn matches(&self, tree: &MockTree, id: ElementId) -> bool {
        match self {
            Self::Exists { name } => tree.attribute(id, name).is_some(),
            Self::Equals { name, value } => tree.attribute(id, name) == Some(value.as_str()),
            Self::Prefix { name, value } => {
                !value.is_empty() && tree.attribute(id, name).is_some_and(|v| v.starts_with(value.as_str()))
            }
            Self::Suffix { name, value } => {
                !value.is_empty() && tree.attribute(id, name).is_some_and(|v| v.ends_with(value.as_str()))
            }
            Self::Substring { name, value } => {
                !value.is_empty() && tree.attribute(id, name).is_some_and(|v| v.contains(value.as_str()))
            }
            Self::Includes { name, value } => tree
                .attribute(id, name)
                .is_some_and(|v| v.split_whitespace().any(|word| word == value)),
        }
    }
}

impl PseudoClass {
    fn matches(&self, tree: &MockTree, id: ElementId) -> bool {
        match self {
            Self::FirstChild => sibling_elements(tree, id).first() == Some(&id),
            Self::LastChild => sibling_elements(tree, id).last() == Some(&id),
            Self::Checked => tree.bool_property(id, "checked"),
            Self::Disabled => tree.bool_property(id, "disabled"),
            Self::Enabled => !tree.bool_property(id, "disabled"),
            Self::Focus => tree.focused() == Some(id),
            Self::Not(inner) => !inner.matches(tree, id),
        }
    }
}

fn sibling_elements(tree: &MockTree, id: ElementId) -> Vec<ElementId> {
    tree.parent(id)
        .map(|parent| tree.element_children(parent))
        .unwrap_or_default()
}

fn parse_chain(selector: &str) -> HarnessResult<Vec<SelectorPart>> {
    let err = ParseError { selector };
    let mut parts = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize(selector)? {
        if token == ">" {
            if pending.is_some() || parts.is_empty() {
                return Err(err.at("dangling '>'"));
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let compound = parse_compound(&token)?;
        let combinator = if parts.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        parts.push(SelectorPart { compound, combinator });
    }

    if parts.is_empty() || pending.is_some() {
        return Err(err.at("incomplete selector"));
    }
    Ok(parts)
}

fn tokenize(selector: &str) -> HarnessResult<Vec<String>> {
    let err = ParseError { selector };
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    let flush = |current: &mut String, tokens: &mut Vec<String>| {
        if !current.is_empty() {
            tokens.push(std::mem::take(current));
        }
    };

    for ch in selector.chars() {
        if let Some(open) = quote {
            current.push(ch);
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' | '(' => {
                depth += 1;
                current.push(ch);
            }
            ']' | ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| err.at("unbalanced bracket"))?;
                current.push(ch);
            }
            '>' if depth == 0 => {
                flush(&mut current, &mut tokens);
                tokens.push(">".to_string());
            }
            '+' | '~' if depth == 0 => {
                return Err(err.at(format!("unsupported combinator '{ch}'")));
            }
            ch if ch.is_whitespace() && depth == 0 => flush(&mut current, &mut tokens),
            _ => current.push(ch),
        }
    }
    if quote.is_some() || depth != 0 {
        return Err(err.at("unterminated selector"));
    }
    flush(&mut current, &mut tokens);
    Ok(tokens)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    let mut end = start;
    while end < bytes.len() && is_ident_byte(bytes[end]) {
        end += 1;
    }
    (end > start).then(|| (src[start..end].to_string(), end))
}

fn parse_compound(part: &str) -> HarnessResult<Compound> {
    let err = ParseError { selector: part };
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut compound = Compound::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if i != 0 {
                    return Err(err.at("'*' must come first"));
                }
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_ident(part, i + 1).ok_or_else(|| err.at("expected id"))?;
                if compound.id.replace(id).is_some() {
                    return Err(err.at("more than one id"));
                }
                i = next;
            }
            b'.' => {
                let (class, next) =
                    parse_ident(part, i + 1).ok_or_else(|| err.at("expected class name"))?;
                compound.classes.push(class);
                i = next;
            }
            b'[' => {
                let (condition, next) = parse_attribute(part, i)?;
                compound.attributes.push(condition);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_pseudo(part, i)?;
                compound.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if i != 0 {
                    return Err(err.at("tag name must come first"));
                }
                let (tag, next) = parse_ident(part, i).ok_or_else(|| err.at("unexpected character"))?;
                compound.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }
    Ok(compound)
}

fn parse_attribute(src: &str, open: usize) -> HarnessResult<(AttrCondition, usize)> {
    let err = ParseError { selector: src };
    let close = find_closing(src, open, b'[', b']').ok_or_else(|| err.at("unclosed '['"))?;
    let body = src[open + 1..close].trim();

    let operator_at = body.find(['=', '^', '$', '*', '~']);
    let Some(at) = operator_at else {
        if body.is_empty() || !body.bytes().all(is_ident_byte) {
            return Err(err.at("bad attribute name"));
        }
        return Ok((AttrCondition::Exists { name: body.to_string() }, close + 1));
    };

    let name = body[..at].trim().to_string();
    if name.is_empty() || !name.bytes().all(is_ident_byte) {
        return Err(err.at("bad attribute name"));
    }
    let rest = &body[at..];
    let (operator, raw_value) = if let Some(value) = rest.strip_prefix('=') {
        ("=", value)
    } else if rest.as_bytes().get(1) == Some(&b'=') {
        rest.split_at(2)
    } else {
        return Err(err.at("bad attribute operator"));
    };
    let value = unquote(raw_value.trim()).ok_or_else(|| err.at("bad attribute value"))?;

    let condition = match operator {
        "=" => AttrCondition::Equals { name, value },
        "^=" => AttrCondition::Prefix { name, value },
        "$=" => AttrCondition::Suffix { name, value },
        "*=" => AttrCondition::Substring { name, value },
        "~=" => AttrCondition::Includes { name, value },
        other => return Err(err.at(format!("unsupported operator '{other}'"))),
    };
    Ok((condition, close + 1))
}

fn unquote(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    match bytes.first() {
        Some(b'"' | b'\'') => {
            let quote = bytes[0];
            (bytes.len() >= 2 && bytes[bytes.len() - 1] == quote)
                .then(|| raw[1..raw.len() - 1].to_string())
        }
        _ => (!raw.is_empty() && !raw.contains(char::is_whitespace)).then(|| raw.to_string()),
    }
}

fn find_closing(src: &str, open: usize, open_byte: u8, close_byte: u8) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (offset, &b) in bytes.iter().enumerate().skip(open) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            _ if b == open_byte => depth += 1,
            _ if b == close_byte => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_pseudo(src: &str, colon: usize) -> HarnessResult<(PseudoClass, usize)> {
    let err = ParseError { selector: src };
    let (name, next) = parse_ident(src, colon + 1).ok_or_else(|| err.at("expected pseudo-class"))?;
    let pseudo = match name.as_str() {
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "checked" => PseudoClass::Checked,
        "disabled" => PseudoClass::Disabled,
        "enabled" => PseudoClass::Enabled,
        "focus" => PseudoClass::Focus,
        "not" => {
            if src.as_bytes().get(next) != Some(&b'(') {
                return Err(err.at(":not needs an argument"));
            }
            let close = find_closing(src, next, b'(', b')').ok_or_else(|| err.at("unclosed ':not('"))?;
            let inner = SelectorList::parse(&src[next + 1..close])?;
            return Ok((PseudoClass::Not(inner), close + 1));
        }
        other => return Err(err.at(format!("unsupported pseudo-class ':{other}'"))),
    };
    Ok((pseudo, next))
}
