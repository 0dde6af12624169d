//! Selector parsing and matching
//!
//! Supported grammar, a subset of CSS:
//!
//! ```text
//! selector  := compound (WS+ compound)*
//! compound  := (tag | '*')? (attribute | nth-child)*
//! attribute := '[' name ']' | '[' name '=' quoted ']'
//! nth-child := ':nth-child(' digits ')'
//! ```
//!
//! Quoted values end at the first matching quote; there is no escaping.

use std::str::FromStr;

use thiserror::Error;

use super::dom::{Document, NodeId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector at offset {offset}: {reason}")]
pub struct SelectorParseError {
    pub offset: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttributeTest {
    Exists(String),
    Equals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    attributes: Vec<AttributeTest>,
    nth_child: Option<usize>,
}

/// Parsed selector: compounds joined by descendant combinators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl FromStr for Selector {
    type Err = SelectorParseError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Parser { source, offset: 0 }.selector()
    }
}

impl Selector {
    /// Whether `id` is matched by this selector.
    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some((last, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(doc, id) {
            return false;
        }
        // Descendant-only chains: nearest matching ancestor is always safe.
        let mut current = id;
        for compound in ancestors.iter().rev() {
            loop {
                let Some(parent) = doc.parent_element(current) else {
                    return false;
                };
                current = parent;
                if compound.matches(doc, current) {
                    break;
                }
            }
        }
        true
    }

    /// All matching elements in document order.
    pub fn query_all(&self, doc: &Document) -> Vec<NodeId> {
        doc.elements().into_iter().filter(|id| self.matches(doc, *id)).collect()
    }
}

impl Compound {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(tag) = doc.tag_name(id) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|expected| expected != tag) {
            return false;
        }
        let attributes_match = self.attributes.iter().all(|test| match test {
            AttributeTest::Exists(name) => doc.attribute(id, name).is_some(),
            AttributeTest::Equals(name, value) => doc.attribute(id, name) == Some(value.as_str()),
        });
        attributes_match && self.nth_child.map_or(true, |n| doc.element_index(id) == Some(n))
    }
}

/// Parse `selector` and return every match; a malformed selector matches
/// nothing.
pub fn query_all(doc: &Document, selector: &str) -> Vec<NodeId> {
    match selector.parse::<Selector>() {
        Ok(parsed) => parsed.query_all(doc),
        Err(err) => {
            tracing::debug!(selector, error = %err, "selector does not parse");
            Vec::new()
        }
    }
}

/// First match in document order.
pub fn query_first(doc: &Document, selector: &str) -> Option<NodeId> {
    query_all(doc, selector).into_iter().next()
}

struct Parser<'a> {
    source: &'a str,
    offset: usize,
}

impl Parser<'_> {
    fn rest(&self) -> &str {
        &self.source[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, expected: &str) -> bool {
        if self.rest().starts_with(expected) {
            self.offset += expected.len();
            true
        } else {
            false
        }
    }

    fn error(&self, reason: impl Into<String>) -> SelectorParseError {
        SelectorParseError { offset: self.offset, reason: reason.into() }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.offset;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.offset > start
    }

    fn selector(mut self) -> Result<Selector, SelectorParseError> {
        let mut compounds = Vec::new();
        self.skip_whitespace();
        while self.peek().is_some() {
            compounds.push(self.compound()?);
            let separated = self.skip_whitespace();
            if self.peek().is_some() && !separated {
                return Err(self.error("expected whitespace between compounds"));
            }
        }
        if compounds.is_empty() {
            return Err(self.error("empty selector"));
        }
        Ok(Selector { compounds })
    }

    fn compound(&mut self) -> Result<Compound, SelectorParseError> {
        let mut compound = Compound::default();
        let universal = self.eat("*");
        if !universal && self.peek().is_some_and(is_ident_start) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('[') => {
                    self.bump();
                    compound.attributes.push(self.attribute()?);
                }
                Some(':') => {
                    if !self.eat(":nth-child(") {
                        return Err(self.error("unsupported pseudo-class"));
                    }
                    let start = self.offset;
                    while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                        self.bump();
                    }
                    let index = self.source[start..self.offset]
                        .parse::<usize>()
                        .map_err(|_| self.error("expected a positive index"))?;
                    if index == 0 || !self.eat(")") {
                        return Err(self.error("malformed :nth-child"));
                    }
                    compound.nth_child = Some(index);
                }
                Some(c) if !c.is_whitespace() => {
                    return Err(self.error(format!("unexpected character {c:?}")));
                }
                _ => break,
            }
        }

        if !universal && compound == Compound::default() {
            return Err(self.error("expected a compound selector"));
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeTest, SelectorParseError> {
        let name = self.ident()?.to_ascii_lowercase();
        if self.eat("]") {
            return Ok(AttributeTest::Exists(name));
        }
        if !self.eat("=") {
            return Err(self.error("expected '=' or ']'"));
        }
        let quote = match self.bump() {
            Some(quote @ ('"' | '\'')) => quote,
            _ => return Err(self.error("expected a quoted value")),
        };
        let start = self.offset;
        let Some(length) = self.rest().find(quote) else {
            return Err(self.error("unterminated string"));
        };
        let value = self.source[start..start + length].to_string();
        self.offset = start + length + 1;
        if !self.eat("]") {
            return Err(self.error("expected ']'"));
        }
        Ok(AttributeTest::Equals(name, value))
    }

    fn ident(&mut self) -> Result<&str, SelectorParseError> {
        let start = self.offset;
        if !self.peek().is_some_and(is_ident_start) {
            return Err(self.error("expected an identifier"));
        }
        while self.peek().is_some_and(is_ident_char) {
            self.bump();
        }
        Ok(&self.source[start..self.offset])
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}
