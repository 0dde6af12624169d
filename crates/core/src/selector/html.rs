//! Lenient HTML fragment parser
//!
//! Never fails: stray end tags are ignored, unclosed elements are closed at
//! end of input and a `<` that does not start markup is kept as text. No
//! implied `html`/`head`/`body` elements are synthesized.

use super::dom::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text up to the matching end tag.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

pub fn parse(source: &str) -> Document {
    let mut doc = Document::new();
    let mut open: Vec<NodeId> = vec![doc.root()];
    let mut rest = source;

    while !rest.is_empty() {
        let parent = open.last().copied().unwrap_or_else(|| doc.root());

        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map_or("", |end| &after[end + 3..]);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map_or("", |end| &rest[end + 1..]);
        } else if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            close(&doc, &mut open, &name);
            rest = after.get(end + 1..).unwrap_or("");
        } else if starts_tag(rest) {
            let tag = parse_start_tag(&rest[1..]);
            let id = doc.append_element(parent, &tag.name, tag.attributes);
            rest = tag.rest;
            if tag.self_closing || VOID_ELEMENTS.contains(&tag.name.as_str()) {
                continue;
            }
            open.push(id);
            if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) {
                let closing = format!("</{}", tag.name);
                let end = rest.to_ascii_lowercase().find(&closing).unwrap_or(rest.len());
                if end > 0 {
                    doc.append_text(id, &rest[..end]);
                }
                rest = &rest[end..];
            }
        } else {
            // A lone '<' is text; otherwise read up to the next '<'.
            let skip = usize::from(rest.starts_with('<'));
            let end = rest[skip..].find('<').map_or(rest.len(), |at| at + skip);
            doc.append_text(parent, &decode_entities(&rest[..end]));
            rest = &rest[end..];
        }
    }

    doc
}

fn starts_tag(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next() == Some('<') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Pop back to the innermost open element named `name`, if any.
fn close(doc: &Document, open: &mut Vec<NodeId>, name: &str) {
    if let Some(position) = open.iter().rposition(|id| doc.tag_name(*id) == Some(name)) {
        open.truncate(position);
    }
}

struct StartTag<'a> {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
    rest: &'a str,
}

fn parse_start_tag(input: &str) -> StartTag<'_> {
    let name_end = input
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(input.len());
    let name = input[..name_end].to_ascii_lowercase();
    let mut rest = &input[name_end..];
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return StartTag { name, attributes, self_closing: false, rest };
        }
        if let Some(after) = rest.strip_prefix("/>") {
            return StartTag { name, attributes, self_closing: true, rest: after };
        }
        if let Some(after) = rest.strip_prefix('>') {
            return StartTag { name, attributes, self_closing: false, rest: after };
        }
        if let Some(after) = rest.strip_prefix('/').or_else(|| rest.strip_prefix('=')) {
            rest = after;
            continue;
        }

        let attr_end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '=' | '>' | '/'))
            .unwrap_or(rest.len());
        let attr_name = rest[..attr_end].to_string();
        rest = rest[attr_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            match after.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    value = decode_entities(&body[..end]);
                    rest = body.get(end + 1..).unwrap_or("");
                }
                _ => {
                    let end = after
                        .find(|c: char| c.is_whitespace() || c == '>')
                        .unwrap_or(after.len());
                    value = decode_entities(&after[..end]);
                    rest = &after[end..];
                }
            }
        }
        attributes.push((attr_name, value));
    }
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity.strip_prefix('#').and_then(|number| {
                    let code = match number.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => number.parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|ch| (ch, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
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
