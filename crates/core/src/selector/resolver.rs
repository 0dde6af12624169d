//! Selector synthesis (element → selector) and replay (selector → element)

use delegate_domain::{DelegateError, Result, TargetElement};
use tracing::{debug, warn};

use super::dom::{Document, NodeId};
use super::query::query_all;

/// Computes and resolves selectors against one document.
#[derive(Debug, Clone, Copy)]
pub struct SelectorResolver<'a> {
    document: &'a Document,
}

impl<'a> SelectorResolver<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Tag name and attributes of an element. `None` for non-elements.
    pub fn serialize(&self, node: NodeId) -> Option<TargetElement> {
        let tag = self.document.tag_name(node)?;
        Some(TargetElement::new(tag, self.document.attributes(node).to_vec()))
    }

    /// `tag[attr="value"]...`, one predicate per attribute in order.
    ///
    /// Values are interpolated verbatim, so a value containing `"` yields a
    /// selector that matches nothing.
    pub fn selector_for(target: &TargetElement) -> String {
        let mut selector = target.element_name.clone();
        for (name, value) in &target.attributes {
            selector.push_str(&format!("[{name}=\"{value}\"]"));
        }
        selector
    }

    /// Selector that finds `node` again, unique when the tree allows it.
    ///
    /// Starts from the element's own tag and attributes. If that is
    /// ambiguous the element's sibling position is appended and ancestors
    /// are prepended one at a time until the selector matches exactly one
    /// element or the root element is reached. An ancestor segment that
    /// makes the selector match nothing is skipped.
    pub fn synthesize(&self, node: NodeId) -> Option<String> {
        let target = self.serialize(node)?;
        let base = Self::selector_for(&target);
        let mut matches = self.count(&base);
        if matches == 1 {
            return Some(base);
        }

        let mut selector = self.positioned(node, base);
        let mut current = node;
        while matches != 1 {
            let Some(ancestor) = self.document.parent_element(current) else {
                break;
            };
            current = ancestor;

            let Some(segment) = self.serialize(ancestor).map(|t| Self::selector_for(&t)) else {
                break;
            };
            let candidate = format!("{} {selector}", self.positioned(ancestor, segment));
            let found = self.count(&candidate);
            if found == 0 {
                debug!(selector = %candidate, "ancestor segment over-constrains, skipping");
                continue;
            }
            selector = candidate;
            matches = found;
        }

        if matches != 1 {
            debug!(%selector, matches, "selector is still ambiguous after ancestor walk");
        }
        Some(selector)
    }

    /// First element matching `selector` in document order.
    pub fn resolve(&self, selector: &str) -> Result<NodeId> {
        match query_all(self.document, selector).into_iter().next() {
            Some(node) => Ok(node),
            None => {
                warn!(selector, "no element matches selector");
                Err(DelegateError::NotFound(format!("no element matches selector {selector}")))
            }
        }
    }

    fn count(&self, selector: &str) -> usize {
        query_all(self.document, selector).len()
    }

    fn positioned(&self, node: NodeId, selector: String) -> String {
        match self.document.element_index(node) {
            Some(index) => format!("{selector}:nth-child({index})"),
            None => selector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(doc: &Document, tag: &str, text: &str) -> NodeId {
        doc.elements()
            .into_iter()
            .find(|id| doc.tag_name(*id) == Some(tag) && doc.text_content(*id) == text)
            .unwrap()
    }

    #[test]
    fn unique_element_keeps_bare_selector() {
        let doc = Document::parse_html(
            r#"<main><button id="save" class="primary">Save</button><button>Cancel</button></main>"#,
        );
        let resolver = SelectorResolver::new(&doc);
        let save = find(&doc, "button", "Save");

        let selector = resolver.synthesize(save).unwrap();
        assert_eq!(selector, r#"button[id="save"][class="primary"]"#);
        assert_eq!(resolver.resolve(&selector).unwrap(), save);
    }

    #[test]
    fn identical_siblings_get_positions_and_an_ancestor() {
        let doc = Document::parse_html("<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>");
        let resolver = SelectorResolver::new(&doc);
        let second = find(&doc, "li", "b");

        let selector = resolver.synthesize(second).unwrap();
        assert_eq!(selector, "ul:nth-child(1) li:nth-child(2)");
        assert_eq!(resolver.resolve(&selector).unwrap(), second);
    }

    #[test]
    fn matching_twins_resolve_to_themselves() {
        let doc = Document::parse_html(
            r#"<div class="row"><span>x</span></div><div class="row"><span>x</span></div>"#,
        );
        let resolver = SelectorResolver::new(&doc);
        let spans: Vec<_> =
            doc.elements().into_iter().filter(|id| doc.tag_name(*id) == Some("span")).collect();

        let first = resolver.synthesize(spans[0]).unwrap();
        let second = resolver.synthesize(spans[1]).unwrap();
        assert_ne!(first, second);
        assert_eq!(resolver.resolve(&first).unwrap(), spans[0]);
        assert_eq!(resolver.resolve(&second).unwrap(), spans[1]);
    }

    #[test]
    fn unmatchable_ancestor_segment_is_skipped() {
        let doc = Document::parse_html(
            r#"<section><div title='say "hi"'><b>x</b></div></section><section><div><b>x</b></div></section>"#,
        );
        let resolver = SelectorResolver::new(&doc);
        let first = doc.elements().into_iter().find(|id| doc.tag_name(*id) == Some("b")).unwrap();

        let selector = resolver.synthesize(first).unwrap();
        assert_eq!(selector, "section:nth-child(1) b:nth-child(1)");
        assert_eq!(resolver.resolve(&selector).unwrap(), first);
    }

    #[test]
    fn exhausted_walk_returns_best_effort_selector() {
        let doc = Document::parse_html(r#"<p title='a "quoted" title'>one</p><p title='a "quoted" title'>two</p>"#);
        let resolver = SelectorResolver::new(&doc);
        let second = find(&doc, "p", "two");

        let selector = resolver.synthesize(second).unwrap();
        assert_eq!(selector, r#"p[title="a "quoted" title"]:nth-child(2)"#);
        assert!(resolver.resolve(&selector).is_err());
    }

    #[test]
    fn text_nodes_have_no_selector() {
        let doc = Document::parse_html("<p>text</p>");
        let resolver = SelectorResolver::new(&doc);
        let text = doc.children(doc.elements()[0])[0];
        assert!(resolver.serialize(text).is_none());
        assert!(resolver.synthesize(text).is_none());
    }

    #[test]
    fn resolve_reports_not_found_after_tree_change() {
        let mut doc = Document::parse_html(r#"<nav><a href="/x">x</a></nav>"#);
        let anchor = doc.elements()[1];
        let selector = SelectorResolver::new(&doc).synthesize(anchor).unwrap();

        doc.detach(anchor);
        let err = SelectorResolver::new(&doc).resolve(&selector).unwrap_err();
        assert_eq!(err.label(), "not_found");
    }

    #[test]
    fn selector_for_interpolates_attributes_in_order() {
        let target = TargetElement::new(
            "A",
            vec![("href".into(), "/home".into()), ("data-x".into(), String::new())],
        );
        assert_eq!(SelectorResolver::selector_for(&target), r#"a[href="/home"][data-x=""]"#);
    }
}
