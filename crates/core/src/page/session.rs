//! A loaded page: click capture and scroll-into-view replay

use std::sync::Arc;

use delegate_domain::NewActivity;
use tracing::{debug, warn};

use crate::mission::ports::ScriptRegistry;
use crate::selector::{Document, NodeId, SelectorResolver};

/// One page as the injected tracker sees it.
pub struct PageSession {
    url: String,
    document: Document,
    scripts: Arc<dyn ScriptRegistry>,
    highlighted: Option<NodeId>,
}

impl PageSession {
    pub fn new(url: impl Into<String>, document: Document, scripts: Arc<dyn ScriptRegistry>) -> Self {
        Self { url: url.into(), document, scripts, highlighted: None }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Pages change after load; mutate through here.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Build the `addActivity` payload for a click on `node`.
    ///
    /// Returns `None` when tracking is not injected into this page or the
    /// click did not land inside an element.
    pub fn capture_click(&self, node: NodeId) -> Option<NewActivity> {
        if !self.scripts.is_tracked(&self.url) {
            debug!(url = %self.url, "click on untracked page ignored");
            return None;
        }
        // Clicks on text report the enclosing element.
        let element = if self.document.is_element(node) {
            node
        } else {
            self.document.parent_element(node)?
        };

        let resolver = SelectorResolver::new(&self.document);
        let target = resolver.serialize(element)?;
        let selector = resolver.synthesize(element)?;
        let title = self.document.text_content(element);
        Some(NewActivity::click(self.url.clone(), title, target, selector))
    }

    /// Locate `selector` and mark it as highlighted.
    pub fn scroll_into_view(&mut self, selector: &str) -> Option<NodeId> {
        match SelectorResolver::new(&self.document).resolve(selector) {
            Ok(node) => {
                self.highlighted = Some(node);
                Some(node)
            }
            Err(err) => {
                warn!(url = %self.url, error = %err, "scroll target not found");
                None
            }
        }
    }

    pub fn highlighted(&self) -> Option<NodeId> {
        self.highlighted
    }

    /// End the transient highlight.
    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }
}
