//! Serialized description of a clicked element

use serde::{Deserialize, Serialize};

/// Tag name plus attributes of a DOM element, in DOM attribute order.
///
/// Attributes travel as `[[name, value], ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetElement {
    pub element_name: String,
    pub attributes: Vec<(String, String)>,
}

impl TargetElement {
    pub fn new(element_name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self { element_name: element_name.into().to_lowercase(), attributes }
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    /// Markup snippet shown in activity details, e.g. `<a href="/x"> </a>`.
    pub fn to_markup(&self) -> String {
        let attributes = self
            .attributes
            .iter()
            .map(|(name, value)| format!("{name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join(" ");
        format!("<{name} {attributes}> </{name}>", name = self.element_name)
    }
}
