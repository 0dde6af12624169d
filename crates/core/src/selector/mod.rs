//! Selector synthesis and replay
//!
//! Pages are modelled as a [`Document`] arena. Clicked elements are turned
//! into CSS selectors that find them again later, possibly after the page
//! has changed.

pub mod dom;
pub mod html;
pub mod query;
pub mod resolver;

pub use dom::{Document, NodeId};
pub use query::{Selector, SelectorParseError};
pub use resolver::SelectorResolver;
