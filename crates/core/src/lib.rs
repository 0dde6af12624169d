//! # Delegate Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Selector synthesis and replay over an in-memory DOM model
//! - The record store port and its typed facade
//! - Mission lifecycle, activity ledger and URL permission services
//! - The content-script side page session
//!
//! ## Architecture Principles
//! - Only depends on `delegate-domain`
//! - No database, transport or platform code
//! - All external dependencies via traits

pub mod events;
pub mod ledger;
pub mod mission;
pub mod page;
pub mod permissions;
pub mod selector;
pub mod store;

// Re-export specific items to avoid ambiguity
pub use events::{Broadcaster, Notification};
pub use ledger::ActivityLedger;
pub use mission::ports::{ActiveTab, ScriptRegistration, ScriptRegistry};
pub use mission::{MatchPattern, MissionLifecycle, TransitionGate};
pub use page::PageSession;
pub use permissions::PermissionRegistry;
pub use selector::{Document, NodeId, SelectorResolver};
pub use store::{Collection, Record, RecordStore, TypedStore};
