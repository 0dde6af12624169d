//! # Delegate Domain
//!
//! Business domain types and models for Delegate.
//!
//! This crate contains:
//! - Domain data types (Mission, Activity, UrlPermission, TargetElement)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and mission-time utilities
//!
//! ## Architecture
//! - No dependencies on other Delegate crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::timer::{Countdown, MissionTime, TimerState};
