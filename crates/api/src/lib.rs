//! # Delegate Host
//!
//! Native-messaging host that runs the Delegate coordinator.
//!
//! This crate contains:
//! - The message protocol and the event router
//! - Command handlers (one per routed command)
//! - Application context (dependency injection)
//! - The frame codec and the stdin/stdout host loop
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - The binary in `main.rs` only parses flags and starts [`host::serve`]

pub mod commands;
pub mod context;
pub mod framing;
pub mod host;
pub mod protocol;
pub mod router;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use protocol::{InboundMessage, Request, Response};
pub use router::EventRouter;
