//! Mission lifecycle: creation, start, end

pub mod patterns;
pub mod ports;
pub mod service;

pub use patterns::MatchPattern;
pub use service::{MissionLifecycle, TransitionGate};
