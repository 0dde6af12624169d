//! Shared helpers for the host crate

pub mod command_helpers;
pub mod logging;
