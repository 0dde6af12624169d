//! Domain utilities

pub mod timer;
