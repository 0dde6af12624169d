//! Record store port and typed facade

pub mod ports;
pub mod typed;

pub use ports::{Collection, RecordStore};
pub use typed::{Record, TypedStore};
