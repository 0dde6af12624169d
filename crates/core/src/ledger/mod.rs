//! Activity ledger: pending click activities of the active mission

pub mod service;

pub use service::ActivityLedger;
