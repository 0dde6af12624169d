//! Content-script side of click tracking

pub mod session;

pub use session::PageSession;
