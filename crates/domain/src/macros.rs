//! Macro for implementing Display and FromStr for closed string enums
//!
//! Collections, timer states and script run-at points all travel as plain
//! strings (in storage, in config files and on the wire). This macro gives
//! each of them a single mapping table for both directions.
//!
//! # Example
//!
//! ```rust
//! use delegate_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Phase {
//!     Draft,
//!     Running,
//!     Ended,
//! }
//!
//! impl_domain_status_conversions!(Phase {
//!     Draft => "draft",
//!     Running => "running",
//!     Ended => "ended",
//! });
//!
//! assert_eq!(Phase::Running.to_string(), "running");
//! assert_eq!("ENDED".parse::<Phase>().unwrap(), Phase::Ended);
//! ```

/// Implements Display and FromStr traits for string-backed enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
