//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Storage
pub const DEFAULT_DB_PATH: &str = "delegate.db";
pub const DEFAULT_POOL_SIZE: u32 = 4;
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// Content-script registration
pub const TRACKER_SCRIPT_ID: &str = "activityTracker";
pub const TRACKER_SCRIPT_PATH: &str = "bundle/activityTracker.js";
pub const DEFAULT_URL_SCHEME: &str = "https";

// Activities
pub const CLICK_ACTION: &str = "click";

// Missions
pub const MISSION_TIME_PATTERN: &str = r"^(?P<time>\d{1,2})min$";
/// Below this many whole minutes left the countdown turns to warning.
pub const TIMER_WARNING_MINUTES: i64 = 1;

// Event emission
pub const EVENT_ACTIVITY_ADDED: &str = "activityAdded";
pub const EVENT_URL_PERMISSION_REMOVED: &str = "urlPermissionRemoved";
pub const BROADCAST_CAPACITY: usize = 64;

// Native messaging
pub const MAX_OUTBOUND_FRAME_BYTES: usize = 1024 * 1024;
