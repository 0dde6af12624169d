//! Command execution helpers
//!
//! Every routed command is timed and logged the same way; this keeps the
//! individual command functions down to the service call they wrap.

use std::future::Future;
use std::time::Instant;

use delegate_domain::Result;

use crate::utils::logging::{error_label, log_command_execution};

/// Run `command_fn`, then log its duration and outcome under `command_name`.
pub async fn execute_logged<F, Fut, T>(command_name: &str, command_fn: F) -> Result<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let elapsed = start.elapsed();
    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, elapsed, result.is_ok(), error_type);

    result
}
