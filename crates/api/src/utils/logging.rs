use std::time::Duration;

use delegate_domain::{DelegateError, LoggingConfig, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV_VAR: &str = "DELEGATE_LOG";

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as
/// `"missions::start_mission"`; never forward payload values through it.
#[inline]
pub fn log_command_execution(
    command: &str,
    elapsed: Duration,
    success: bool,
    error_type: Option<&str>,
) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, error_type, "command_execution_failure");
    }
}

/// Convert a `DelegateError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &DelegateError) -> &'static str {
    error.label()
}

/// Install the global subscriber.
///
/// Output goes to stderr because stdout carries native-messaging frames.
/// `DELEGATE_LOG` wins over `RUST_LOG`, which wins over the configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|err| {
            DelegateError::Config(format!("invalid log filter '{}': {err}", config.level))
        })?;

    let layer = if config.json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).with_ansi(false).with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| DelegateError::Internal(format!("tracing already initialised: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_come_from_the_domain_error() {
        assert_eq!(error_label(&DelegateError::Conflict("x".into())), "conflict");
        assert_eq!(error_label(&DelegateError::NoActiveMission), "no_active_mission");
    }

    #[test]
    fn command_logging_accepts_both_outcomes() {
        log_command_execution("missions::add_mission", Duration::from_millis(3), true, None);
        log_command_execution(
            "missions::start_mission",
            Duration::from_secs(1),
            false,
            Some("permission_denied"),
        );
    }
}
