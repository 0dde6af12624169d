//! Delegate - browser activity tracking coordinator
//!
//! Native-messaging entry point. The browser launches this binary and talks
//! to it over stdin/stdout; logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use delegate_domain::Config;
use delegate_host::host::serve;
use delegate_host::utils::logging::init_tracing;
use delegate_host::{AppContext, EventRouter};
use delegate_infra::config::{load_from_file, load_with_source, ConfigSource};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "delegate-host", version, about = "Delegate native-messaging host")]
struct Cli {
    /// Configuration file (JSON or TOML). Skips environment and path probing.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Database file, overriding the configured path.
    #[arg(long, value_name = "PATH")]
    db: Option<String>,

    /// Log level or filter directive, overriding the configured level.
    /// `DELEGATE_LOG` and `RUST_LOG` still take precedence.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,

    /// Browsers append the caller's origin; accepted and ignored.
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    browser_args: Vec<String>,
}

impl Cli {
    /// Load the configuration, then apply command-line overrides.
    fn resolve_config(&self) -> anyhow::Result<(Config, ConfigSource)> {
        let (mut config, source) = match &self.config {
            Some(path) => (
                load_from_file(Some(path.clone()))
                    .with_context(|| format!("failed to load {}", path.display()))?,
                ConfigSource::File(path.clone()),
            ),
            None => load_with_source().context("failed to load configuration")?,
        };
        if let Some(db) = &self.db {
            config.database.path.clone_from(db);
        }
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }
        if self.json_logs {
            config.logging.json = true;
        }
        Ok((config, source))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, source) = cli.resolve_config()?;
    // Nothing is logged before this point; the subscriber needs the config.
    init_tracing(&config.logging)?;

    info!(
        config_source = %source,
        database = %config.database.path,
        script_id = %config.tracking.script_id,
        "Delegate host starting"
    );
    if !cli.browser_args.is_empty() {
        info!(args = ?cli.browser_args, "launched by browser");
    }

    let ctx = Arc::new(AppContext::new(config));
    if let Err(err) = ctx.warm_up().await {
        warn!(error = %err, "database unavailable at startup; commands will retry on use");
    }

    let subscription = ctx.broadcasts.subscribe();
    let router = EventRouter::new(Arc::clone(&ctx));
    serve(router, subscription, tokio::io::stdin(), tokio::io::stdout())
        .await
        .context("host loop failed")?;

    info!("Delegate host stopped");
    Ok(())
}
