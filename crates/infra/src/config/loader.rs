//! Configuration loader
//!
//! Sources are tried in order and the first one present wins:
//!
//! 1. Environment variables, when `DELEGATE_DB_PATH` and
//!    `DELEGATE_DB_POOL_SIZE` are both set
//! 2. The first config file found by [`probe_config_paths`]
//! 3. [`Config::default`]
//!
//! A source that is present but invalid is an error; it never falls through
//! to the next one.
//!
//! ## Environment Variables
//! - `DELEGATE_DB_PATH`, `DELEGATE_DB_POOL_SIZE` (required together)
//! - `DELEGATE_DB_BUSY_TIMEOUT_MS`
//! - `DELEGATE_TRACKING_SCHEME`
//! - `DELEGATE_LOG_JSON` (`1`/`true`/`yes`/`on`)
//!
//! ## File Locations
//! `config.{json,toml}` then `delegate.{json,toml}`, looked up in the working
//! directory, its parent, the executable's directory and that directory's
//! parent.

use std::fmt;
use std::path::{Path, PathBuf};

use delegate_domain::constants::DEFAULT_BUSY_TIMEOUT_MS;
use delegate_domain::{
    Config, DatabaseConfig, DelegateError, LoggingConfig, Result, TrackingConfig,
};
use tracing::{debug, info};

const ENV_DB_PATH: &str = "DELEGATE_DB_PATH";
const ENV_DB_POOL_SIZE: &str = "DELEGATE_DB_POOL_SIZE";
const ENV_DB_BUSY_TIMEOUT_MS: &str = "DELEGATE_DB_BUSY_TIMEOUT_MS";
const ENV_TRACKING_SCHEME: &str = "DELEGATE_TRACKING_SCHEME";
const ENV_LOG_JSON: &str = "DELEGATE_LOG_JSON";

const CONFIG_FILE_STEMS: [&str; 2] = ["config", "delegate"];

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Environment,
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment"),
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Defaults => f.write_str("defaults"),
        }
    }
}

/// Supported file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    const ALL: [Self; 2] = [Self::Json, Self::Toml];

    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Files without an extension are read as JSON.
    fn for_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None | Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            Some(other) => {
                Err(DelegateError::Config(format!("Unsupported config format: {other}")))
            }
        }
    }

    fn parse(self, contents: &str) -> Result<Config> {
        match self {
            Self::Json => serde_json::from_str(contents)
                .map_err(|err| DelegateError::Config(format!("Invalid JSON format: {err}"))),
            Self::Toml => toml::from_str(contents)
                .map_err(|err| DelegateError::Config(format!("Invalid TOML format: {err}"))),
        }
    }
}

/// Load configuration from the first available source.
///
/// # Errors
/// Returns `DelegateError::Config` if the chosen source is invalid.
pub fn load() -> Result<Config> {
    let (config, source) = load_with_source()?;
    info!(source = %source, "configuration loaded");
    Ok(config)
}

/// Like [`load`], also reporting which source was used.
pub fn load_with_source() -> Result<(Config, ConfigSource)> {
    if env_present() {
        return Ok((load_from_env()?, ConfigSource::Environment));
    }
    debug!("database environment variables not set, probing for config files");

    match probe_config_paths() {
        Some(path) => Ok((load_from_file(Some(path.clone()))?, ConfigSource::File(path))),
        None => Ok((Config::default(), ConfigSource::Defaults)),
    }
}

/// Build a configuration from environment variables alone.
///
/// # Errors
/// Returns `DelegateError::Config` if a required variable is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let path = required_env(ENV_DB_PATH)?;
    let pool_size = parse_env(ENV_DB_POOL_SIZE, &required_env(ENV_DB_POOL_SIZE)?)?;
    let busy_timeout_ms = match std::env::var(ENV_DB_BUSY_TIMEOUT_MS) {
        Ok(raw) => parse_env(ENV_DB_BUSY_TIMEOUT_MS, &raw)?,
        Err(_) => DEFAULT_BUSY_TIMEOUT_MS,
    };

    let tracking = match std::env::var(ENV_TRACKING_SCHEME) {
        Ok(url_scheme) => TrackingConfig { url_scheme, ..TrackingConfig::default() },
        Err(_) => TrackingConfig::default(),
    };

    Ok(Config {
        database: DatabaseConfig { path, pool_size, busy_timeout_ms },
        tracking,
        logging: LoggingConfig { json: env_flag(ENV_LOG_JSON), ..LoggingConfig::default() },
    })
}

/// Read a configuration file, probing the standard locations when `path`
/// is `None`.
///
/// # Errors
/// Returns `DelegateError::Config` if the file is missing, unreadable, of an
/// unsupported format or does not parse.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) if path.exists() => path,
        Some(path) => {
            return Err(DelegateError::Config(format!(
                "Config file not found: {}",
                path.display()
            )))
        }
        None => probe_config_paths().ok_or_else(|| {
            DelegateError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    let format = ConfigFormat::for_path(&path)?;
    debug!(path = %path.display(), ?format, "reading config file");
    let contents = std::fs::read_to_string(&path).map_err(|err| {
        DelegateError::Config(format!("Failed to read {}: {err}", path.display()))
    })?;
    format.parse(&contents)
}

/// First existing config file in the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    search_dirs()
        .into_iter()
        .flat_map(|dir| {
            CONFIG_FILE_STEMS.into_iter().flat_map(move |stem| {
                let dir = dir.clone();
                ConfigFormat::ALL
                    .into_iter()
                    .map(move |format| dir.join(format!("{stem}.{}", format.extension())))
            })
        })
        .find(|candidate| candidate.is_file())
}

/// Working directory and executable directory, each followed by its parent.
fn search_dirs() -> Vec<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_dir =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf));

    [cwd, exe_dir]
        .into_iter()
        .flatten()
        .flat_map(|dir| {
            let parent = dir.join("..");
            [dir, parent]
        })
        .collect()
}

fn env_present() -> bool {
    std::env::var_os(ENV_DB_PATH).is_some() && std::env::var_os(ENV_DB_POOL_SIZE).is_some()
}

fn required_env(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| DelegateError::Config(format!("Missing required environment variable: {key}")))
}

fn parse_env<T>(key: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|err| DelegateError::Config(format!("Invalid value for {key} ({raw:?}): {err}")))
}

/// Unset or unrecognised values read as `false`.
fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
