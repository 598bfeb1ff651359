//! Configuration and session persistence for Opsdeck clients.
//!
//! TOML config with `OPSDECK_`-prefixed environment overrides, platform
//! path resolution, and the file-backed [`SessionStore`] implementation
//! that persists the user profile + token pair across restarts.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use opsdeck_api::session::{SessionSnapshot, SessionStore};
use opsdeck_api::{Error as ApiError, TransportConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

/// Client configuration. Everything here is deployment wiring -- the
/// resource paths themselves are part of the API contract, not config.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Base URL of the back-office API.
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates (on-premise deployments).
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5282".into(),
            timeout: default_timeout(),
            accept_invalid_certs: false,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Parse and validate the configured base URL.
    pub fn base_url(&self) -> Result<url::Url, ConfigError> {
        self.api_url.parse().map_err(|_| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("invalid URL: {}", self.api_url),
        })
    }

    /// Transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.timeout),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "opsdeck", "opsdeck")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("opsdeck");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the session file path (platform data dir).
pub fn session_path() -> PathBuf {
    project_dirs().map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("session.json");
            p
        },
        |dirs| dirs.data_dir().join("session.json"),
    )
}

// ── Config loading / saving ─────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("OPSDECK_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── File-backed session store ───────────────────────────────────────

/// Persists the session snapshot (user profile + token pair) as one
/// JSON document, written and removed atomically with respect to the
/// three-piece session contract: everything is stored together and
/// cleared together.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the platform's data dir (`session.json`).
    pub fn new() -> Self {
        Self {
            path: session_path(),
        }
    }

    /// Store at an explicit path (tests, portable installs).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn storage_err(context: &str, err: &dyn std::fmt::Display) -> ApiError {
        ApiError::Storage {
            message: format!("{context}: {err}"),
        }
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionSnapshot>, ApiError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::storage_err("failed to read session file", &e)),
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // A corrupt session file is discarded, not fatal.
                warn!(error = %e, "invalid session file, discarding");
                let _ = std::fs::remove_file(&self.path);
                Ok(None)
            }
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Self::storage_err("failed to create session dir", &e))?;
        }
        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|e| Self::storage_err("failed to serialize session", &e))?;
        std::fs::write(&self.path, json)
            .map_err(|e| Self::storage_err("failed to write session file", &e))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_err("failed to remove session file", &e)),
        }
    }
}
