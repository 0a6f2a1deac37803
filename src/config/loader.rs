//! Configuration file loader and environment overlay.

use std::path::{Path, PathBuf};

use super::types::WatchConfig;

/// Print formatted (re-indented) JSON before diffing.
pub const ENV_PRINT_FORMATTED_JSON: &str = "K_PRINT_FORMATTED_JSON";
/// Disable ellipsis compaction of unchanged spans.
pub const ENV_NO_ELLIPSIS: &str = "K_NO_ELLIPSIS";
/// Print the object body on ADDED events.
pub const ENV_PRINT_BODY_OF_ADDED: &str = "K_PRINT_BODY_OF_ADDED";
/// Diff mode: `token` or `unified`.
pub const ENV_DIFF_MODE: &str = "K_DIFF_MODE";
/// Unified diff context lines, `-1` for the whole object.
pub const ENV_DIFF_CONTEXT_LINES: &str = "K_DIFF_CONTEXT_LINES";
/// Token diff granularity: `chars` or `words`.
pub const ENV_DIFF_GRANULARITY: &str = "K_DIFF_GRANULARITY";
/// Per-line byte limit for the input stream.
pub const ENV_MAX_LINE_BYTES: &str = "K_MAX_LINE_BYTES";
/// Any non-empty value disables colors.
pub const ENV_NO_COLOR: &str = "NO_COLOR";

/// Configuration loader that searches multiple locations.
#[derive(Debug)]
pub struct ConfigLoader {
    /// Search paths in order of priority.
    search_paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default search paths.
    #[must_use]
    pub fn new() -> Self {
        let mut search_paths = vec![PathBuf::from(".watchdiff.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            search_paths.push(config_dir.join("watchdiff").join("config.toml"));
        }

        Self { search_paths }
    }

    /// Create a config loader with a specific config file path.
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
        }
    }

    /// Load configuration from the first available file, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    pub fn load(&self) -> Result<WatchConfig, ConfigError> {
        match self.find_config_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::load_from_path(&path)
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok(WatchConfig::default())
            }
        }
    }

    fn load_from_path(path: &Path) -> Result<WatchConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    #[must_use]
    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    /// Find the first config file that exists.
    #[must_use]
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.search_paths.iter().find(|p| p.exists()).cloned()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchConfig {
    /// Overlay values from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or enumerated variable cannot be parsed.
    pub fn apply_process_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from an environment lookup.
    ///
    /// Boolean toggles are on only when the variable is exactly `true`; unset
    /// variables leave the current value alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or enumerated variable cannot be parsed.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| lookup(key).map(|v| v == "true");

        if let Some(on) = flag(ENV_PRINT_FORMATTED_JSON) {
            self.pretty_before_diff = on;
        }
        if let Some(on) = flag(ENV_NO_ELLIPSIS) {
            self.no_ellipsis = on;
        }
        if let Some(on) = flag(ENV_PRINT_BODY_OF_ADDED) {
            self.body_on_added = on;
        }
        if let Some(value) = lookup(ENV_DIFF_MODE) {
            self.diff_mode = parse_env(ENV_DIFF_MODE, &value)?;
        }
        if let Some(value) = lookup(ENV_DIFF_CONTEXT_LINES) {
            self.context_lines = parse_env(ENV_DIFF_CONTEXT_LINES, &value)?;
        }
        if let Some(value) = lookup(ENV_DIFF_GRANULARITY) {
            self.granularity = parse_env(ENV_DIFF_GRANULARITY, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_LINE_BYTES) {
            self.max_line_bytes = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnv {
                    key: ENV_MAX_LINE_BYTES,
                    reason: e.to_string(),
                }
            })?;
        }
        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            self.color = false;
        }
        Ok(())
    }
}

fn parse_env<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .parse()
        .map_err(|reason| ConfigError::InvalidEnv { key, reason })
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {key}: {reason}")]
    InvalidEnv { key: &'static str, reason: String },
}
