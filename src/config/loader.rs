//! List settings: the TOML file, its lookup order and the override layers.

use super::PagingMode;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Config file failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// File that could not be read.
        path: PathBuf,
        /// I/O error text.
        reason: String,
    },

    /// Bad TOML or an unknown key.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Offending file.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// A setting has a value outside its domain.
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue {
        /// Setting name.
        field: &'static str,
        /// Rejected value.
        value: String,
    },
}

/// Contents of `config.toml`. Absent keys keep their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Row store kind.
    #[serde(default)]
    pub paging: Option<PagingMode>,

    /// Rows from either cache edge at which an adjacent page is requested.
    #[serde(default)]
    pub prefetch_margin: Option<usize>,

    /// Items rendered beyond each viewport edge.
    #[serde(default)]
    pub over_render_margin: Option<usize>,

    /// Height assumed for items before anything has been measured.
    #[serde(default)]
    pub default_row_height: Option<u32>,

    /// Initial state of newly created group headers.
    #[serde(default)]
    pub collapsed_by_default: Option<bool>,

    /// Rows requested per page.
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Directory for persisted layouts.
    #[serde(default)]
    pub layout_dir: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Settings a list is created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListConfig {
    /// Row store kind.
    pub paging: PagingMode,
    /// Prefetch margin in rows.
    pub prefetch_margin: usize,
    /// Over-render margin in display items.
    pub over_render_margin: usize,
    /// Fallback item height in pixels.
    pub default_row_height: u32,
    /// Initial collapse state for new headers.
    pub collapsed_by_default: bool,
    /// Rows per page request.
    pub page_size: usize,
    /// Directory for persisted layouts.
    pub layout_dir: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            paging: PagingMode::Full,
            prefetch_margin: 25,
            over_render_margin: 8,
            default_row_height: 20,
            collapsed_by_default: false,
            page_size: 50,
            layout_dir: default_layout_dir(),
            log_file_path: default_log_path(),
        }
    }
}

/// `vlist/vlist.log` under the platform state directory, or the working
/// directory when there is none.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("vlist").join("vlist.log")
    } else {
        PathBuf::from("vlist.log")
    }
}

/// Resolve default layout directory (`~/.local/share/vlist/layouts`).
pub fn default_layout_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("vlist").join("layouts"),
        None => PathBuf::from("vlist-layouts"),
    }
}

/// Read the config file at `path`; `Ok(None)` when there is no such file.
///
/// # Errors
///
/// [`ConfigError`] when the file exists but is unreadable or invalid.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// `vlist/config.toml` under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vlist").join("config.toml"))
}

/// Find and read the config file. The first of `config_path`, `$VLIST_CONFIG`
/// and [`default_config_path`] that is set wins, whether or not the file
/// exists.
///
/// # Errors
///
/// See [`load_config_file`].
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var("VLIST_CONFIG") {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Environment layer: reads `VLIST_PAGING` (`full` or `paged`). An unparseable value is logged
/// and ignored.
pub fn apply_env_overrides(mut config: ListConfig) -> ListConfig {
    if let Ok(raw) = std::env::var("VLIST_PAGING") {
        match raw.parse::<PagingMode>() {
            Ok(mode) => config.paging = mode,
            Err(e) => warn!(error = %e, "ignoring VLIST_PAGING"),
        }
    }

    config
}

/// File layer over the defaults. Zero row heights and page sizes are ignored.
pub fn merge_config(config_file: Option<ConfigFile>) -> ListConfig {
    let defaults = ListConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ListConfig {
        paging: config.paging.unwrap_or(defaults.paging),
        prefetch_margin: config.prefetch_margin.unwrap_or(defaults.prefetch_margin),
        over_render_margin: config
            .over_render_margin
            .unwrap_or(defaults.over_render_margin),
        default_row_height: config
            .default_row_height
            .filter(|h| *h > 0)
            .unwrap_or(defaults.default_row_height),
        collapsed_by_default: config
            .collapsed_by_default
            .unwrap_or(defaults.collapsed_by_default),
        page_size: config
            .page_size
            .filter(|n| *n > 0)
            .unwrap_or(defaults.page_size),
        layout_dir: config.layout_dir.unwrap_or(defaults.layout_dir),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Command-line layer, applied last. `None` leaves a setting alone.
pub fn apply_cli_overrides(
    mut config: ListConfig,
    collapsed_override: Option<bool>,
    margin_override: Option<usize>,
    row_height_override: Option<u32>,
) -> ListConfig {
    if let Some(collapsed) = collapsed_override {
        config.collapsed_by_default = collapsed;
    }

    if let Some(margin) = margin_override {
        config.over_render_margin = margin;
    }

    if let Some(height) = row_height_override.filter(|h| *h > 0) {
        config.default_row_height = height;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
