//! Configuration module.

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    ConfigError, ConfigFile, ListConfig,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the row store is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagingMode {
    /// The host loads the complete data set.
    #[default]
    Full,
    /// Rows are fetched from the server page by page.
    Paged,
}

impl fmt::Display for PagingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Paged => f.write_str("paged"),
        }
    }
}

impl FromStr for PagingMode {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "paged" => Ok(Self::Paged),
            other => Err(ConfigError::InvalidValue {
                field: "paging",
                value: other.to_string(),
            }),
        }
    }
}
