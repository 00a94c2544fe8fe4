pub mod manager;
pub mod validator;

pub use manager::{ConfigManager, ConfigSource};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::regulation::Regulation;

pub const DEFAULT_API_URL: &str = "https://bteb-results.vercel.app/api/data-fetch";
pub const DEFAULT_PROGRAM: &str = "Diploma in Engineering";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Matches the five minute public cache on the result API.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Runtime settings for result lookups and the booklist catalog.
///
/// Every field has a default so a partial config file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub default_regulation: Regulation,
    pub default_program: String,
    pub cache_enabled: bool,
    pub cache_ttl_secs: u64,
    /// Replaces the built-in booklist dataset when set.
    pub booklist_path: Option<PathBuf>,
    /// Overrides the platform cache directory when set.
    pub cache_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("bteb-results/{}", env!("CARGO_PKG_VERSION")),
            default_regulation: Regulation::default(),
            default_program: DEFAULT_PROGRAM.to_string(),
            cache_enabled: true,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            booklist_path: None,
            cache_dir: None,
        }
    }
}
