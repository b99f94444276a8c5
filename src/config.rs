//! Configuration module for the harvester
//!
//! Handles loading environment variables and application configuration.

use std::env;
use std::path::PathBuf;

use crate::constants::endpoints;
use crate::error::{AppError, AppResult};

const DEFAULT_OUTPUT_PATH: &str = "anime.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Listing page the crawl starts from
    pub base_url: String,
    /// Line-delimited JSON output file
    pub output_path: PathBuf,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: endpoints::BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, after reading a
    /// `.env` file if one exists.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup. Unset keys take their
    /// defaults; malformed numbers are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let defaults = Self::default();

        let secs = |key: &str, fallback: u64| -> AppResult<u64> {
            match lookup(key) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    AppError::config(format!("{} must be a whole number of seconds, got {:?}", key, raw))
                }),
                None => Ok(fallback),
            }
        };

        Ok(Self {
            base_url: lookup("BASE_URL").unwrap_or(defaults.base_url),
            output_path: lookup("OUTPUT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            request_timeout_secs: secs("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?,
            connect_timeout_secs: secs("CONNECT_TIMEOUT_SECS", defaults.connect_timeout_secs)?,
            user_agent: lookup("USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }
}
