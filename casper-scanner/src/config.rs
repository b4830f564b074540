use crate::error::{Result, ScanError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const BLOCKED_DOMAINS: [&str; 4] = [".gov", ".mil", ".gov.au", ".gov.uk"];
pub const MAX_DEPTH: usize = 2;
pub const MAX_LINKS_PER_PAGE: usize = 10;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const START_SEEDS: [&str; 3] = [
    "https://example.com",
    "https://opensource.org",
    "https://wikipedia.org",
];

/// Tunables for the scanner. Every field has a default, so a config file
/// only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Host suffixes that are never fetched nor returned as links.
    pub blocked_suffixes: Vec<String>,
    pub max_depth: usize,
    pub max_links_per_page: usize,
    pub request_timeout_secs: u64,
    pub seeds: Vec<String>,
    pub user_agent: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            blocked_suffixes: BLOCKED_DOMAINS.iter().map(|s| s.to_string()).collect(),
            max_depth: MAX_DEPTH,
            max_links_per_page: MAX_LINKS_PER_PAGE,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            seeds: START_SEEDS.iter().map(|s| s.to_string()).collect(),
            user_agent: format!("CasperAI-WebScan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ScannerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(ScanError::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_links_per_page == 0 {
            return Err(ScanError::Config(
                "max_links_per_page must be greater than zero".to_string(),
            ));
        }
        if self.blocked_suffixes.iter().any(|s| s.is_empty()) {
            // An empty suffix would block every host.
            return Err(ScanError::Config(
                "blocked_suffixes must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }
}
