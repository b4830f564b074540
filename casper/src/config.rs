use anyhow::{Context, Result};
use casper_core::StoreConfig;
use casper_scanner::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming a SQLite database when none is configured.
pub const DB_ENV_VAR: &str = "CASPER_DB";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CasperConfig {
    /// Initial state of the autonomous scanning switch.
    pub autonomous: bool,
    pub scanner: ScannerConfig,
    pub store: StoreConfig,
}

impl Default for CasperConfig {
    fn default() -> Self {
        Self {
            autonomous: true,
            scanner: ScannerConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

/// Reads the config file if one was given, otherwise starts from defaults.
pub fn load_config(path: Option<&Path>) -> Result<CasperConfig> {
    let config: CasperConfig = match path {
        Some(path) => {
            let path = expand_path(&path.to_string_lossy());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", path.display()))?
        }
        None => CasperConfig::default(),
    };

    config
        .scanner
        .validate()
        .context("Invalid scanner configuration")?;
    Ok(config)
}

/// Picks the database path: the command line wins, then the config file,
/// then the environment.
pub fn resolve_db_path(
    config: &mut CasperConfig,
    cli_db: Option<&str>,
    env_db: Option<String>,
) {
    let chosen = cli_db
        .map(str::to_string)
        .or_else(|| {
            config
                .store
                .sqlite_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned())
        })
        .or(env_db)
        .filter(|p| !p.trim().is_empty());

    config.store.sqlite_path = chosen.map(|p| expand_path(&p));
}

pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}
