mod config;

pub use config::{Config, CycleConfig, DefaultsConfig, RankingConfig};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/cyclewake[-dev]/` based on CYCLEWAKE_ENV.
///
/// Set CYCLEWAKE_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CYCLEWAKE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cyclewake-dev")
    } else {
        base_dir.join("cyclewake")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
