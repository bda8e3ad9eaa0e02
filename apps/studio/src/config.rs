use std::path::PathBuf;

use anyhow::{Context, Result};

pub const DEFAULT_STORAGE_KEY: &str = "resume-storage";

/// Host configuration loaded from environment variables.
/// Every variable has a default; an empty value is treated as invalid.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the durable snapshot file.
    pub data_dir: PathBuf,
    /// Name of the snapshot record (file stem inside `data_dir`).
    pub storage_key: String,
    /// Where exported documents are written.
    pub export_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            data_dir: PathBuf::from(env_or("STUDIO_DATA_DIR", ".studio")?),
            storage_key: storage_key(env_or("STUDIO_STORAGE_KEY", DEFAULT_STORAGE_KEY)?)?,
            export_dir: PathBuf::from(env_or("STUDIO_EXPORT_DIR", ".")?),
            rust_log: env_or("RUST_LOG", "info")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> Result<String> {
    let value = std::env::var(key).unwrap_or_else(|_| default.to_string());
    if value.trim().is_empty() {
        anyhow::bail!("Environment variable '{key}' is set but empty");
    }
    Ok(value)
}

/// The key becomes a file name, so path separators are refused.
fn storage_key(key: String) -> Result<String> {
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(anyhow::anyhow!("'{key}' contains a path separator"))
            .context("STUDIO_STORAGE_KEY must be a plain name");
    }
    Ok(key)
}
