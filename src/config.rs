// src/config.rs
//
// Application configuration.
//
// Defaults run fully offline: no remote catalog, sample data seeded on first launch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::db::get_database_path;
use crate::error::{AppError, AppResult};

pub const ENV_DB_PATH: &str = "COURSEHUB_DB_PATH";
pub const ENV_API_URL: &str = "COURSEHUB_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "COURSEHUB_API_TIMEOUT_SECS";
pub const ENV_SEED: &str = "COURSEHUB_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; `None` uses the platform data directory
    pub database_path: Option<PathBuf>,

    /// Insert the sample catalog when the store is empty
    pub seed_on_empty: bool,

    pub remote: RemoteConfig,

    /// Published states a slow screen may fall behind before skipping ahead
    pub state_buffer: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Catalog API root; `None` keeps the remote source inert
    pub base_url: Option<String>,

    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            seed_on_empty: true,
            remote: RemoteConfig::default(),
            state_buffer: 64,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Defaults overridden by COURSEHUB_* environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Apply overrides from a key lookup (the environment, in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|v| !v.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim().to_string();
            self.remote.base_url = if url.is_empty() { None } else { Some(url) };
        }

        if let Some(secs) = lookup(ENV_API_TIMEOUT_SECS) {
            self.remote.timeout_secs = secs.trim().parse().map_err(|_| {
                AppError::Other(format!(
                    "{} must be a number of seconds, got {:?}",
                    ENV_API_TIMEOUT_SECS, secs
                ))
            })?;
        }

        if let Some(seed) = lookup(ENV_SEED) {
            self.seed_on_empty = parse_bool(&seed).ok_or_else(|| {
                AppError::Other(format!("{} must be true or false, got {:?}", ENV_SEED, seed))
            })?;
        }

        Ok(self)
    }

    /// Configured database path, or the platform default
    pub fn resolve_database_path(&self) -> AppResult<PathBuf> {
        match &self.database_path {
            Some(path) => Ok(path.clone()),
            None => get_database_path(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_offline() {
        let config = AppConfig::default();
        assert!(config.remote.base_url.is_none());
        assert!(config.seed_on_empty);
        assert_eq!(config.remote.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[
                (ENV_DB_PATH, "/tmp/courses.db"),
                (ENV_API_URL, "https://api.example.com/"),
                (ENV_API_TIMEOUT_SECS, "5"),
                (ENV_SEED, "off"),
            ]))
            .unwrap();

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/courses.db")));
        assert_eq!(config.remote.base_url.as_deref(), Some("https://api.example.com/"));
        assert_eq!(config.remote.timeout_secs, 5);
        assert!(!config.seed_on_empty);
    }

    #[test]
    fn test_blank_api_url_disables_remote() {
        let config = AppConfig::default()
            .with_overrides(lookup(&[(ENV_API_URL, "  ")]))
            .unwrap();
        assert!(config.remote.base_url.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(AppConfig::default()
            .with_overrides(lookup(&[(ENV_API_TIMEOUT_SECS, "soon")]))
            .is_err());
        assert!(AppConfig::default()
            .with_overrides(lookup(&[(ENV_SEED, "maybe")]))
            .is_err());
    }

    #[test]
    fn test_json_file_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursehub.json");
        std::fs::write(&path, r#"{ "remote": { "base_url": "http://localhost:8080" } }"#).unwrap();

        let config = AppConfig::from_json_file(&path).unwrap();
        assert_eq!(config.remote.base_url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(config.remote.timeout_secs, 30);
        assert!(config.seed_on_empty);
    }

    #[test]
    fn test_explicit_database_path_wins() {
        let config = AppConfig {
            database_path: Some(PathBuf::from("local.db")),
            ..AppConfig::default()
        };
        assert_eq!(config.resolve_database_path().unwrap(), PathBuf::from("local.db"));
    }
}
