//! # Settings Loader
//!
//! Centralized settings loading for the Plutus backend.
//! Settings live in a JSON file (`settings.json` by default). Every field is optional:
//! missing fields take their defaults, and a missing file yields the default settings.
//! A handful of environment variables override the file afterwards.
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use settings_loader;
//!
//! // Load from a specific path, then apply environment overrides
//! let settings = settings_loader::load_settings("config/settings.json")?;
//! let settings = settings_loader::apply_env_overrides(settings);
//!
//! // Load whatever is available, defaults otherwise
//! let settings = settings_loader::load_settings_or_default(None)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use models::Settings;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Loads settings from a JSON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Reading settings file: {}", path.display()))?;
    let settings: Settings = serde_json::from_str(&raw)
        .with_context(|| format!("Parsing settings JSON in {}", path.display()))?;
    Ok(settings)
}

/// Loads settings from the given path, or from `settings.json` when no path is given.
/// A file that does not exist yields the defaults; a file that exists but is malformed is an error.
pub fn load_settings_or_default(path: Option<&PathBuf>) -> Result<Settings> {
    let path = path
        .cloned()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));

    if !settings_file_exists(&path) {
        tracing::info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    load_settings(&path)
}

/// Applies overrides from the process environment
pub fn apply_env_overrides(settings: Settings) -> Settings {
    apply_overrides(settings, |key| std::env::var(key).ok())
}

/// Applies overrides from an arbitrary lookup.
///
/// Recognised keys: `HOST`, `PORT`, `STORE_PATH`, `RPC_URL`, `CONNECT_DELAY_MS`.
/// Values that fail to parse are ignored with a warning.
pub fn apply_overrides<F>(mut settings: Settings, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("HOST") {
        settings.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        match port.parse() {
            Ok(port) => settings.server.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT override: {}", port),
        }
    }
    if let Some(path) = lookup("STORE_PATH") {
        settings.store.path = Some(path);
    }
    if let Some(url) = lookup("RPC_URL") {
        settings.chain.rpc_url = url;
    }
    if let Some(delay) = lookup("CONNECT_DELAY_MS") {
        match delay.parse() {
            Ok(delay) => settings.connect_delay_ms = delay,
            Err(_) => tracing::warn!("Ignoring invalid CONNECT_DELAY_MS override: {}", delay),
        }
    }
    settings
}

/// Checks if a settings file exists at the given path
pub fn settings_file_exists<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref().exists() && path.as_ref().is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_load_partial_settings_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"server": {{"port": 8080}}, "fallback_prices": {{"eth": 1800}}}}"#).unwrap();

        let settings = load_settings(file.path()).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.fallback_prices.eth, 1800.0);
        assert_eq!(settings.fallback_prices.btc, 30000.0);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        let settings = load_settings_or_default(Some(&path)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let path = file.path().to_path_buf();
        assert!(load_settings_or_default(Some(&path)).is_err());
    }

    #[test]
    fn test_overrides_replace_values_and_skip_garbage() {
        let env: HashMap<&str, &str> = [
            ("PORT", "not-a-port"),
            ("STORE_PATH", "/tmp/plutus.json"),
            ("CONNECT_DELAY_MS", "0"),
        ]
        .into_iter()
        .collect();

        let settings = apply_overrides(Settings::default(), |key| {
            env.get(key).map(|v| v.to_string())
        });

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.store.path.as_deref(), Some("/tmp/plutus.json"));
        assert_eq!(settings.connect_delay_ms, 0);
    }
}
