//! # CLI Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CARTAX_QUOTE_MATCH=strict                                          │
//! │     CARTAX_REJECT_DELIMITED_IDS=false                                  │
//! │     CARTAX_LOG=debug                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/cartax/config.toml (Linux)                               │
//! │     ~/Library/Application Support/com.cartax.cartax/config.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [policy]
//! shipping_quote_match = "first_match"  # first_match | strict
//! reject_delimited_ids = true
//!
//! [logging]
//! level = "info"   # EnvFilter directive
//! json = false
//! ```

use std::path::{Path, PathBuf};

use cartax_core::TaxPolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

// =============================================================================
// Logging Settings
// =============================================================================

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive, e.g. `info` or `cartax_core=debug`.
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_level(),
            json: false,
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub policy: TaxPolicy,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// File the configuration was read from, if any. Logged by the caller
    /// once the subscriber is installed.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit path must exist; the platform default path is optional.
    pub fn load(config_path: Option<&Path>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(CliError::ConfigNotFound(path.to_path_buf())),
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parses a TOML config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&contents).map_err(|source| CliError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> CliResult<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from any variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> CliResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("CARTAX_QUOTE_MATCH") {
            self.policy.shipping_quote_match = mode
                .parse()
                .map_err(|e| CliError::InvalidConfig(format!("CARTAX_QUOTE_MATCH: {}", e)))?;
            debug!(mode = %mode, "Overriding shipping quote match from environment");
        }

        if let Some(flag) = lookup("CARTAX_REJECT_DELIMITED_IDS") {
            self.policy.reject_delimited_ids = match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(CliError::InvalidConfig(format!(
                        "CARTAX_REJECT_DELIMITED_IDS: expected true/false, got '{}'",
                        flag
                    )))
                }
            };
            debug!(flag = %flag, "Overriding delimited id check from environment");
        }

        if let Some(level) = lookup("CARTAX_LOG") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "cartax", "cartax")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartax_core::ShippingQuoteMatch;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.policy, TaxPolicy::default());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[policy]\nshipping_quote_match = \"strict\"\n\n[logging]\njson = true"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.policy.shipping_quote_match, ShippingQuoteMatch::Strict);
        assert!(config.policy.reject_delimited_ids);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[policy]\nshipping_quote_match = \"sometimes\"").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(CliError::ConfigParse { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(matches!(
            Config::load(Some(&path)),
            Err(CliError::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[
                ("CARTAX_QUOTE_MATCH", "strict"),
                ("CARTAX_REJECT_DELIMITED_IDS", "false"),
                ("CARTAX_LOG", "cartax_core=trace"),
            ]))
            .unwrap();

        assert_eq!(config.policy.shipping_quote_match, ShippingQuoteMatch::Strict);
        assert!(!config.policy.reject_delimited_ids);
        assert_eq!(config.logging.level, "cartax_core=trace");
    }

    #[test]
    fn test_invalid_env_override() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("CARTAX_QUOTE_MATCH", "loose")]));

        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn test_invalid_delimited_ids_flag_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("CARTAX_REJECT_DELIMITED_IDS", "flase")]));

        match result {
            Err(CliError::InvalidConfig(message)) => {
                assert!(message.contains("CARTAX_REJECT_DELIMITED_IDS"));
                assert!(message.contains("flase"));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
        assert!(config.policy.reject_delimited_ids);
    }

    #[test]
    fn test_delimited_ids_flag_accepts_any_case() {
        let mut config = Config::default();
        config
            .apply_overrides(env(&[("CARTAX_REJECT_DELIMITED_IDS", "No")]))
            .unwrap();
        assert!(!config.policy.reject_delimited_ids);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("shipping_quote_match = \"first_match\""));
        assert!(!text.contains("source"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
