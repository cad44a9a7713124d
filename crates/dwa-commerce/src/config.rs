//! Storefront configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use dwa_cache::Cache;
use dwa_observability::{LogFormat, LogLevel, StructuredLogger};
use serde::{Deserialize, Serialize};

use crate::checkout::DELIVERY_FEE;
use crate::error::CommerceError;
use crate::money::{Money, CURRENCY_SYMBOL};
use crate::tracking::DeliveryRules;

/// Configuration file. Every field has a default, so an empty file is
/// valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommerceConfig {
    /// Flat delivery fee, in cedis.
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: f64,

    /// Prefix used when displaying money.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Delivery estimate rules.
    #[serde(default)]
    pub delivery: DeliveryRules,

    /// Tracking screen settings.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Durable storage backend.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_delivery_fee() -> f64 {
    DELIVERY_FEE
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for CommerceConfig {
    fn default() -> Self {
        Self {
            delivery_fee: default_delivery_fee(),
            currency_symbol: default_currency_symbol(),
            delivery: DeliveryRules::default(),
            tracking: TrackingConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl CommerceConfig {
    /// Load config from a TOML file, or JSON when the path ends in `.json`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: CommerceConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the storefront cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.delivery_fee.is_finite() || self.delivery_fee < 0.0 {
            anyhow::bail!("delivery_fee must be a non-negative amount");
        }
        if self.delivery.cutoff_hour > 23 {
            anyhow::bail!("delivery.cutoff_hour must be between 0 and 23");
        }
        if self.tracking.step_interval_secs == 0 {
            anyhow::bail!("tracking.step_interval_secs must be at least 1");
        }
        if self.storage.backend == StorageBackend::File && self.storage.dir.is_none() {
            anyhow::bail!("storage.dir is required for the file backend");
        }
        Ok(())
    }

    /// Delivery fee as money.
    pub fn delivery_fee(&self) -> Money {
        Money::from_decimal(self.delivery_fee)
    }

    /// Format an amount with the configured symbol.
    pub fn display_money(&self, amount: Money) -> String {
        amount.display_with(&self.currency_symbol)
    }
}

/// Tracking screen settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Seconds between automatic step advances.
    pub step_interval_secs: u64,
    /// Number announced by the "call delivery agent" action.
    pub support_phone: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            step_interval_secs: 5,
            support_phone: "+233 50 123 4567".to_string(),
        }
    }
}

impl TrackingConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_secs(self.step_interval_secs)
    }
}

/// Which durable store backs the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on exit.
    #[default]
    Memory,
    /// One JSON file per key under `dir`.
    File,
}

/// Durable storage settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Open the configured store.
    pub fn open(&self) -> Result<Cache, CommerceError> {
        match (self.backend, &self.dir) {
            (StorageBackend::Memory, _) => Ok(Cache::in_memory()),
            (StorageBackend::File, Some(dir)) => Ok(Cache::open_dir(dir)?),
            (StorageBackend::File, None) => Err(CommerceError::Config(
                "file storage requires a directory".to_string(),
            )),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
}

impl LoggingConfig {
    /// A logger for one shopper session.
    pub fn logger(&self, session: impl Into<String>) -> StructuredLogger {
        StructuredLogger::new(session)
            .with_min_level(self.level)
            .with_format(self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(name: &str, content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = CommerceConfig::default();
        assert_eq!(config.delivery_fee(), Money::from_decimal(15.0));
        assert_eq!(config.delivery.cutoff_hour, 18);
        assert_eq!(config.tracking.step_interval(), Duration::from_secs(5));
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.display_money(Money::from_decimal(20.0)), "GH\u{20b5}20.00");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_toml() {
        let (_dir, path) = write_config(
            "dwa.toml",
            r#"
delivery_fee = 10.5

[delivery]
cutoff_hour = 17

[logging]
format = "human"
level = "debug"
"#,
        );
        let config = CommerceConfig::load(&path).unwrap();
        assert_eq!(config.delivery_fee(), Money::from_decimal(10.5));
        assert_eq!(config.delivery.cutoff_hour, 17);
        assert_eq!(
            config.delivery.address_placeholder,
            "Delivery address not provided"
        );
        assert_eq!(config.logging.format, LogFormat::Human);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.tracking, TrackingConfig::default());
    }

    #[test]
    fn test_load_json() {
        let (_dir, path) = write_config(
            "dwa.json",
            r#"{"tracking": {"support_phone": "+233 20 000 0000"}}"#,
        );
        let config = CommerceConfig::load(&path).unwrap();
        assert_eq!(config.tracking.support_phone, "+233 20 000 0000");
        assert_eq!(config.tracking.step_interval_secs, 5);
    }

    #[test]
    fn test_load_reports_path() {
        let err = CommerceConfig::load("/nonexistent/dwa.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dwa.toml"));
    }

    #[test]
    fn test_rejects_file_backend_without_dir() {
        let (_dir, path) = write_config("dwa.toml", "[storage]\nbackend = \"file\"\n");
        assert!(CommerceConfig::load(&path).is_err());
    }

    #[test]
    fn test_storage_open_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            backend: StorageBackend::File,
            dir: Some(dir.path().to_path_buf()),
        };
        let cache = storage.open().unwrap();
        cache.set("cartItems", &Vec::<u32>::new()).unwrap();

        let reopened = storage.open().unwrap();
        assert!(reopened.exists("cartItems").unwrap());
    }

    #[test]
    fn test_storage_open_errors() {
        let missing_dir = StorageConfig {
            backend: StorageBackend::File,
            dir: None,
        };
        assert!(matches!(missing_dir.open(), Err(CommerceError::Config(_))));

        // A regular file cannot serve as the store directory.
        let (_dir, path) = write_config("occupied", "not a directory");
        let blocked = StorageConfig {
            backend: StorageBackend::File,
            dir: Some(path),
        };
        assert!(matches!(blocked.open(), Err(CommerceError::Storage(_))));
    }
}
