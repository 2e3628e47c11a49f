use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::format::{self, Currency, Links, Price, DEFAULT_DATE_FORMAT};
use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub access: AccessConfig,
}

/// Where channel data comes from and whether changes are picked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// JSON snapshot written by the fetcher.
    #[serde(default = "platform::default_snapshot_path")]
    pub path: PathBuf,
    /// Reload the snapshot when the file changes on disk.
    #[serde(default = "default_watch")]
    pub watch: bool,
    /// Quiet period after the last file event before reloading.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub currency: Currency,
    /// chrono `strftime` pattern for absolute dates.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_transaction_explorer")]
    pub transaction_explorer: String,
    #[serde(default = "default_node_explorer")]
    pub node_explorer: String,
}

/// Privileged actions (closing channels) are hidden unless `admin` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default)]
    pub admin: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: platform::default_snapshot_path(),
            watch: default_watch(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: Currency::default(),
            date_format: default_date_format(),
        }
    }
}

impl DisplayConfig {
    /// Replace a date pattern chrono cannot format with the default.
    pub fn sanitize(&mut self) {
        if !format::is_valid_date_format(&self.date_format) {
            tracing::warn!(
                "invalid date_format {:?}, using {:?}",
                self.date_format,
                DEFAULT_DATE_FORMAT
            );
            self.date_format = default_date_format();
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            transaction_explorer: default_transaction_explorer(),
            node_explorer: default_node_explorer(),
        }
    }
}

fn default_watch() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_transaction_explorer() -> String {
    "https://mempool.space/tx".to_string()
}

fn default_node_explorer() -> String {
    "https://1ml.com/node".to_string()
}

impl Config {
    /// Load from the default location, writing defaults on first run.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.display.sanitize();
        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    pub fn price(&self) -> Price {
        Price::new(self.display.currency)
    }

    pub fn links(&self) -> Links {
        Links::new(
            self.links.transaction_explorer.clone(),
            self.links.node_explorer.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.access.admin);
        assert!(config.snapshot.watch);
        assert_eq!(config.snapshot.debounce_ms, 500);
        assert!(config.snapshot.path.ends_with("chandash/channels.json"));
        assert_eq!(config.display.currency, Currency::Sat);
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
        assert!(config.links.transaction_explorer.starts_with("https://"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [access]
            admin = true

            [display]
            currency = "btc"
            "#,
        )
        .unwrap();
        assert!(config.access.admin);
        assert_eq!(config.display.currency, Currency::Btc);
        assert_eq!(config.display.date_format, DEFAULT_DATE_FORMAT);
        assert!(config.snapshot.watch);
        assert_eq!(config.links.node_explorer, "https://1ml.com/node");
    }

    #[test]
    fn test_sanitize_replaces_bad_date_format() {
        let mut display = DisplayConfig {
            date_format: "%Y-%".to_string(),
            ..Default::default()
        };
        display.sanitize();
        assert_eq!(display.date_format, DEFAULT_DATE_FORMAT);

        let mut display = DisplayConfig {
            date_format: "%Y-%m-%d".to_string(),
            ..Default::default()
        };
        display.sanitize();
        assert_eq!(display.date_format, "%Y-%m-%d");
    }
}
