//! # Configuration State
//!
//! Application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--db`)
//! 2. Environment variables (`FOLIO_*`)
//! 3. Defaults (this file)
//!
//! Read-only once the command starts.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Serialize;
use tracing::warn;

use folio_core::DEFAULT_SHOP_PASSWORD;

/// Rows shown by `search`, `list` and `browse` unless `--limit` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Store name (printed under report headings)
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Password stored on first run, before any credential exists
    #[serde(skip)]
    pub default_password: String,

    /// Row limit for listings
    pub page_size: u32,
}

impl Default for AppConfig {
    /// ## Default Values
    /// - Database: `folio.db` in the platform data directory
    /// - Store: "Folio Books"
    /// - Currency: "$", two decimals
    /// - Password on first run: "scope"
    fn default() -> Self {
        AppConfig {
            db_path: default_database_path(),
            store_name: "Folio Books".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            default_password: DEFAULT_SHOP_PASSWORD.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Creates a new AppConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FOLIO_DB_PATH`: database file
    /// - `FOLIO_STORE_NAME`: store name
    /// - `FOLIO_CURRENCY_SYMBOL`: currency symbol
    /// - `FOLIO_DEFAULT_PASSWORD`: password stored on first run
    /// - `FOLIO_PAGE_SIZE`: listing limit (1-1000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(path) = lookup("FOLIO_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = PathBuf::from(path);
        }

        if let Some(store_name) = lookup("FOLIO_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("FOLIO_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(password) = lookup("FOLIO_DEFAULT_PASSWORD").filter(|p| !p.is_empty()) {
            config.default_password = password;
        }

        if let Some(size) = lookup("FOLIO_PAGE_SIZE") {
            match size.trim().parse::<u32>() {
                Ok(n) if (1..=MAX_PAGE_SIZE).contains(&n) => config.page_size = n,
                _ => warn!(value = %size, "Ignoring invalid FOLIO_PAGE_SIZE"),
            }
        }

        config
    }

    /// Applies command line overrides.
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.db_path = path;
        }
        self
    }

    /// Listing limit: an explicit `--limit` clamped to the allowed range.
    pub fn limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.page_size).clamp(1, MAX_PAGE_SIZE)
    }

    /// Formats a cent amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use folio_cli::state::AppConfig;
    ///
    /// let config = AppConfig::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = cents / divisor;
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!(
                    "{}.{:0width$}",
                    whole.abs(),
                    frac,
                    width = self.currency_decimals as usize
                )
            } else {
                whole.abs().to_string()
            }
        )
    }
}

/// Platform data directory, falling back to the working directory.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.folio.folio/folio.db`
/// - **Windows**: `%APPDATA%\folio\folio\data\folio.db`
/// - **Linux**: `~/.local/share/folio/folio.db`
fn default_database_path() -> PathBuf {
    match ProjectDirs::from("com", "folio", "folio") {
        Some(dirs) => dirs.data_dir().join("folio.db"),
        None => PathBuf::from("folio.db"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_format_currency_positive() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(1234), "$12.34");
        assert_eq!(config.format_currency(100), "$1.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        let config = AppConfig::default();
        assert_eq!(config.format_currency(-1234), "-$12.34");
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("FOLIO_DB_PATH", "/tmp/shop.db"),
            ("FOLIO_STORE_NAME", "Corner Books"),
            ("FOLIO_CURRENCY_SYMBOL", "£"),
            ("FOLIO_DEFAULT_PASSWORD", "letmein"),
            ("FOLIO_PAGE_SIZE", "20"),
        ]);

        assert_eq!(config.db_path, PathBuf::from("/tmp/shop.db"));
        assert_eq!(config.store_name, "Corner Books");
        assert_eq!(config.format_currency(250), "£2.50");
        assert_eq!(config.default_password, "letmein");
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = config_from(&[
            ("FOLIO_PAGE_SIZE", "lots"),
            ("FOLIO_DEFAULT_PASSWORD", ""),
            ("FOLIO_DB_PATH", "  "),
        ]);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.default_password, DEFAULT_SHOP_PASSWORD);
        assert!(config.db_path.ends_with("folio.db"));

        let config = config_from(&[("FOLIO_PAGE_SIZE", "0")]);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_db_flag_and_limit() {
        let config = AppConfig::default().with_db_path(Some(PathBuf::from("x.db")));
        assert_eq!(config.db_path, PathBuf::from("x.db"));
        assert_eq!(config.limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(config.limit(Some(0)), 1);
        assert_eq!(config.limit(Some(5000)), MAX_PAGE_SIZE);
    }
}
