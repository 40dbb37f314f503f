use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::allocation::DEFAULT_TOLERANCE;
use crate::error::{Result, SplitError};

/// Greeting shown when a conversation starts with an empty log.
pub const DEFAULT_WELCOME: &str = "Hi! I've analyzed your receipt. Now tell me who got what in natural language. For example: 'Julia got the burger, Peter got the fries, and we all split the nachos.'";

/// Top-level configuration.
///
/// Loaded from `~/.whoatewhat/config.toml` by default. Every section is
/// optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SplitConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub reconciliation: ReconciliationConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl SplitConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SplitConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the configuration as pretty TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let tolerance = self.reconciliation.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(SplitError::Config(format!(
                "reconciliation.tolerance must be positive, got {}",
                tolerance
            )));
        }
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Conversation behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Seed the welcome message into an empty log.
    pub show_welcome: bool,
    pub welcome_message: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            show_welcome: true,
            welcome_message: DEFAULT_WELCOME.to_string(),
        }
    }
}

/// Calculated-vs-stated total comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconciliationConfig {
    /// Differences strictly below this are a match.
    pub tolerance: f64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Money formatting for summaries and replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Overrides the symbol derived from the receipt's currency code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,
    pub decimals: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: None,
            decimals: 2,
        }
    }
}

impl DisplayConfig {
    /// Format an amount in the given currency, e.g. `$12.99` for `USD`.
    pub fn money(&self, amount: f64, currency: &str) -> String {
        let symbol = match &self.currency_symbol {
            Some(symbol) => symbol.clone(),
            None => currency_symbol(currency),
        };
        format!("{}{:.*}", symbol, self.decimals, amount)
    }
}

/// Symbol for an ISO 4217 code; unknown codes are printed followed by a space.
pub fn currency_symbol(code: &str) -> String {
    match code.trim().to_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" | "MXN" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "JPY" | "CNY" => "¥".to_string(),
        "INR" => "₹".to_string(),
        "KRW" => "₩".to_string(),
        "CHF" => "CHF ".to_string(),
        "" => String::new(),
        other => format!("{} ", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert!(config.conversation.show_welcome);
        assert_eq!(config.conversation.welcome_message, DEFAULT_WELCOME);
        assert_eq!(config.reconciliation.tolerance, 0.01);
        assert!(config.display.currency_symbol.is_none());
        assert_eq!(config.display.decimals, 2);
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[conversation]
show_welcome = false

[reconciliation]
tolerance = 0.05

[display]
currency_symbol = "€"
"#;
        let file = create_temp_config(content);
        let config = SplitConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert!(!config.conversation.show_welcome);
        assert_eq!(config.conversation.welcome_message, DEFAULT_WELCOME);
        assert_eq!(config.reconciliation.tolerance, 0.05);
        assert_eq!(config.display.currency_symbol.as_deref(), Some("€"));
        assert_eq!(config.display.decimals, 2);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = SplitConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = create_temp_config("[general\nlog_level = ");
        let result = SplitConfig::load(file.path());
        assert!(matches!(result, Err(SplitError::Config(_))));
    }

    #[test]
    fn test_load_rejects_non_positive_tolerance() {
        let file = create_temp_config("[reconciliation]\ntolerance = 0.0\n");
        let result = SplitConfig::load(file.path());
        assert!(matches!(result, Err(SplitError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = SplitConfig::load(Path::new("/nonexistent/whoatewhat.toml"));
        assert!(matches!(result, Err(SplitError::Io(_))));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let config = SplitConfig::load_or_default(Path::new("/nonexistent/whoatewhat.toml"));
        assert_eq!(config.reconciliation.tolerance, 0.01);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = SplitConfig::default();
        config.general.log_level = "warn".to_string();
        config.display.decimals = 3;
        config.save(&path).unwrap();

        let loaded = SplitConfig::load(&path).unwrap();
        assert_eq!(loaded.general.log_level, "warn");
        assert_eq!(loaded.display.decimals, 3);
    }

    #[test]
    fn test_money_formatting() {
        let display = DisplayConfig::default();
        assert_eq!(display.money(12.99, "USD"), "$12.99");
        assert_eq!(display.money(0.5, "USD"), "$0.50");
    }

    #[test]
    fn test_money_follows_receipt_currency() {
        let display = DisplayConfig::default();
        assert_eq!(display.money(12.99, "EUR"), "€12.99");
        assert_eq!(display.money(3.0, "gbp"), "£3.00");
        assert_eq!(display.money(7.5, "SEK"), "SEK 7.50");
    }

    #[test]
    fn test_money_symbol_override() {
        let display = DisplayConfig {
            currency_symbol: Some("USD$".to_string()),
            decimals: 2,
        };
        assert_eq!(display.money(1.0, "EUR"), "USD$1.00");
    }
}
