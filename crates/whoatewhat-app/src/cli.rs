//! CLI argument definitions for the `whoatewhat` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

/// Where the receipt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptSource {
    File(PathBuf),
    /// Built-in demo receipt; `explicit` is true when `--demo` was passed.
    Demo { explicit: bool },
}

/// WhoAteWhat: split a receipt by telling it who ate what.
#[derive(Parser, Debug)]
#[command(name = "whoatewhat", version, about)]
pub struct CliArgs {
    /// Receipt JSON as produced by the receipt analyzer.
    #[arg(short = 'r', long = "receipt", conflicts_with = "demo")]
    pub receipt: Option<PathBuf>,

    /// Use the built-in demo receipt. Running without --receipt does the same;
    /// the flag makes the choice explicit in scripts.
    #[arg(long = "demo")]
    pub demo: bool,

    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Print summaries as JSON instead of text.
    #[arg(long = "json")]
    pub json: bool,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > WHOATEWHAT_CONFIG env var > ~/.whoatewhat/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("WHOATEWHAT_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the receipt source: --receipt file, otherwise the demo receipt.
    pub fn resolve_receipt_source(&self) -> ReceiptSource {
        match &self.receipt {
            Some(path) => ReceiptSource::File(path.clone()),
            None => ReceiptSource::Demo {
                explicit: self.demo,
            },
        }
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".whoatewhat").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".whoatewhat").join("config.toml");
    }
    PathBuf::from("config.toml")
}
