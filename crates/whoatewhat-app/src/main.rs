//! WhoAteWhat application binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Load the receipt (analyzer JSON or the demo receipt)
//! 4. Run the conversation loop on stdin/stdout

mod cli;
mod repl;

use std::io;
use std::path::Path;

use clap::Parser;

use whoatewhat_chat::SharedSession;
use whoatewhat_core::analysis::{demo_receipt, parse_receipt_response};
use whoatewhat_core::{AnalysisResult, SplitConfig};

use crate::cli::{CliArgs, ReceiptSource};
use crate::repl::ReplOptions;

/// Read an analyzer reply from disk.
fn load_receipt(path: &Path) -> Result<AnalysisResult, io::Error> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_receipt_response(&text))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let config = if config_file.exists() {
        SplitConfig::load(&config_file)?
    } else {
        SplitConfig::default()
    };

    // Tracing to stderr; RUST_LOG overrides the configured level.
    let level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level)),
        )
        .init();

    tracing::info!("Starting WhoAteWhat v{}", env!("CARGO_PKG_VERSION"));

    let result = match args.resolve_receipt_source() {
        ReceiptSource::File(path) => load_receipt(&path)?,
        ReceiptSource::Demo { explicit: true } => {
            tracing::info!("Using the demo receipt");
            Ok(demo_receipt())
        }
        ReceiptSource::Demo { explicit: false } => {
            tracing::info!("No receipt given, using the demo receipt");
            Ok(demo_receipt())
        }
    };

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "Could not read receipt");
            return Err(e.into());
        }
    };

    let session = SharedSession::new(&config);
    session.accept_analysis(Ok(receipt))?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    repl::run(
        &session,
        stdin.lock(),
        &mut stdout,
        &ReplOptions { json: args.json },
    )?;

    tracing::info!("Goodbye");
    Ok(())
}
