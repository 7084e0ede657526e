//! Main entry point for zbx-export

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use zbx_cli::cli::Args;

/// Export progress is logged from the library crates, not the binary
const DEFAULT_FILTER: &str = "warn,zbx_export=info,zbx_cli=info,zbx_sdk=info,zbx_common=info";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Disable location display (file paths and line numbers)
    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    zbx_common::logging::init_logging(&args.verbosity, DEFAULT_FILTER)
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    Ok(args.run().await?)
}
