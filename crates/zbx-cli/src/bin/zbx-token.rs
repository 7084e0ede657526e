//! Main entry point for zbx-token

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use zbx_cli::cli::TokenArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = TokenArgs::parse();

    color_eyre::config::HookBuilder::default()
        .display_location_section(false)
        .display_env_section(false)
        .install()?;

    zbx_common::logging::init_logging(&args.verbosity, "warn")
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

    let token = args.run().await?;
    println!("Generated Token: {}", token);

    Ok(())
}
