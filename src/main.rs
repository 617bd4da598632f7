//! Xuino CLI - command-line Arduino toolkit
//!
//! Entry point for the xuino command-line application.

use anyhow::Result;
use clap::Parser;

use xuino::cli::output::display_error;
use xuino::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output_config = cli.output_config();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(output_config.log_level().into()),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        "xuino {} ({}{}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
        if option_env!("VERGEN_GIT_DIRTY") == Some("true") { "-dirty" } else { "" },
        option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
    );

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
