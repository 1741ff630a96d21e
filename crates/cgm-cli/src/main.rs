//! CGM scanner entry point

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cgm_cli::{app, AppConfig, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    setup_logging(cli.verbose);

    let config = load_configuration(&cli)?;

    let report = app::run(config).await.context("Scan failed")?;

    println!(
        "Scan attempts: {}",
        report
            .outcomes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    for (peripheral, found) in &report.candidates {
        println!(
            "Found {} ({}) rssi {:?} [{:?}]",
            peripheral.name.as_deref().unwrap_or("unnamed"),
            peripheral.address,
            peripheral.rssi,
            found
        );
    }

    info!("Scan finished with {} candidate(s)", report.candidates.len());
    Ok(())
}

/// Setup logging based on verbosity level
fn setup_logging(verbose: bool) {
    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Load configuration from file or use defaults, then apply flags
fn load_configuration(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AppConfig::load_from_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => {
            info!("Using default configuration");
            AppConfig::default()
        }
    };
    config.apply_cli(cli);
    Ok(config)
}
