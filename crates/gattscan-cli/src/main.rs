//! gattscan entry point

use clap::Parser;
use tracing::{error, info};

use gattscan_ble::{ScanConfig, ScanController, ScanSummary};
use gattscan_cli::{cli::Cli, config::AppConfig, error::Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = load_configuration(&cli)?;
    let scan_config = config.merge_cli(&cli);

    match run(scan_config).await {
        Ok(summary) => {
            info!(
                "Scan finished: {} discovered, {} matched, {} sessions",
                summary.discovered, summary.matched, summary.sessions
            );
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Execute one scan-and-enumerate run
async fn run(scan_config: ScanConfig) -> Result<ScanSummary> {
    let controller = ScanController::new(scan_config);
    Ok(controller.run().await?)
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

/// Load configuration from file or use defaults
fn load_configuration(cli: &Cli) -> Result<AppConfig> {
    if let Some(config_path) = &cli.config {
        info!("Loading configuration from: {config_path}");
        AppConfig::load_from_file(config_path)
    } else {
        Ok(AppConfig::default())
    }
}
