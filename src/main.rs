// Coordination Diagram Collector - Main Entry Point

use std::path::Path;

use clap::Parser;
use pcd_collector::config::Config;
use pcd_collector::coordinator::Coordinator;
use pcd_collector::net::api::ApiClient;
use pcd_collector::output::CsvSink;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    info!("Starting coordination diagram collector");
    info!("Output directory: {}", config.out_dir);

    let client = ApiClient::new(
        config.cycles_url.clone(),
        config.traffic_url.clone(),
        config.http_timeout,
    )?;
    let sink = CsvSink::new(Path::new(&config.out_dir))?;
    let mut coordinator = Coordinator::new(client, sink, config.hour_lag);

    info!("Collector ready");

    // Poll every minute until shutdown signal (Ctrl+C)
    tokio::select! {
        _ = coordinator.run() => {}
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Received shutdown signal (Ctrl+C)"),
                Err(err) => {
                    error!("Unable to listen for shutdown signal: {}", err);
                    coordinator.flush()?;
                    return Err(err.into());
                }
            }
        }
    }

    // Graceful shutdown: no new polls, but everything derived so far is
    // written out
    info!("Shutting down...");
    coordinator.flush()?;
    info!("Collector stopped");

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .with_span_events(if verbose {
            FmtSpan::ENTER | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    if verbose {
        subscriber
            .with_max_level(tracing::Level::DEBUG)
            .init();
        info!("Verbose logging enabled (DEBUG level)");
    } else {
        subscriber
            .with_max_level(tracing::Level::INFO)
            .init();
    }
}
