use clap::Parser;

use crate::constants::{CYCLES_API_URL, HOUR_LAG, TRAFFIC_API_URL};

/// Coordination Diagram Collector Configuration
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Cycles (signal phase) API endpoint.
    #[arg(long, value_name = "URL", default_value = CYCLES_API_URL)]
    pub cycles_url: String,

    /// Traffic (detector trigger) API endpoint.
    #[arg(long, value_name = "URL", default_value = TRAFFIC_API_URL)]
    pub traffic_url: String,

    /// Directory for the output CSV files.
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub out_dir: String,

    /// Hours to look back when deriving the poll timestamp.
    #[arg(long, default_value_t = HOUR_LAG)]
    pub hour_lag: i64,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub http_timeout: u64,

    /// Verbose logging (DEBUG level)
    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,
}
