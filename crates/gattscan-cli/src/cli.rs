//! Command-line interface definitions and parsing

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Bluetooth adapter to scan with (system default when omitted)
    pub adapter: Option<String>,

    /// Device name to connect to when discovered
    #[arg(short, long)]
    pub name: Option<String>,

    /// Scan window in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
