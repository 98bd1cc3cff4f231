//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::Parser;

use crate::services::DEFAULT_STORAGE_KEY;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "life-clock")]
#[command(about = "A state-managed HTTP server that counts down a number of years")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// File the countdown state is persisted in
    #[arg(short, long, default_value = "life-clock.json")]
    pub state_file: PathBuf,

    /// Key the countdown record is stored under
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    pub storage_key: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
