//! Command-line and environment configuration.
//!
//! Every option can be given as a flag or through its `MARKAZ_*`
//! environment variable; flags win.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Production Apps Script endpoint serving the Markaz spreadsheet.
pub const DEFAULT_API_URL: &str = "https://script.google.com/macros/s/AKfycby0vBZzlavwngzdT-Y27Lfr0Lax7-Z4mNvLxbwBCS0eDI5xdJZ8BnglEpeIbEAPiJzh/exec";

/// Markaz Academy in the terminal
#[derive(Parser, Debug, Clone)]
#[command(name = "markaz-tui", version, about)]
pub struct Config {
    /// Content API endpoint
    #[arg(long, env = "MARKAZ_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Seconds between automatic refreshes
    #[arg(
        long,
        env = "MARKAZ_REFRESH_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub refresh_secs: u64,

    /// Only fetch at startup and on `r`
    #[arg(long, env = "MARKAZ_NO_AUTO_REFRESH")]
    pub no_auto_refresh: bool,

    /// HTTP timeout in seconds
    #[arg(
        long,
        env = "MARKAZ_TIMEOUT_SECS",
        default_value_t = 20,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Maximum number of search results shown
    #[arg(long, env = "MARKAZ_MAX_RESULTS", default_value_t = 8)]
    pub max_results: usize,

    /// Log file (the terminal itself is taken by the UI)
    #[arg(long, env = "MARKAZ_LOG_FILE", default_value = "markaz-tui.log")]
    pub log_file: PathBuf,
}

impl Config {
    /// The auto-refresh interval, or `None` when disabled.
    pub fn refresh_interval(&self) -> Option<Duration> {
        (!self.no_auto_refresh).then(|| Duration::from_secs(self.refresh_secs))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
