//! Command-line interface arguments of the proxy.
//!
//! Settings are read from the configuration file given with `--config`,
//! from `ORBS_PROXY__*` environment variables, and finally from the override
//! flags collected in [`ConfigOverrides`].

use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigOverrides;
use crate::logging::{LogFormat, LogLevel};

#[derive(Parser, Clone, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML configuration file
    #[arg(long, env = "ORBS_PROXY_CONFIG", value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Log level (default: `info`)
    #[arg(long, value_name = "LOG_LEVEL", value_enum)]
    pub log_level: Option<LogLevel>,

    /// Log format (default: `plaintext`)
    #[arg(long, value_name = "LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

impl Args {
    /// new returns a new instance of the arguments.
    pub fn new() -> Self {
        Self::parse()
    }

    pub fn get_log_level_or_default(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }

    pub fn get_log_format_or_default(&self) -> LogFormat {
        self.log_format.unwrap_or_default()
    }
}
