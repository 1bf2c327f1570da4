//! Clap derive structures for the `cvcue` binary.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use cvcue_config::Overrides;

/// cvcue -- list the access points managed by a CV-CUE wireless manager
#[derive(Debug, Parser)]
#[command(
    name = "cvcue",
    version,
    about = "Print the name and IP address of every managed access point",
    long_about = "Logs in to the CV-CUE wireless manager API with an API key, pages\n\
        through the managed access points and prints one `name,ipAddress`\n\
        line per device, then logs out.\n\n\
        Settings come from the config file, CVCUE_* environment variables\n\
        and the flags below, in increasing order of precedence."
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, short = 'C', value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides config)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// API key identifier (overrides config)
    #[arg(long, value_name = "KEY_ID")]
    pub key_id: Option<String>,

    /// Records requested per page
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Output format
    #[arg(long, short = 'o', default_value = "csv")]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `name,ipAddress` line per access point (default)
    Csv,
    /// One JSON object per line
    Json,
    /// Pretty table, printed once every page has arrived
    Table,
}

impl Cli {
    /// Flag values that take precedence over file and environment settings.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            key_id: self.key_id.clone(),
            page_size: self.page_size,
            request_timeout: self.timeout,
            insecure: self.insecure.then_some(true),
        }
    }
}
