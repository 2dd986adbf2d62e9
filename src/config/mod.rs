pub mod keywords;

pub use keywords::{KeywordConfig, CONFIG_FILE};

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_directory, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const LOG_FILE: &str = "output.log";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sc-formatter")]
#[command(about = "Convert firewall change-request spreadsheets into Secure Change format")]
pub struct CliConfig {
    /// Directory holding the .xlsx files and config.json
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Keyword config file (defaults to config.json in --dir)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| self.dir.join(CONFIG_FILE))
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_directory("dir", &self.dir)
    }
}
