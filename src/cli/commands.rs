//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "moodlog")]
#[command(about = "Encrypted mood journal for the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding journal files and moodlog.toml
    #[arg(long, value_name = "DIR", env = "MOODLOG_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
