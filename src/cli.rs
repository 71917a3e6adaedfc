// pixie/src/cli.rs
use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pixie")]
#[command(about = "Generate responsive images, asset thumbnails and favicons", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resize every configured profile, asset set and favicon (default)
    Run,

    /// Print the files a run would write without touching the disk
    Plan,

    /// Write a commented sample configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn action(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_run_with_default_config() {
        let cli = Cli::try_parse_from(["pixie"]).unwrap();
        assert_eq!(cli.action(), Commands::Run);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(!cli.verbose);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["pixie", "plan", "--config", "site.toml", "-v"]).unwrap();
        assert_eq!(cli.action(), Commands::Plan);
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        assert!(cli.verbose);
    }

    #[test]
    fn init_accepts_force() {
        let cli = Cli::try_parse_from(["pixie", "init", "--force"]).unwrap();
        assert_eq!(cli.action(), Commands::Init { force: true });
    }
}
