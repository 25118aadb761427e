//! CLI for wallfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wallfetch_core::config::{self, WallfetchConfig};

use commands::{run_completions, run_config, run_daemon, run_name, run_once};

/// Top-level CLI for wallfetch.
#[derive(Debug, Parser)]
#[command(name = "wallfetch")]
#[command(about = "wallfetch: keep a local copy of every regional daily wallpaper", long_about = None)]
pub struct Cli {
    /// Log to stderr instead of the state-dir log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Where to read config from, and per-run overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigArgs {
    /// Config file (default: ~/.config/wallfetch/config.toml, created if missing).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Destination directory (overrides `destination_path`).
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<WallfetchConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        if let Some(dest) = &self.dest {
            cfg.destination_path = dest.clone();
        }
        cfg.validate()?;
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Poll every region on a timer until SIGINT/SIGTERM.
    Run {
        #[command(flatten)]
        config: ConfigArgs,

        /// Seconds between cycles (overrides `poll_interval_secs`).
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,
    },

    /// Run a single cycle, wait for its downloads, and exit.
    Once {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the canonical local file name for an image URL.
    Name {
        /// Absolute image URL.
        url: String,
    },

    /// Show the config file path and the effective configuration.
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub async fn run(self) -> Result<()> {
        match self {
            CliCommand::Run { config, interval } => {
                let mut cfg = config.load()?;
                if let Some(secs) = interval {
                    cfg.poll_interval_secs = secs;
                    cfg.validate()?;
                }
                run_daemon(&cfg).await?;
            }
            CliCommand::Once { config } => run_once(&config.load()?).await?,
            CliCommand::Name { url } => run_name(&url)?,
            CliCommand::Config { config } => run_config(&config)?,
            CliCommand::Completions { shell } => run_completions(shell),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
