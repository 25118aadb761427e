//! `wallfetch config` – show where config lives and what is in effect.

use anyhow::Result;
use wallfetch_core::config;

use crate::cli::ConfigArgs;

pub fn run_config(args: &ConfigArgs) -> Result<()> {
    let path = match &args.config {
        Some(p) => p.clone(),
        None => config::config_path()?,
    };
    let cfg = args.load()?;
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&cfg)?);
    Ok(())
}
