//! `wallfetch name` – show the canonical file name for a URL.

use anyhow::{Context, Result};
use wallfetch_core::naming;

pub fn run_name(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("invalid URL {:?}", url))?;
    let name = naming::canonical_file_name(&parsed)?;
    println!("{}", name);
    Ok(())
}
