use std::path::Path;

use anyhow::{bail, Context, Result};
use user_archiver::config::ArchiverConfig;

/// Display the effective configuration (after file, env and flag overrides).
pub fn run_show(config: &ArchiverConfig) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// `config init` writes the effective configuration as a starting file.
pub fn run_init(config: &ArchiverConfig, target: &Path, force: bool) -> Result<()> {
    if target.exists() && !force {
        bail!("{} already exists (use --force to replace it)", target.display());
    }
    config
        .save(target)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    tracing::info!(path = %target.display(), "Configuration written");
    println!("Wrote {}", target.display());
    Ok(())
}
