use anyhow::Result;
use std::path::Path;

use crate::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};

/// Write the default configuration into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
