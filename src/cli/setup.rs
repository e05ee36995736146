use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use std::path::Path;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");
const BUNDLED_CATALOG: &str = include_str!("../../docs/currencies.json");

/// Creates the example configuration and the bundled currency catalog in the
/// default config directory
pub fn setup() -> Result<()> {
    let dir = AppConfig::default_config_dir()?;
    setup_in_dir(&dir)
}

/// Writes `config.yaml` (refusing to overwrite) and `currencies.json` (only
/// when absent) into `dir`
pub fn setup_in_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    let config_path = dir.join("config.yaml");

    if config_path.exists() {
        anyhow::bail!(
            "Configuration file already exists at {}",
            config_path.display()
        );
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    std::fs::write(&config_path, EXAMPLE_CONFIG)
        .with_context(|| format!("Failed to write config file to {}", config_path.display()))?;
    tracing::info!("Created default configuration at {}", config_path.display());

    let catalog_path = dir.join("currencies.json");
    if !catalog_path.exists() {
        std::fs::write(&catalog_path, BUNDLED_CATALOG).with_context(|| {
            format!("Failed to write currency catalog to {}", catalog_path.display())
        })?;
        tracing::info!("Created currency catalog at {}", catalog_path.display());
    }

    println!(
        "Configuration written to {}. Put your exchangerate-api.com key in {}",
        dir.display(),
        dir.join("api.txt").display()
    );
    Ok(())
}
