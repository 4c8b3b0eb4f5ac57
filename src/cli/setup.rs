use crate::core::config::AppConfig;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use tracing::info;

const EXAMPLE_CONFIG: &str = include_str!("../../docs/example_config.yaml");
/// Sample value on the commented `data_path` line, swapped for the real one.
const DATA_PATH_SAMPLE: &str = "/home/me/.local/share/fundwise";

/// Writes the example configuration to the platform config directory.
pub fn setup() -> Result<()> {
    let config_path = AppConfig::default_config_path()?;
    let data_dir = AppConfig::default().default_data_path()?;
    setup_at_path(config_path, &data_dir)
}

fn render_config(data_dir: &Path) -> String {
    EXAMPLE_CONFIG.replace(DATA_PATH_SAMPLE, &data_dir.display().to_string())
}

/// Writes the example configuration to `path`, naming `data_dir` as the
/// store location. An existing file is never touched.
pub fn setup_at_path<P: AsRef<Path>>(path: P, data_dir: &Path) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        bail!(
            "Configuration file already exists at {}; remove it to generate a fresh one",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, render_config(data_dir))
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    info!(config = %path.display(), data = %data_dir.display(), "Wrote example configuration");
    println!("Configuration: {}", path.display());
    println!("Data directory: {}", data_dir.display());
    Ok(())
}
