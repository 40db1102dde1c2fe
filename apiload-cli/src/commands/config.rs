//! `apiload config`

use super::{write_structured, OutputFormat};
use anyhow::{Context, Result};
use apiload_config::{ApiloadConfig, ConfigLoader};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Handle configuration validation
pub fn handle_config_validate<W: Write>(out: &mut W, config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        anyhow::bail!("Configuration file not found: {}", config_file.display());
    }

    let config = ConfigLoader::new()
        .from_file(config_file)
        .with_context(|| format!("Configuration validation failed for {}", config_file.display()))?;
    let registry = config
        .profile_registry()
        .context("Configured profiles are invalid")?;

    writeln!(
        out,
        "{} Configuration file is valid ({} profiles available)",
        "✅".green(),
        registry.len()
    )?;

    Ok(())
}

/// Handle configuration generation
pub fn handle_config_generate<W: Write>(out: &mut W, output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        anyhow::bail!(
            "Output file already exists: {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, ApiloadConfig::generate_sample())
        .context("Failed to write configuration file")?;

    writeln!(out, "{} Configuration generated at: {}", "✅".green(), output.display())?;
    writeln!(out, "📝 Edit the file to customize settings for your environment")?;
    writeln!(
        out,
        "🔧 Validate with: apiload config validate --config-file {}",
        output.display()
    )?;

    Ok(())
}

/// Handle configuration display
pub fn handle_config_show<W: Write>(
    out: &mut W,
    config: &ApiloadConfig,
    format: OutputFormat,
) -> Result<()> {
    info!("Showing configuration (format: {})", format);
    write_structured(out, config, format)
}
