//! `apiload profiles`

use super::{write_structured, OutputFormat};
use anyhow::{Context, Result};
use apiload_config::{format_engine_duration, ProfileRegistry};
use std::io::Write;

/// One line per profile: name, base URL, run length and peak VUs
pub fn handle_profiles_list<W: Write>(out: &mut W, registry: &ProfileRegistry) -> Result<()> {
    let width = registry.names().map(str::len).max().unwrap_or(0);

    for profile in registry.iter() {
        writeln!(
            out,
            "{:<width$}  {}  duration={} peak_vus={} thresholds={}",
            profile.name,
            profile.base_url,
            format_engine_duration(profile.total_duration()),
            profile.peak_target(),
            profile.thresholds.len(),
            width = width
        )
        .context("Failed to write output")?;
    }

    Ok(())
}

pub fn handle_profiles_show<W: Write>(
    out: &mut W,
    registry: &ProfileRegistry,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let profile = registry.get(name)?;
    write_structured(out, profile, format)
}

/// Engine options of one profile, pretty JSON
pub fn handle_profiles_export<W: Write>(
    out: &mut W,
    registry: &ProfileRegistry,
    name: &str,
) -> Result<()> {
    let profile = registry.get(name)?;
    write_structured(out, &profile.engine_options(), OutputFormat::Json)
}
