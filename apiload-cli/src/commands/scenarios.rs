//! `apiload scenarios`

use super::{write_structured, OutputFormat};
use anyhow::{Context, Result};
use apiload_config::{format_engine_duration, ScenarioCatalog};
use std::io::Write;

pub fn handle_scenarios_list<W: Write>(out: &mut W, catalog: &ScenarioCatalog) -> Result<()> {
    let width = catalog.names().map(str::len).max().unwrap_or(0);

    for scenario in catalog.iter() {
        writeln!(
            out,
            "{:<width$}  type={} duration={} peak_vus={} endpoints={}  {}",
            scenario.name,
            scenario.test_type().unwrap_or("-"),
            format_engine_duration(scenario.total_duration()),
            scenario.peak_target(),
            scenario.endpoints.len(),
            scenario.description,
            width = width
        )
        .context("Failed to write output")?;
    }

    Ok(())
}

pub fn handle_scenarios_show<W: Write>(
    out: &mut W,
    catalog: &ScenarioCatalog,
    name: &str,
    format: OutputFormat,
) -> Result<()> {
    let scenario = catalog.get(name)?;
    write_structured(out, scenario, format)
}

pub fn handle_scenarios_export<W: Write>(
    out: &mut W,
    catalog: &ScenarioCatalog,
    name: &str,
) -> Result<()> {
    let scenario = catalog.get(name)?;
    write_structured(out, &scenario.engine_options(), OutputFormat::Json)
}
