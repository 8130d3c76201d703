//! `materials` subcommand and shared catalog loading.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use buoyancy_cli::output::{material_rows, render_materials_table, write_json, DisplayFormat};
use buoyancy_cli::terminal::ColorPalette;
use buoyancy_lib::MaterialCatalog;

#[derive(Args, Debug, Clone)]
pub struct MaterialsArgs {
    /// CSV of extra materials appended to the built-in catalog.
    #[arg(long, value_name = "PATH")]
    pub materials_csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = DisplayFormat::Table)]
    pub format: DisplayFormat,
}

/// The built-in catalog, extended with `extra_csv` when given.
pub fn load_catalog(extra_csv: Option<&Path>) -> Result<MaterialCatalog> {
    let mut catalog = MaterialCatalog::builtin().clone();
    if let Some(path) = extra_csv {
        let extra = MaterialCatalog::from_path(path)
            .with_context(|| format!("failed to load materials from {}", path.display()))?;
        info!(path = %path.display(), count = extra.len(), "loaded custom materials");
        catalog
            .extend_from(&extra)
            .with_context(|| format!("cannot merge materials from {}", path.display()))?;
    }
    Ok(catalog)
}

pub fn handle_materials(args: &MaterialsArgs, palette: &ColorPalette) -> Result<()> {
    let catalog = load_catalog(args.materials_csv.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        DisplayFormat::Table => render_materials_table(&mut out, &catalog, palette)?,
        DisplayFormat::Json => write_json(&mut out, &material_rows(&catalog))?,
    }
    out.flush()?;
    Ok(())
}
