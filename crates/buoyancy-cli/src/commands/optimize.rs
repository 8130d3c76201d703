//! `optimize` subcommand.
//!
//! Settings start from a project file (or the defaults), command-line flags
//! override individual fields, and the merged configuration is what gets
//! saved with `--save-project`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use buoyancy_cli::output::{render_results_table, write_json, OutputFormat};
use buoyancy_cli::terminal::ColorPalette;
use buoyancy_lib::optimizer::COMPARE_ALL_KEY;
use buoyancy_lib::project::{project_name_from_path, DEFAULT_PROJECT_NAME};
use buoyancy_lib::{
    load_project, save_project, write_results_csv, GridRange, OptimizationResult, Optimizer,
    Orientation, ProjectConfig, SavedProject,
};

use super::materials::load_catalog;
use super::parse::{parse_box, parse_range, BoxSize, EndcapArg};

#[derive(Args, Debug, Clone, Default)]
pub struct OptimizeArgs {
    /// Project file to start from.
    #[arg(long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Operating depth in metres.
    #[arg(long, conflicts_with = "pressure")]
    pub depth: Option<f64>,

    /// Operating gauge pressure in MPa.
    #[arg(long)]
    pub pressure: Option<f64>,

    /// Water density in kg/m³.
    #[arg(long)]
    pub water_density: Option<f64>,

    /// Material key, or ALL to compare the catalog.
    #[arg(long, conflicts_with = "compare")]
    pub material: Option<String>,

    /// Compare several materials (comma separated; empty for the whole catalog).
    #[arg(long, num_args = 0.., value_delimiter = ',', value_name = "KEYS")]
    pub compare: Option<Vec<String>>,

    /// Required safety factor on collapse.
    #[arg(long)]
    pub safety_factor: Option<f64>,

    /// Diameter grid as MIN:MAX:STEP (mm), or a single diameter.
    #[arg(long, value_parser = parse_range)]
    pub diameter: Option<GridRange>,

    /// Length grid as MIN:MAX:STEP (mm), or a single length.
    #[arg(long, value_parser = parse_range)]
    pub length: Option<GridRange>,

    /// Use this wall thickness (mm) instead of sizing it.
    #[arg(long)]
    pub wall_thickness: Option<f64>,

    /// Use this endcap thickness (mm) instead of sizing it.
    #[arg(long)]
    pub endcap_thickness: Option<f64>,

    /// Endcap edge support.
    #[arg(long, value_enum)]
    pub endcap: Option<EndcapArg>,

    /// Pack results into a box of WIDTHxHEIGHTxDEPTH mm.
    #[arg(long = "box", value_name = "WxHxD", value_parser = parse_box)]
    pub box_size: Option<BoxSize>,

    /// Upper bound on cylinders per box (0 for no limit).
    #[arg(long)]
    pub max_count: Option<u64>,

    /// Cylinder axis to try when packing: all, x, y or z.
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Clearance around each packed cylinder in mm.
    #[arg(long)]
    pub padding: Option<f64>,

    /// Only evaluate this diameter when packing (mm).
    #[arg(long)]
    pub force_diameter: Option<f64>,

    /// Only evaluate this length when packing (mm).
    #[arg(long)]
    pub force_length: Option<f64>,

    /// CSV of extra materials appended to the built-in catalog.
    #[arg(long, value_name = "PATH")]
    pub materials_csv: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Rows shown in table output.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Write results here instead of stdout.
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Save the merged settings and results as a project file.
    #[arg(long, value_name = "PATH")]
    pub save_project: Option<PathBuf>,
}

pub fn handle_optimize(args: &OptimizeArgs, palette: &ColorPalette) -> Result<()> {
    let config = build_config(args)?;
    let params = config.to_params();
    let catalog = load_catalog(args.materials_csv.as_deref())?;

    info!(
        pressure_mpa = params.pressure_mpa,
        material = %config.selected_material,
        packing = params.packing_enabled(),
        "starting optimization"
    );
    let results = Optimizer::with_catalog(&catalog)
        .run(&params)
        .context("optimization failed")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_results(&mut out, args, &results, config.safety_factor, &ColorPalette::plain())?;
            out.flush()?;
            info!(path = %path.display(), count = results.len(), "wrote results");
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_results(&mut out, args, &results, config.safety_factor, palette)?;
            out.flush()?;
        }
    }

    if let Some(path) = &args.save_project {
        let project = SavedProject::new(project_name(path), config, results);
        save_project(path, &project)
            .with_context(|| format!("failed to save project to {}", path.display()))?;
        info!(path = %path.display(), "saved project");
    }
    Ok(())
}

fn write_results<W: Write>(
    out: &mut W,
    args: &OptimizeArgs,
    results: &[OptimizationResult],
    required_safety_factor: f64,
    palette: &ColorPalette,
) -> Result<()> {
    match args.format {
        OutputFormat::Table => {
            render_results_table(out, results, args.limit, required_safety_factor, palette)?
        }
        OutputFormat::Json => write_json(out, results)?,
        OutputFormat::Csv => write_results_csv(&mut *out, results)?,
    }
    Ok(())
}

fn project_name(path: &Path) -> String {
    project_name_from_path(path).unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string())
}

/// Merge the starting project (or defaults) with the flags that were given.
pub fn build_config(args: &OptimizeArgs) -> Result<ProjectConfig> {
    let mut config = match &args.project {
        Some(path) => {
            load_project(path)
                .with_context(|| format!("failed to load project {}", path.display()))?
                .config
        }
        None => ProjectConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.depth_m = depth;
        config.use_direct_pressure = false;
    }
    if let Some(pressure) = args.pressure {
        config.pressure_mpa = pressure;
        config.use_direct_pressure = true;
    }
    if let Some(density) = args.water_density {
        config.water_density = density;
    }
    if let Some(sf) = args.safety_factor {
        config.safety_factor = sf;
    }

    if let Some(keys) = &args.compare {
        config.selected_material = COMPARE_ALL_KEY.to_string();
        config.selected_materials = keys
            .iter()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .collect();
    } else if let Some(material) = &args.material {
        config.selected_material = material.trim().to_string();
        config.custom_material = None;
    }

    if let Some(range) = args.diameter {
        config.min_diameter_mm = range.min;
        config.max_diameter_mm = range.max;
        config.diameter_step_mm = range.step;
    }
    if let Some(range) = args.length {
        config.min_length_mm = range.min;
        config.max_length_mm = range.max;
        config.length_step_mm = range.step;
    }
    if args.wall_thickness.is_some() {
        config.forced_wall_thickness_mm = args.wall_thickness;
    }
    if args.endcap_thickness.is_some() {
        config.forced_endcap_thickness_mm = args.endcap_thickness;
    }
    if let Some(endcap) = args.endcap {
        config.endcap_constraint = endcap.into();
    }

    let packing = &mut config.box_dimensions;
    if let Some(size) = args.box_size {
        packing.width_mm = size.width_mm;
        packing.height_mm = size.height_mm;
        packing.depth_mm = size.depth_mm;
        packing.enabled = true;
    }
    if let Some(max_count) = args.max_count {
        packing.max_count = max_count;
    }
    if let Some(orientation) = args.orientation {
        packing.orientation = orientation;
    }
    if let Some(padding) = args.padding {
        packing.padding_mm = padding;
    }
    if args.force_diameter.is_some() {
        packing.forced_diameter_mm = args.force_diameter;
    }
    if args.force_length.is_some() {
        packing.forced_length_mm = args.force_length;
    }

    Ok(config)
}
