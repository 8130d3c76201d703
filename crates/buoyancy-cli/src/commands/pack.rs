use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;
use tracing::debug;

use buoyancy_cli::output::{render_packing_table, write_json, DisplayFormat};
use buoyancy_cli::terminal::ColorPalette;
use buoyancy_lib::{calculate_hex_packing, Orientation};

use super::parse::{parse_box, BoxSize};

#[derive(Args, Debug, Clone)]
pub struct PackArgs {
    /// Cylinder outer diameter in mm.
    #[arg(long)]
    pub diameter: f64,

    /// Cylinder overall length in mm.
    #[arg(long)]
    pub length: f64,

    /// Box size as WIDTHxHEIGHTxDEPTH in mm.
    #[arg(long = "box", value_name = "WxHxD", value_parser = parse_box)]
    pub box_size: BoxSize,

    /// Cylinder axis to try: all, x, y or z.
    #[arg(long, default_value = "all")]
    pub orientation: Orientation,

    /// Upper bound on cylinders per box (0 for no limit).
    #[arg(long, default_value_t = 0)]
    pub max_count: u64,

    /// Clearance added around each cylinder in mm.
    #[arg(long, default_value_t = 0.0)]
    pub padding: f64,

    #[arg(long, value_enum, default_value_t = DisplayFormat::Table)]
    pub format: DisplayFormat,
}

pub fn handle_pack(args: &PackArgs, palette: &ColorPalette) -> Result<()> {
    for (name, value) in [
        ("diameter", args.diameter),
        ("length", args.length),
        ("box width", args.box_size.width_mm),
        ("box height", args.box_size.height_mm),
        ("box depth", args.box_size.depth_mm),
    ] {
        if !value.is_finite() || value <= 0.0 {
            bail!("{name} must be a positive number, got {value}");
        }
    }
    if !args.padding.is_finite() || args.padding < 0.0 {
        bail!("padding must be zero or positive, got {}", args.padding);
    }

    let packings = calculate_hex_packing(
        args.diameter,
        args.length,
        args.box_size.width_mm,
        args.box_size.height_mm,
        args.box_size.depth_mm,
        args.orientation,
        args.max_count,
        args.padding,
    );
    debug!(axes = packings.len(), "packed box");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        DisplayFormat::Table => render_packing_table(&mut out, &packings, args.max_count, palette)?,
        DisplayFormat::Json => write_json(&mut out, &packings)?,
    }
    out.flush()?;
    Ok(())
}
