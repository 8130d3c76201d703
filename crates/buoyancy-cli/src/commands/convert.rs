use std::io::{self, Write};

use anyhow::{bail, Result};
use clap::Args;

use buoyancy_cli::output::{render_conversion, write_json, Conversion, DisplayFormat};
use buoyancy_cli::terminal::ColorPalette;
use buoyancy_lib::units::DEFAULT_WATER_DENSITY;
use buoyancy_lib::{depth_to_pressure, pressure_to_depth};

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Water depth in metres.
    #[arg(long, conflicts_with = "pressure", required_unless_present = "pressure")]
    pub depth: Option<f64>,

    /// Gauge pressure in MPa.
    #[arg(long)]
    pub pressure: Option<f64>,

    /// Water density in kg/m³.
    #[arg(long, default_value_t = DEFAULT_WATER_DENSITY)]
    pub water_density: f64,

    #[arg(long, value_enum, default_value_t = DisplayFormat::Table)]
    pub format: DisplayFormat,
}

pub fn handle_convert(args: &ConvertArgs, palette: &ColorPalette) -> Result<()> {
    if !args.water_density.is_finite() || args.water_density <= 0.0 {
        bail!("water density must be positive, got {}", args.water_density);
    }

    let conversion = match (args.depth, args.pressure) {
        (Some(depth_m), _) => Conversion {
            depth_m,
            pressure_mpa: depth_to_pressure(depth_m, args.water_density),
            water_density: args.water_density,
        },
        (None, Some(pressure_mpa)) => Conversion {
            depth_m: pressure_to_depth(pressure_mpa, args.water_density),
            pressure_mpa,
            water_density: args.water_density,
        },
        (None, None) => bail!("either --depth or --pressure is required"),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        DisplayFormat::Table => render_conversion(&mut out, &conversion, palette)?,
        DisplayFormat::Json => write_json(&mut out, &conversion)?,
    }
    out.flush()?;
    Ok(())
}
