//! Renderers for optimization results, packings, materials and conversions.
//!
//! Every renderer writes to a `Write` so the binary can target stdout or a
//! file and tests can capture output in memory.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use buoyancy_lib::{Material, MaterialCatalog, OptimizationResult, PackingResult};

use crate::terminal::{format_with_separators, rule, ColorPalette};

/// Output format for `optimize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned, optionally colored table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// CSV with a header row.
    Csv,
}

/// Output format for the informational subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DisplayFormat {
    #[default]
    Table,
    Json,
}

/// Write any serializable value as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

/// Render the top `limit` results as a table.
///
/// `required_safety_factor` highlights candidates whose actual margin falls
/// below what was asked for.
pub fn render_results_table<W: Write>(
    out: &mut W,
    results: &[OptimizationResult],
    limit: usize,
    required_safety_factor: f64,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    if results.is_empty() {
        writeln!(out, "No feasible cylinders found.")?;
        return Ok(());
    }

    let packed = results[0].packing().is_some();
    let shown = results.len().min(limit);

    let mut header = format!(
        "{:>4} {:<10} {:>7} {:>7} {:>6} {:>6} {:>9} {:>9} {:>6} {:<8} {:>8} {:<15} {:>6}",
        "Rank",
        "Material",
        "D (mm)",
        "L (mm)",
        "Wall",
        "Cap",
        "Mass (g)",
        "Buoy (g)",
        "Ratio",
        "Method",
        "Fail (m)",
        "Mode",
        "SF"
    );
    if packed {
        header.push_str(&format!(
            " {:>6} {:<4} {:>10} {:>10}",
            "Count", "Axis", "Mass (kg)", "Buoy (kg)"
        ));
    }
    writeln!(out, "{}{}{}", p.heading, header, p.reset)?;
    writeln!(out, "{}{}{}", p.muted, rule(header.chars().count()), p.reset)?;

    for result in &results[..shown] {
        let c = result.cylinder();
        let sf = c.failure.actual_safety_factor;
        let sf_color = if sf < required_safety_factor {
            p.danger
        } else {
            p.positive
        };
        let sf_text = if sf.is_finite() {
            format!("{sf:.2}")
        } else {
            "inf".to_string()
        };

        write!(
            out,
            "{}{:>4}{} {:<10} {}{:>7.1} {:>7.1}{} {:>6.2} {:>6.2} {:>9.1} {}{:>9.1}{} {:>6.2} {:<8} {:>8.1} {}{:<15}{} {}{:>6}{}",
            p.muted,
            c.rank,
            p.reset,
            c.material_key,
            p.dimension,
            c.diameter_mm,
            c.length_mm,
            p.reset,
            c.wall_thickness_mm,
            c.endcap_thickness_mm,
            c.buoyancy.mass_kg * 1000.0,
            p.positive,
            c.buoyancy.net_buoyancy_kg * 1000.0,
            p.reset,
            c.buoyancy.buoyancy_ratio,
            c.wall_method.to_string(),
            c.failure.failure_depth_m,
            p.caution,
            c.failure.failure_mode.label(),
            p.reset,
            sf_color,
            sf_text,
            p.reset
        )?;
        if let Some(packing) = result.packing() {
            write!(
                out,
                " {:>6} {:<4} {:>10.2} {}{:>10.2}{}",
                format_with_separators(packing.count),
                packing.orientation.to_string(),
                packing.total_mass_kg,
                p.positive,
                packing.total_buoyancy_kg,
                p.reset
            )?;
        }
        writeln!(out)?;
    }

    if shown < results.len() {
        writeln!(
            out,
            "{}... {} more result(s) not shown{}",
            p.muted,
            format_with_separators((results.len() - shown) as u64),
            p.reset
        )?;
    }
    Ok(())
}

/// Render per-axis packings as a table.
pub fn render_packing_table<W: Write>(
    out: &mut W,
    packings: &[PackingResult],
    max_count: u64,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(
        out,
        "{}{:<4} {:>8} {:>10} {:>8}{}",
        p.heading, "Axis", "Layers", "Per Layer", "Count", p.reset
    )?;
    for packing in packings {
        let note = if packing.exceeds(max_count) {
            format!(
                " {}(capped from {}){}",
                p.caution,
                format_with_separators(packing.uncapped_count),
                p.reset
            )
        } else {
            String::new()
        };
        writeln!(
            out,
            "{:<4} {:>8} {:>10} {}{:>8}{}{}",
            packing.orientation.to_string(),
            packing.layers_along_axis,
            packing.circles_per_layer,
            p.positive,
            format_with_separators(packing.count),
            p.reset,
            note
        )?;
    }
    Ok(())
}

/// Catalog entry flattened for JSON output.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRow<'a> {
    pub key: &'a str,
    pub category: &'a str,
    #[serde(flatten)]
    pub material: &'a Material,
}

/// Catalog entries with their category, in display order.
pub fn material_rows(catalog: &MaterialCatalog) -> Vec<MaterialRow<'_>> {
    catalog
        .categories()
        .iter()
        .flat_map(|(category, keys)| {
            keys.iter().filter_map(move |key| {
                catalog.get(key).map(|material| MaterialRow {
                    key: key.as_str(),
                    category: category.as_str(),
                    material,
                })
            })
        })
        .collect()
}

/// Render the catalog grouped by category.
pub fn render_materials_table<W: Write>(
    out: &mut W,
    catalog: &MaterialCatalog,
    palette: &ColorPalette,
) -> io::Result<()> {
    let p = palette;
    writeln!(out, "Available materials ({}):", catalog.len())?;
    for (category, keys) in catalog.categories() {
        writeln!(out)?;
        writeln!(out, "{}{}{}", p.heading, category, p.reset)?;
        writeln!(
            out,
            "{}  {:<12} {:<36} {:>8} {:>8} {:>8} {:>5} {:>4}{}",
            p.muted, "Key", "Name", "kg/m³", "Yield", "E (MPa)", "ν", "SF", p.reset
        )?;
        for key in keys {
            if let Some(m) = catalog.get(key) {
                writeln!(
                    out,
                    "  {:<12} {:<36} {:>8.0} {:>8.0} {:>8.0} {:>5.2} {:>4.1}",
                    key,
                    m.name,
                    m.density,
                    m.yield_strength,
                    m.elastic_modulus,
                    m.poissons_ratio,
                    m.safety_factor
                )?;
            }
        }
    }
    Ok(())
}

/// Depth and pressure pair shown by `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub depth_m: f64,
    pub pressure_mpa: f64,
    pub water_density: f64,
}

pub fn render_conversion<W: Write>(
    out: &mut W,
    conversion: &Conversion,
    palette: &ColorPalette,
) -> io::Result<()> {
    writeln!(
        out,
        "{}{:.2} m{} = {}{:.4} MPa{} {}(water density {} kg/m³){}",
        palette.dimension,
        conversion.depth_m,
        palette.reset,
        palette.positive,
        conversion.pressure_mpa,
        palette.reset,
        palette.muted,
        conversion.water_density,
        palette.reset
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoyancy_lib::{calculate_hex_packing, optimize, GridRange, OptimizationParams, Orientation};

    fn render_to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).expect("render");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn empty_results_print_a_notice() {
        let text = render_to_string(|out| {
            render_results_table(out, &[], 10, 2.5, &ColorPalette::plain())
        });
        assert_eq!(text.trim(), "No feasible cylinders found.");
    }

    #[test]
    fn results_table_respects_limit() {
        let params = OptimizationParams {
            diameter: GridRange::new(80.0, 100.0, 10.0),
            length: GridRange::new(200.0, 300.0, 50.0),
            ..OptimizationParams::default()
        };
        let results = optimize(&params).expect("optimize");
        assert!(results.len() > 2);

        let text = render_to_string(|out| {
            render_results_table(out, &results, 2, 2.5, &ColorPalette::plain())
        });
        let lines: Vec<&str> = text.lines().collect();
        // header, rule, two rows, overflow note
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("Rank"));
        assert!(lines[2].trim_start().starts_with("1 ABS"));
        assert!(lines[4].contains("more result(s) not shown"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn packing_table_marks_capped_axes() {
        let packings = calculate_hex_packing(20.0, 50.0, 100.0, 100.0, 100.0, Orientation::Z, 10, 0.0);
        let text = render_to_string(|out| {
            render_packing_table(out, &packings, 10, &ColorPalette::plain())
        });
        assert!(text.contains("capped from 46"), "{text}");
    }

    #[test]
    fn material_rows_follow_category_order() {
        let rows = material_rows(MaterialCatalog::builtin());
        assert_eq!(rows.len(), MaterialCatalog::builtin().len());
        assert_eq!(rows[0].category, "Aluminum");
        let json = serde_json::to_value(&rows[0]).expect("json");
        assert_eq!(json["key"], "Al 6061-T6");
        assert!(json["yieldStrength"].is_number());
    }
}
