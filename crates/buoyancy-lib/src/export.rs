//! CSV export of ranked results.

use std::io::Write;

use csv::Writer;

use crate::error::Result;
use crate::optimizer::OptimizationResult;

const BASE_HEADERS: &[&str] = &[
    "Rank",
    "Material",
    "Diameter (mm)",
    "Length (mm)",
    "Wall (mm)",
    "Endcap (mm)",
    "Mass (g)",
    "Buoyancy (g)",
    "Ratio",
    "Method",
    "Failure Depth (m)",
    "Failure Mode",
    "Safety Factor",
];

const PACKING_HEADERS: &[&str] = &[
    "Count",
    "Axis",
    "Layers",
    "Per Layer",
    "Total Mass (kg)",
    "Total Buoyancy (kg)",
];

/// Write `results` as CSV with a header row.
///
/// Packing columns are added when the first result carries packing data.
/// An infinite safety factor is written as `inf`.
pub fn write_results_csv<W: Write>(writer: W, results: &[OptimizationResult]) -> Result<()> {
    let packed = results
        .first()
        .map(|result| result.packing().is_some())
        .unwrap_or(false);

    let mut csv = Writer::from_writer(writer);
    let mut headers: Vec<&str> = BASE_HEADERS.to_vec();
    if packed {
        headers.extend_from_slice(PACKING_HEADERS);
    }
    csv.write_record(&headers)?;

    for result in results {
        csv.write_record(result_row(result, packed))?;
    }
    csv.flush()?;
    Ok(())
}

fn result_row(result: &OptimizationResult, packed: bool) -> Vec<String> {
    let cylinder = result.cylinder();
    let safety_factor = cylinder.failure.actual_safety_factor;

    let mut row = vec![
        cylinder.rank.to_string(),
        cylinder.material_key.clone(),
        format!("{:.1}", cylinder.diameter_mm),
        format!("{:.1}", cylinder.length_mm),
        format!("{:.2}", cylinder.wall_thickness_mm),
        format!("{:.2}", cylinder.endcap_thickness_mm),
        format!("{:.1}", cylinder.buoyancy.mass_kg * 1000.0),
        format!("{:.1}", cylinder.buoyancy.net_buoyancy_kg * 1000.0),
        format!("{:.2}", cylinder.buoyancy.buoyancy_ratio),
        cylinder.wall_method.to_string(),
        format!("{:.1}", cylinder.failure.failure_depth_m),
        cylinder.failure.failure_mode.to_string(),
        if safety_factor.is_finite() {
            format!("{safety_factor:.2}")
        } else {
            "inf".to_string()
        },
    ];

    if packed {
        match result.packing() {
            Some(packing) => row.extend([
                packing.count.to_string(),
                packing.orientation.to_string(),
                packing.layers.to_string(),
                packing.circles_per_layer.to_string(),
                format!("{:.2}", packing.total_mass_kg),
                format!("{:.2}", packing.total_buoyancy_kg),
            ]),
            None => row.resize(BASE_HEADERS.len() + PACKING_HEADERS.len(), String::new()),
        }
    }
    row
}
