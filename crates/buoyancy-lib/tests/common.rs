#![allow(dead_code)]

use std::path::PathBuf;

use buoyancy_lib::{GridRange, MaterialSelection, OptimizationParams};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// ABS at 0.3 MPa with a 3.0 safety factor, one 100 x 300 mm candidate.
pub fn abs_single_candidate() -> OptimizationParams {
    OptimizationParams {
        pressure_mpa: 0.3,
        material: MaterialSelection::key("ABS"),
        safety_factor: 3.0,
        diameter: GridRange::fixed(100.0),
        length: GridRange::fixed(300.0),
        ..OptimizationParams::default()
    }
}
