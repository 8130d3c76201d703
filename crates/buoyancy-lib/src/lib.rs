//! Buoyancy cylinder optimizer library entry points.
//!
//! This crate sizes hollow cylinders against external hydrostatic pressure,
//! evaluates their net buoyancy and failure margin, searches a diameter and
//! length grid for the most buoyant feasible designs, and packs them into a
//! rectangular box. Callers (the CLI, benches) should use the items exported
//! here rather than reaching into submodules.
//!

pub mod buoyancy;
pub mod error;
pub mod export;
pub mod failure;
pub mod material;
pub mod optimizer;
pub mod packing;
pub mod project;
pub mod thickness;
pub mod units;

pub use buoyancy::{calc_buoyancy, BuoyancyReport};
pub use error::{Error, Result};
pub use export::write_results_csv;
pub use failure::{analyze_failure, CylinderGeometry, FailureMode, FailureReport};
pub use material::{Material, MaterialCatalog};
pub use optimizer::{
    optimize, BoxDimensions, CancelHandle, CylinderResult, GridRange, MaterialSelection,
    OptimizationParams, OptimizationResult, Optimizer, PackedCylinderResult, MAX_RESULTS,
};
pub use packing::{calculate_hex_packing, Axis, Orientation, PackingResult};
pub use project::{load_project, save_project, ProjectConfig, SavedProject};
pub use thickness::{
    calc_endcap_thickness, calc_wall_thickness, EndcapConstraint, WallMethod, WallThickness,
};
pub use units::{depth_to_pressure, pressure_to_depth};
