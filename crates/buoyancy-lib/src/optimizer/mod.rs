//! Exhaustive grid search over diameter, length and material.
//!
//! Every candidate is sized by [`crate::thickness`], weighed by
//! [`crate::buoyancy`] and checked by [`crate::failure`]. Candidates that are
//! too thin, mostly endcap or that sink are dropped. With box packing enabled
//! each survivor is packed per orientation and ranked by total buoyancy.

pub mod grid;
pub mod params;
pub mod result;

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::buoyancy::calc_buoyancy;
use crate::error::{Error, Result};
use crate::failure::{analyze_failure, CylinderGeometry};
use crate::material::MaterialCatalog;
use crate::packing::calculate_hex_packing;
use crate::thickness::{calc_endcap_thickness, calc_wall_thickness, WallMethod, WallThickness};

pub use grid::{GridRange, GridValues};
pub use params::{
    BoxDimensions, MaterialSelection, OptimizationParams, ResolvedMaterial, COMPARE_ALL_KEY,
};
pub use result::{CylinderResult, OptimizationResult, PackedCylinderResult, MAX_RESULTS};

/// Smallest bore a candidate may keep after subtracting both walls.
pub const MIN_INNER_DIAMETER_MM: f64 = 5.0;

/// Endcaps may take up less than this share of the cylinder length.
pub const MAX_ENDCAP_LENGTH_SHARE: f64 = 0.8;

/// Clonable flag that stops a running [`Optimizer`] between candidates.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Grid-search driver bound to a material catalog.
///
/// Cancellation sticks until [`Optimizer::reset`] is called, so a cancel that
/// lands before a run starts still stops it.
#[derive(Debug)]
pub struct Optimizer<'c> {
    catalog: &'c MaterialCatalog,
    cancelled: Arc<AtomicBool>,
}

impl Default for Optimizer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer<'static> {
    /// Optimizer over the built-in catalog.
    pub fn new() -> Self {
        Self::with_catalog(MaterialCatalog::builtin())
    }
}

impl<'c> Optimizer<'c> {
    pub fn with_catalog(catalog: &'c MaterialCatalog) -> Self {
        Self {
            catalog,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn catalog(&self) -> &MaterialCatalog {
        self.catalog
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle(Arc::clone(&self.cancelled))
    }

    /// Clear a previous cancellation.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }

    /// Validate `params`, evaluate the whole grid and return the ranked list.
    ///
    /// Results are sorted by descending ranking key, ties broken by diameter,
    /// length, material position and packing axis. At most [`MAX_RESULTS`]
    /// are returned. A cancelled run returns [`Error::Cancelled`] and no
    /// results.
    pub fn run(&self, params: &OptimizationParams) -> Result<Vec<OptimizationResult>> {
        params.validate()?;
        let materials = params.resolve_materials(self.catalog)?;

        let mut ranked: Vec<(usize, OptimizationResult)> = Vec::new();
        let mut evaluated = 0usize;
        for (position, resolved) in materials.iter().enumerate() {
            let tally = self.search_material(params, resolved, |result| {
                ranked.push((position, result));
            })?;
            evaluated += tally.evaluated;
            debug!(
                material = %resolved.key,
                evaluated = tally.evaluated,
                kept = tally.kept,
                too_thin = tally.too_thin,
                endcap_overflow = tally.endcap_overflow,
                sinks = tally.sinks,
                over_capacity = tally.over_capacity,
                "searched material"
            );
        }

        ranked.sort_by(|(pos_a, a), (pos_b, b)| compare_results(a, *pos_a, b, *pos_b));

        let feasible = ranked.len();
        let truncated = feasible > MAX_RESULTS;
        if truncated {
            warn!(feasible, kept = MAX_RESULTS, "result list truncated");
        }

        let results: Vec<OptimizationResult> = ranked
            .into_iter()
            .take(MAX_RESULTS)
            .enumerate()
            .map(|(index, (_, mut result))| {
                result.set_rank(index + 1);
                result
            })
            .collect();

        info!(
            materials = materials.len(),
            evaluated,
            feasible,
            kept = results.len(),
            truncated,
            packing = params.packing_enabled(),
            "optimization complete"
        );

        Ok(results)
    }

    fn search_material(
        &self,
        params: &OptimizationParams,
        resolved: &ResolvedMaterial,
        mut emit: impl FnMut(OptimizationResult),
    ) -> Result<Tally> {
        let mut tally = Tally::default();
        let lengths = params.length_range();

        for diameter in params.diameter_range().values() {
            for length in lengths.values() {
                if self.cancelled.load(Ordering::Relaxed) {
                    return Err(Error::Cancelled);
                }
                tally.evaluated += 1;

                let cylinder = match evaluate_candidate(params, resolved, diameter, length) {
                    Candidate::Feasible(cylinder) => cylinder,
                    Candidate::TooThin => {
                        tally.too_thin += 1;
                        continue;
                    }
                    Candidate::EndcapOverflow => {
                        tally.endcap_overflow += 1;
                        continue;
                    }
                    Candidate::Sinks => {
                        tally.sinks += 1;
                        continue;
                    }
                };

                if !params.packing_enabled() {
                    tally.kept += 1;
                    emit(OptimizationResult::Single(cylinder));
                    continue;
                }

                let envelope = &params.box_dimensions;
                let packings = calculate_hex_packing(
                    diameter,
                    length,
                    envelope.width_mm,
                    envelope.height_mm,
                    envelope.depth_mm,
                    envelope.orientation,
                    envelope.max_count,
                    envelope.padding_mm,
                );
                for packing in packings {
                    if packing.exceeds(envelope.max_count) {
                        tally.over_capacity += 1;
                        continue;
                    }
                    let count = packing.count as f64;
                    tally.kept += 1;
                    emit(OptimizationResult::Packed(PackedCylinderResult {
                        count: packing.count,
                        orientation: packing.orientation,
                        layers: packing.layers_along_axis,
                        circles_per_layer: packing.circles_per_layer,
                        total_buoyancy_kg: count * cylinder.buoyancy.net_buoyancy_kg,
                        total_mass_kg: count * cylinder.buoyancy.mass_kg,
                        cylinder: cylinder.clone(),
                    }));
                }
            }
        }

        Ok(tally)
    }
}

/// Run the grid search over the built-in catalog.
///
/// # Example
///
/// ```
/// use buoyancy_lib::{optimize, GridRange, OptimizationParams};
///
/// let params = OptimizationParams {
///     diameter: GridRange::new(80.0, 100.0, 10.0),
///     length: GridRange::new(200.0, 300.0, 50.0),
///     ..OptimizationParams::default()
/// };
/// let results = optimize(&params).unwrap();
/// assert!(!results.is_empty());
/// assert_eq!(results[0].rank(), 1);
/// ```
pub fn optimize(params: &OptimizationParams) -> Result<Vec<OptimizationResult>> {
    Optimizer::new().run(params)
}

#[derive(Debug, Default)]
struct Tally {
    evaluated: usize,
    kept: usize,
    too_thin: usize,
    endcap_overflow: usize,
    sinks: usize,
    over_capacity: usize,
}

enum Candidate {
    Feasible(CylinderResult),
    TooThin,
    EndcapOverflow,
    Sinks,
}

fn evaluate_candidate(
    params: &OptimizationParams,
    resolved: &ResolvedMaterial,
    diameter_mm: f64,
    length_mm: f64,
) -> Candidate {
    let material = &resolved.material;
    let pressure = params.pressure_mpa;

    let wall = match params.forced_wall_thickness_mm {
        Some(thickness_mm) => WallThickness {
            thickness_mm,
            method: WallMethod::Forced,
        },
        None => calc_wall_thickness(
            pressure,
            diameter_mm,
            length_mm,
            material,
            params.safety_factor,
        ),
    };

    let inner_diameter_mm = diameter_mm - 2.0 * wall.thickness_mm;
    if inner_diameter_mm < MIN_INNER_DIAMETER_MM {
        return Candidate::TooThin;
    }

    let endcap_mm = params.forced_endcap_thickness_mm.unwrap_or_else(|| {
        calc_endcap_thickness(
            pressure,
            inner_diameter_mm,
            material,
            params.safety_factor,
            params.endcap_constraint,
        )
    });
    if 2.0 * endcap_mm >= MAX_ENDCAP_LENGTH_SHARE * length_mm {
        return Candidate::EndcapOverflow;
    }

    let buoyancy = calc_buoyancy(
        diameter_mm,
        length_mm,
        wall.thickness_mm,
        endcap_mm,
        material,
        params.water_density,
    );
    if buoyancy.net_buoyancy_kg <= 0.0 {
        return Candidate::Sinks;
    }

    let geometry = CylinderGeometry {
        outer_diameter_mm: diameter_mm,
        length_mm,
        wall_thickness_mm: wall.thickness_mm,
        endcap_thickness_mm: endcap_mm,
    };
    let failure = analyze_failure(
        &geometry,
        material,
        params.endcap_constraint,
        pressure,
        params.water_density,
    );

    Candidate::Feasible(CylinderResult {
        rank: 0,
        material_key: resolved.key.clone(),
        material_name: material.name.clone(),
        diameter_mm,
        length_mm,
        wall_thickness_mm: wall.thickness_mm,
        endcap_thickness_mm: endcap_mm,
        wall_method: wall.method,
        inner_diameter_mm,
        inner_length_mm: length_mm - 2.0 * endcap_mm,
        buoyancy,
        failure,
    })
}

/// Descending ranking key, then ascending diameter, length, material position
/// and packing axis.
fn compare_results(
    a: &OptimizationResult,
    position_a: usize,
    b: &OptimizationResult,
    position_b: usize,
) -> CmpOrdering {
    let axis = |r: &OptimizationResult| r.packing().map(|p| p.orientation);
    b.ranking_key()
        .total_cmp(&a.ranking_key())
        .then_with(|| a.cylinder().diameter_mm.total_cmp(&b.cylinder().diameter_mm))
        .then_with(|| a.cylinder().length_mm.total_cmp(&b.cylinder().length_mm))
        .then_with(|| position_a.cmp(&position_b))
        .then_with(|| axis(a).cmp(&axis(b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn abs_params() -> OptimizationParams {
        OptimizationParams {
            pressure_mpa: 0.3,
            material: MaterialSelection::custom(
                "ABS",
                Material::new("ABS", 1050.0, 40.0, 2300.0, 0.35, 3.0),
            ),
            safety_factor: 3.0,
            diameter: GridRange::fixed(100.0),
            length: GridRange::fixed(300.0),
            ..OptimizationParams::default()
        }
    }

    #[test]
    fn candidate_uses_larger_wall_bound() {
        let params = abs_params();
        let resolved = params
            .resolve_materials(MaterialCatalog::builtin())
            .expect("resolve")
            .remove(0);
        let Candidate::Feasible(result) = evaluate_candidate(&params, &resolved, 100.0, 300.0)
        else {
            panic!("ABS 100x300 should float");
        };
        assert_eq!(result.wall_method, WallMethod::Buckling);
        assert!((result.wall_thickness_mm - 5.1043).abs() < 1e-3);
        assert!(result.buoyancy.net_buoyancy_kg > 0.0);
    }

    #[test]
    fn thick_forced_wall_is_too_thin_bore() {
        let params = OptimizationParams {
            forced_wall_thickness_mm: Some(48.0),
            ..abs_params()
        };
        let resolved = params
            .resolve_materials(MaterialCatalog::builtin())
            .expect("resolve")
            .remove(0);
        assert!(matches!(
            evaluate_candidate(&params, &resolved, 100.0, 300.0),
            Candidate::TooThin
        ));
    }

    #[test]
    fn oversized_endcaps_are_rejected() {
        let params = OptimizationParams {
            forced_endcap_thickness_mm: Some(40.0),
            ..abs_params()
        };
        let resolved = params
            .resolve_materials(MaterialCatalog::builtin())
            .expect("resolve")
            .remove(0);
        // 2 * 40 >= 0.8 * 100
        assert!(matches!(
            evaluate_candidate(&params, &resolved, 100.0, 100.0),
            Candidate::EndcapOverflow
        ));
    }

    #[test]
    fn cancelled_optimizer_returns_no_results() {
        let optimizer = Optimizer::new();
        optimizer.cancel_handle().cancel();
        let err = optimizer.run(&abs_params()).unwrap_err();
        assert!(matches!(err, Error::Cancelled));

        optimizer.reset();
        assert_eq!(optimizer.run(&abs_params()).expect("run").len(), 1);
    }
}
