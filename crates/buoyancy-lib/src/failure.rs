//! Failure pressure of a sized cylinder.
//!
//! Inverts the four sizing criteria of [`crate::thickness`] for pressure, using the
//! actual chosen thicknesses and the raw yield strength (no safety factor), and
//! reports the weakest mode.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::thickness::{buckling_length_factor, EndcapConstraint};
use crate::units::pressure_to_depth;

/// Mechanism that fails first as external pressure rises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureMode {
    WallStress,
    WallBuckling,
    EndcapStress,
    EndcapBuckling,
}

impl FailureMode {
    /// Human-readable label shown in tables and exports.
    pub fn label(self) -> &'static str {
        match self {
            FailureMode::WallStress => "wall-stress",
            FailureMode::WallBuckling => "wall-buckling",
            FailureMode::EndcapStress => "endcap-stress",
            FailureMode::EndcapBuckling => "endcap-buckling",
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geometry needed to evaluate failure, all in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderGeometry {
    pub outer_diameter_mm: f64,
    pub length_mm: f64,
    pub wall_thickness_mm: f64,
    pub endcap_thickness_mm: f64,
}

impl CylinderGeometry {
    pub fn inner_diameter_mm(&self) -> f64 {
        self.outer_diameter_mm - 2.0 * self.wall_thickness_mm
    }
}

/// Pressure at which each mode would fail (MPa).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FailurePressures {
    pub wall_stress: f64,
    pub wall_buckling: f64,
    pub endcap_stress: f64,
    pub endcap_buckling: f64,
}

impl FailurePressures {
    /// Modes in evaluation order; earlier modes win ties.
    pub fn in_order(&self) -> [(FailureMode, f64); 4] {
        [
            (FailureMode::WallStress, self.wall_stress),
            (FailureMode::WallBuckling, self.wall_buckling),
            (FailureMode::EndcapStress, self.endcap_stress),
            (FailureMode::EndcapBuckling, self.endcap_buckling),
        ]
    }

    /// The weakest mode and its pressure.
    pub fn governing(&self) -> (FailureMode, f64) {
        let modes = self.in_order();
        let mut weakest = modes[0];
        for candidate in &modes[1..] {
            if candidate.1 < weakest.1 {
                weakest = *candidate;
            }
        }
        weakest
    }
}

/// Failure summary for one candidate at a given operating pressure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureReport {
    pub failure_pressure_mpa: f64,
    pub failure_depth_m: f64,
    pub failure_mode: FailureMode,
    /// Failure pressure over operating pressure; infinite at zero load.
    #[serde(with = "infinite_as_null")]
    pub actual_safety_factor: f64,
}

/// Evaluate all four failure pressures.
///
/// `inner_diameter_mm` must be positive; the optimizer only analyzes
/// candidates with at least 5 mm of bore.
pub fn failure_pressures(
    geometry: &CylinderGeometry,
    material: &Material,
    constraint: EndcapConstraint,
) -> FailurePressures {
    let d = geometry.outer_diameter_mm;
    let t = geometry.wall_thickness_mm;
    let t_end = geometry.endcap_thickness_mm;
    let e = material.elastic_modulus;
    let nu = material.poissons_ratio;
    let sigma_y = material.yield_strength;

    let ro2 = (d / 2.0).powi(2);
    let ri = geometry.inner_diameter_mm() / 2.0;
    let ri2 = ri.powi(2);

    let wall_stress = sigma_y * (ro2 - ri2) / (ro2 + ri2);

    let length_factor = buckling_length_factor(geometry.length_mm, d);
    let wall_buckling = 2.0 * e * (t / d).powi(3) / (1.0 - nu * nu) / length_factor;

    let endcap_stress = match constraint {
        EndcapConstraint::Fixed => (4.0 / 3.0) * sigma_y * t_end.powi(2) / ri2,
        EndcapConstraint::Floating => (8.0 / 3.0) * sigma_y * t_end.powi(2) / ((3.0 + nu) * ri2),
    };

    let endcap_buckling = constraint.buckling_coefficient() * e * (t_end / ri).powi(3);

    FailurePressures {
        wall_stress,
        wall_buckling,
        endcap_stress,
        endcap_buckling,
    }
}

/// Failure pressure, depth, mode and actual safety factor for a candidate.
pub fn analyze_failure(
    geometry: &CylinderGeometry,
    material: &Material,
    constraint: EndcapConstraint,
    operating_pressure_mpa: f64,
    water_density: f64,
) -> FailureReport {
    let (failure_mode, failure_pressure_mpa) =
        failure_pressures(geometry, material, constraint).governing();

    FailureReport {
        failure_pressure_mpa,
        failure_depth_m: pressure_to_depth(failure_pressure_mpa, water_density),
        failure_mode,
        actual_safety_factor: if operating_pressure_mpa > 0.0 {
            failure_pressure_mpa / operating_pressure_mpa
        } else {
            f64::INFINITY
        },
    }
}

/// JSON has no infinity; store it as `null` and read `null` back as infinity.
pub(crate) mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
