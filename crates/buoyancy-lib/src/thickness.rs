//! Minimum wall and endcap thickness for a cylinder under external pressure.
//!
//! Each thickness is the worse of a stress limit and a buckling limit:
//!
//! - Wall stress: thick-wall (Lamé) hoop stress, searched in 0.25 mm steps.
//! - Wall buckling: von Mises collapse of a long shell with a short-cylinder bonus.
//! - Endcap stress: flat circular plate, clamped (`fixed`) or simply supported (`floating`).
//! - Endcap buckling: plate stability with a constraint-dependent coefficient.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::material::Material;

/// Wall thickness returned when there is no load to resist (mm).
pub const NOMINAL_WALL_THICKNESS_MM: f64 = 0.5;

/// Minimum endcap thickness, also returned when there is no load (mm).
pub const MIN_ENDCAP_THICKNESS_MM: f64 = 1.0;

/// Increment of the stress-bound thickness search (mm).
pub const WALL_SEARCH_STEP_MM: f64 = 0.25;

/// Iteration cap of the stress-bound thickness search.
pub const WALL_SEARCH_ITERATIONS: usize = 200;

/// Edge support condition of the flat endcaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndcapConstraint {
    /// Clamped edges that cannot rotate.
    #[default]
    Fixed,
    /// Simply supported edges free to rotate.
    Floating,
}

impl EndcapConstraint {
    /// Plate buckling coefficient `k` used in `t = R * cbrt(P * SF / (k * E))`.
    pub fn buckling_coefficient(self) -> f64 {
        match self {
            EndcapConstraint::Fixed => 4.2,
            EndcapConstraint::Floating => 3.6,
        }
    }
}

impl fmt::Display for EndcapConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EndcapConstraint::Fixed => "fixed",
            EndcapConstraint::Floating => "floating",
        };
        f.write_str(value)
    }
}

/// Which criterion determined a wall thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallMethod {
    Stress,
    Buckling,
    /// Supplied by the caller rather than computed.
    Forced,
}

impl fmt::Display for WallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            WallMethod::Stress => "stress",
            WallMethod::Buckling => "buckling",
            WallMethod::Forced => "forced",
        };
        f.write_str(value)
    }
}

/// A computed wall thickness and the criterion that governed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallThickness {
    pub thickness_mm: f64,
    pub method: WallMethod,
}

/// Short-cylinder correction applied to wall buckling.
///
/// `1.0` when `L/D >= 5`, otherwise `max(0.7, sqrt((L/D)/5))`.
pub fn buckling_length_factor(length_mm: f64, outer_diameter_mm: f64) -> f64 {
    let length_ratio = length_mm / outer_diameter_mm;
    if length_ratio < 5.0 {
        (length_ratio / 5.0).sqrt().max(0.7)
    } else {
        1.0
    }
}

/// Thick-wall hoop stress (MPa) at external pressure `pressure_mpa`.
pub fn lame_hoop_stress(pressure_mpa: f64, outer_radius_mm: f64, inner_radius_mm: f64) -> f64 {
    let ro2 = outer_radius_mm.powi(2);
    let ri2 = inner_radius_mm.powi(2);
    pressure_mpa * (ro2 + ri2) / (ro2 - ri2)
}

/// Stress-limited wall thickness via a linear scan.
///
/// Starts at 0.5 mm and grows by 0.25 mm until the Lamé hoop stress is at or
/// below the allowable stress, for at most 200 steps. If the inner radius would
/// vanish the thickness is clamped to `0.9 * Ro`.
pub fn wall_stress_thickness(pressure_mpa: f64, outer_radius_mm: f64, allowable_mpa: f64) -> f64 {
    let mut thickness = NOMINAL_WALL_THICKNESS_MM;
    for _ in 0..WALL_SEARCH_ITERATIONS {
        let inner_radius = outer_radius_mm - thickness;
        if inner_radius <= 0.0 {
            return outer_radius_mm * 0.9;
        }
        if lame_hoop_stress(pressure_mpa, outer_radius_mm, inner_radius) <= allowable_mpa {
            break;
        }
        thickness += WALL_SEARCH_STEP_MM;
    }
    thickness
}

/// Buckling-limited wall thickness (closed form).
///
/// `t = D * cbrt(P * (1 - nu^2) * SF * lengthFactor / (2E))`
pub fn wall_buckling_thickness(
    pressure_mpa: f64,
    outer_diameter_mm: f64,
    length_mm: f64,
    material: &Material,
    safety_factor: f64,
) -> f64 {
    let nu = material.poissons_ratio;
    let length_factor = buckling_length_factor(length_mm, outer_diameter_mm);
    outer_diameter_mm
        * ((pressure_mpa * (1.0 - nu * nu) * safety_factor * length_factor)
            / (2.0 * material.elastic_modulus))
            .cbrt()
}

/// Minimum wall thickness for the given external pressure.
///
/// Returns the larger of the stress and buckling bounds, tagged with the
/// governing criterion. Ties go to the stress bound.
pub fn calc_wall_thickness(
    pressure_mpa: f64,
    outer_diameter_mm: f64,
    length_mm: f64,
    material: &Material,
    safety_factor: f64,
) -> WallThickness {
    if pressure_mpa <= 0.0 {
        return WallThickness {
            thickness_mm: NOMINAL_WALL_THICKNESS_MM,
            method: WallMethod::Stress,
        };
    }

    let outer_radius = outer_diameter_mm / 2.0;
    let t_stress = wall_stress_thickness(
        pressure_mpa,
        outer_radius,
        material.allowable_stress(safety_factor),
    );
    let t_buckle = wall_buckling_thickness(
        pressure_mpa,
        outer_diameter_mm,
        length_mm,
        material,
        safety_factor,
    );

    if t_buckle > t_stress {
        WallThickness {
            thickness_mm: t_buckle,
            method: WallMethod::Buckling,
        }
    } else {
        WallThickness {
            thickness_mm: t_stress,
            method: WallMethod::Stress,
        }
    }
}

/// Stress-limited endcap thickness for a flat circular plate.
///
/// - fixed: `t = sqrt(3 P R^2 / (4 sigma))`
/// - floating: `t = sqrt(3 (3 + nu) P R^2 / (8 sigma))`
pub fn endcap_stress_thickness(
    pressure_mpa: f64,
    radius_mm: f64,
    material: &Material,
    allowable_mpa: f64,
    constraint: EndcapConstraint,
) -> f64 {
    let pr2 = pressure_mpa * radius_mm.powi(2);
    match constraint {
        EndcapConstraint::Fixed => ((3.0 * pr2) / (4.0 * allowable_mpa)).sqrt(),
        EndcapConstraint::Floating => {
            ((3.0 * (3.0 + material.poissons_ratio) * pr2) / (8.0 * allowable_mpa)).sqrt()
        }
    }
}

/// Buckling-limited endcap thickness: `t = R * cbrt(P * SF / (k * E))`.
pub fn endcap_buckling_thickness(
    pressure_mpa: f64,
    radius_mm: f64,
    material: &Material,
    safety_factor: f64,
    constraint: EndcapConstraint,
) -> f64 {
    radius_mm
        * ((pressure_mpa * safety_factor)
            / (constraint.buckling_coefficient() * material.elastic_modulus))
            .cbrt()
}

/// Minimum endcap thickness for endcaps spanning `inner_diameter_mm`.
///
/// The result never drops below [`MIN_ENDCAP_THICKNESS_MM`].
pub fn calc_endcap_thickness(
    pressure_mpa: f64,
    inner_diameter_mm: f64,
    material: &Material,
    safety_factor: f64,
    constraint: EndcapConstraint,
) -> f64 {
    if pressure_mpa <= 0.0 {
        return MIN_ENDCAP_THICKNESS_MM;
    }

    let radius = inner_diameter_mm / 2.0;
    let t_stress = endcap_stress_thickness(
        pressure_mpa,
        radius,
        material,
        material.allowable_stress(safety_factor),
        constraint,
    );
    let t_buckle =
        endcap_buckling_thickness(pressure_mpa, radius, material, safety_factor, constraint);

    t_stress.max(t_buckle).max(MIN_ENDCAP_THICKNESS_MM)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs() -> Material {
        Material::new("ABS", 1050.0, 40.0, 2300.0, 0.35, 3.0)
    }

    #[test]
    fn zero_pressure_returns_nominal_values() {
        let wall = calc_wall_thickness(0.0, 100.0, 300.0, &abs(), 3.0);
        assert_eq!(wall.thickness_mm, NOMINAL_WALL_THICKNESS_MM);
        assert_eq!(wall.method, WallMethod::Stress);
        let cap = calc_endcap_thickness(0.0, 90.0, &abs(), 3.0, EndcapConstraint::Fixed);
        assert_eq!(cap, MIN_ENDCAP_THICKNESS_MM);
    }

    #[test]
    fn length_factor_bounds() {
        assert_eq!(buckling_length_factor(500.0, 100.0), 1.0);
        assert_eq!(buckling_length_factor(1000.0, 100.0), 1.0);
        assert_eq!(buckling_length_factor(100.0, 100.0), 0.7);
        let mid = buckling_length_factor(300.0, 100.0);
        assert!((mid - 0.6f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stress_scan_lands_on_quarter_millimetre_grid() {
        // 0.3 MPa, Ro = 50 mm, sigma_allow = 40/3 MPa needs t >= ~1.11 mm.
        let t = wall_stress_thickness(0.3, 50.0, 40.0 / 3.0);
        assert_eq!(t, 1.25);
    }

    #[test]
    fn stress_scan_clamps_when_wall_consumes_radius() {
        // Ro = 1 mm: 0.5 -> 0.75 -> 1.0 reaches Ri = 0 before the stress is satisfied.
        let t = wall_stress_thickness(50.0, 1.0, 10.0);
        assert!((t - 0.9).abs() < 1e-12);
    }

    #[test]
    fn stress_scan_stops_after_iteration_cap() {
        let t = wall_stress_thickness(5.0, 10_000.0, 1.0);
        assert!((t - (0.5 + 200.0 * 0.25)).abs() < 1e-9);
    }

    #[test]
    fn buckling_governs_for_abs_at_thirty_metres() {
        let wall = calc_wall_thickness(0.3, 100.0, 300.0, &abs(), 3.0);
        assert_eq!(wall.method, WallMethod::Buckling);
        let expected = wall_buckling_thickness(0.3, 100.0, 300.0, &abs(), 3.0);
        assert_eq!(wall.thickness_mm, expected);
        assert!((wall.thickness_mm - 5.104).abs() < 0.01, "{}", wall.thickness_mm);
    }

    #[test]
    fn floating_endcap_is_thicker_than_fixed() {
        let fixed = calc_endcap_thickness(0.3, 90.0, &abs(), 3.0, EndcapConstraint::Fixed);
        let floating = calc_endcap_thickness(0.3, 90.0, &abs(), 3.0, EndcapConstraint::Floating);
        assert!(floating > fixed);
    }

    #[test]
    fn endcap_respects_minimum_floor() {
        let cap = calc_endcap_thickness(0.001, 6.0, &abs(), 1.0, EndcapConstraint::Fixed);
        assert_eq!(cap, MIN_ENDCAP_THICKNESS_MM);
    }

    #[test]
    fn wall_method_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WallMethod::Buckling).unwrap(),
            "\"buckling\""
        );
        assert_eq!(
            serde_json::from_str::<EndcapConstraint>("\"floating\"").unwrap(),
            EndcapConstraint::Floating
        );
    }
}
