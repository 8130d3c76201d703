//! Volumes, mass and net buoyancy of a capped cylinder.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::material::Material;
use crate::units::GRAVITY;

/// Buoyancy figures for one cylinder geometry.
///
/// Volumes are in litres, masses in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuoyancyReport {
    pub outer_volume_l: f64,
    pub inner_volume_l: f64,
    pub material_volume_l: f64,
    pub mass_kg: f64,
    pub displaced_water_kg: f64,
    /// Displaced water minus vessel mass; negative when the vessel sinks.
    pub net_buoyancy_kg: f64,
    pub net_buoyancy_n: f64,
    /// Displaced water mass over vessel mass, `0` for a massless vessel.
    pub buoyancy_ratio: f64,
}

/// Compute buoyancy for a fully submerged cylinder with flush flat endcaps.
///
/// The tube wall spans `length - 2 * endcap` and the endcaps are discs at the
/// inner diameter. Negative net buoyancy is reported as is.
pub fn calc_buoyancy(
    outer_diameter_mm: f64,
    length_mm: f64,
    wall_thickness_mm: f64,
    endcap_thickness_mm: f64,
    material: &Material,
    water_density: f64,
) -> BuoyancyReport {
    let outer_radius = outer_diameter_mm / 2000.0;
    let inner_radius = (outer_diameter_mm - 2.0 * wall_thickness_mm) / 2000.0;
    let length = length_mm / 1000.0;
    let endcap = endcap_thickness_mm / 1000.0;
    let tube_length = length - 2.0 * endcap;

    let v_outer = PI * outer_radius.powi(2) * length;
    let v_wall = PI * (outer_radius.powi(2) - inner_radius.powi(2)) * tube_length;
    let v_endcaps = 2.0 * PI * inner_radius.powi(2) * endcap;
    let v_material = v_wall + v_endcaps;
    let v_inner = PI * inner_radius.powi(2) * tube_length;

    let mass_kg = v_material * material.density;
    let displaced_water_kg = v_outer * water_density;
    let net_buoyancy_kg = displaced_water_kg - mass_kg;

    BuoyancyReport {
        outer_volume_l: v_outer * 1000.0,
        inner_volume_l: v_inner * 1000.0,
        material_volume_l: v_material * 1000.0,
        mass_kg,
        displaced_water_kg,
        net_buoyancy_kg,
        net_buoyancy_n: net_buoyancy_kg * GRAVITY,
        buoyancy_ratio: if mass_kg > 0.0 {
            displaced_water_kg / mass_kg
        } else {
            0.0
        },
    }
}
