//! Hydrostatic pressure and depth conversions.

/// Standard gravity used for all hydrostatic and weight conversions (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Default sea-water density (kg/m³).
pub const DEFAULT_WATER_DENSITY: f64 = 1025.0;

/// Convert an operating depth to hydrostatic gauge pressure.
///
/// `pressure_mpa = water_density * g * depth_m / 1e6`
///
/// Callers must supply a positive `water_density`; the optimizer validates
/// this before any conversion takes place.
///
/// # Examples
///
/// ```
/// use buoyancy_lib::depth_to_pressure;
///
/// let p = depth_to_pressure(100.0, 1000.0);
/// assert!((p - 0.981).abs() < 1e-12);
/// ```
pub fn depth_to_pressure(depth_m: f64, water_density: f64) -> f64 {
    (water_density * GRAVITY * depth_m) / 1e6
}

/// Convert hydrostatic gauge pressure back to the equivalent depth.
///
/// Exact algebraic inverse of [`depth_to_pressure`].
pub fn pressure_to_depth(pressure_mpa: f64, water_density: f64) -> f64 {
    (pressure_mpa * 1e6) / (water_density * GRAVITY)
}
