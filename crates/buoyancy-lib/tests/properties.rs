//! Property-based tests for the sizing, buoyancy and packing invariants.

use buoyancy_lib::{
    calc_buoyancy, calc_endcap_thickness, calc_wall_thickness, calculate_hex_packing,
    depth_to_pressure, pressure_to_depth, EndcapConstraint, GridRange, MaterialCatalog,
    Orientation,
};
use proptest::prelude::*;

fn catalog_index() -> impl Strategy<Value = usize> {
    0..MaterialCatalog::builtin().len()
}

proptest! {
    #[test]
    fn depth_round_trips(depth in 0.0f64..11_000.0, density in 990.0f64..1050.0) {
        let back = pressure_to_depth(depth_to_pressure(depth, density), density);
        prop_assert!((back - depth).abs() <= 1e-9 * depth.max(1.0));
    }

    #[test]
    fn walls_never_close_the_bore(
        index in catalog_index(),
        pressure in 0.0f64..5.0,
        diameter in 10.0f64..400.0,
        length_ratio in 0.5f64..10.0,
        safety_factor in 1.0f64..4.0,
    ) {
        let material = &MaterialCatalog::builtin().entries()[index].material;
        let wall = calc_wall_thickness(
            pressure,
            diameter,
            diameter * length_ratio,
            material,
            safety_factor,
        );
        prop_assert!(wall.thickness_mm > 0.0);
        prop_assert!(diameter - 2.0 * wall.thickness_mm > 0.0, "{:?}", wall);
    }

    #[test]
    fn endcaps_respect_the_floor(
        index in catalog_index(),
        pressure in 0.0f64..5.0,
        inner_diameter in 5.0f64..400.0,
        floating in any::<bool>(),
    ) {
        let material = &MaterialCatalog::builtin().entries()[index].material;
        let constraint = if floating { EndcapConstraint::Floating } else { EndcapConstraint::Fixed };
        let t = calc_endcap_thickness(pressure, inner_diameter, material, 2.5, constraint);
        prop_assert!(t >= 1.0);
    }

    #[test]
    fn buoyancy_identities_hold(
        index in catalog_index(),
        diameter in 20.0f64..300.0,
        length in 50.0f64..1000.0,
        wall_share in 0.01f64..0.4,
        endcap in 1.0f64..10.0,
    ) {
        let material = &MaterialCatalog::builtin().entries()[index].material;
        let wall = diameter * wall_share / 2.0;
        let report = calc_buoyancy(diameter, length, wall, endcap, material, 1025.0);
        prop_assert_eq!(report.net_buoyancy_kg, report.displaced_water_kg - report.mass_kg);
        prop_assert_eq!(report.buoyancy_ratio, report.displaced_water_kg / report.mass_kg);
        prop_assert!(report.material_volume_l < report.outer_volume_l);
    }

    #[test]
    fn packing_counts_are_layers_times_circles(
        diameter in 5.0f64..200.0,
        length in 5.0f64..500.0,
        width in 1.0f64..1000.0,
        height in 1.0f64..1000.0,
        depth in 1.0f64..1000.0,
        max_count in 0u64..50,
    ) {
        let results = calculate_hex_packing(
            diameter, length, width, height, depth, Orientation::All, max_count, 0.0,
        );
        prop_assert_eq!(results.len(), 3);
        for result in results {
            prop_assert_eq!(
                result.uncapped_count,
                result.layers_along_axis * result.circles_per_layer
            );
            if max_count > 0 {
                prop_assert!(result.count <= max_count);
            }
            prop_assert!(result.count <= result.uncapped_count);
        }
    }

    #[test]
    fn grid_samples_stay_in_range(
        min in 1.0f64..500.0,
        span in 0.0f64..500.0,
        step in 0.5f64..50.0,
    ) {
        let range = GridRange::new(min, min + span, step);
        let values: Vec<f64> = range.values().collect();
        prop_assert!(!values.is_empty());
        prop_assert_eq!(values[0], min);
        for value in &values {
            prop_assert!(*value <= min + span + 1e-6);
        }
        let next = min + values.len() as f64 * step;
        prop_assert!(next > min + span);
    }
}
