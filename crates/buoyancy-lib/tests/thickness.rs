use buoyancy_lib::thickness::{
    wall_buckling_thickness, wall_stress_thickness, MIN_ENDCAP_THICKNESS_MM,
    NOMINAL_WALL_THICKNESS_MM,
};
use buoyancy_lib::{
    calc_endcap_thickness, calc_wall_thickness, EndcapConstraint, Material, MaterialCatalog,
    WallMethod,
};

fn abs() -> Material {
    MaterialCatalog::builtin().get("ABS").expect("ABS in catalog").clone()
}

#[test]
fn wall_takes_the_larger_bound() {
    let material = abs();
    let stress = wall_stress_thickness(0.3, 50.0, material.allowable_stress(3.0));
    let buckling = wall_buckling_thickness(0.3, 100.0, 300.0, &material, 3.0);

    let wall = calc_wall_thickness(0.3, 100.0, 300.0, &material, 3.0);
    assert_eq!(wall.thickness_mm, stress.max(buckling));
    assert_eq!(wall.method, WallMethod::Buckling);
    assert!((wall.thickness_mm - 5.1043).abs() < 1e-3);
}

#[test]
fn stress_scan_lands_on_quarter_millimetre_steps() {
    let t = wall_stress_thickness(0.3, 50.0, abs().allowable_stress(3.0));
    assert_eq!(t, 1.25);
}

#[test]
fn zero_pressure_uses_nominal_thicknesses() {
    let material = abs();
    let wall = calc_wall_thickness(0.0, 100.0, 300.0, &material, 3.0);
    assert_eq!(wall.thickness_mm, NOMINAL_WALL_THICKNESS_MM);
    assert_eq!(
        calc_endcap_thickness(0.0, 90.0, &material, 3.0, EndcapConstraint::Fixed),
        MIN_ENDCAP_THICKNESS_MM
    );
}

#[test]
fn tiny_endcaps_respect_the_floor() {
    let t = calc_endcap_thickness(0.001, 6.0, &abs(), 1.0, EndcapConstraint::Fixed);
    assert_eq!(t, MIN_ENDCAP_THICKNESS_MM);
}

#[test]
fn floating_endcaps_are_thicker_than_fixed() {
    let material = abs();
    for inner in [20.0, 60.0, 140.0] {
        let fixed = calc_endcap_thickness(0.5, inner, &material, 2.5, EndcapConstraint::Fixed);
        let floating =
            calc_endcap_thickness(0.5, inner, &material, 2.5, EndcapConstraint::Floating);
        assert!(floating >= fixed, "inner {inner}: {floating} < {fixed}");
    }
}

#[test]
fn catalog_walls_leave_a_bore() {
    for entry in MaterialCatalog::builtin().entries() {
        for diameter in [10.0, 25.0, 100.0, 300.0] {
            let wall = calc_wall_thickness(2.0, diameter, 3.0 * diameter, &entry.material, 3.0);
            assert!(
                diameter - 2.0 * wall.thickness_mm > 0.0,
                "{} at {diameter} mm: {wall:?}",
                entry.key
            );
        }
    }
}
