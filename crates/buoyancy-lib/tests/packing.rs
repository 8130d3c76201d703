use buoyancy_lib::packing::calculate_hex_packing_for_axis;
use buoyancy_lib::{calculate_hex_packing, Axis, Orientation};

#[test]
fn all_orientations_in_axis_order() {
    let results = calculate_hex_packing(20.0, 50.0, 100.0, 100.0, 100.0, Orientation::All, 0, 0.0);
    let axes: Vec<Axis> = results.iter().map(|r| r.orientation).collect();
    assert_eq!(axes, vec![Axis::X, Axis::Y, Axis::Z]);
    for result in &results {
        assert_eq!(result.count, 46);
        assert_eq!(result.layers_along_axis, 2);
        assert_eq!(result.circles_per_layer, 23);
    }
}

#[test]
fn single_orientation_returns_one_result() {
    let results = calculate_hex_packing(20.0, 50.0, 100.0, 100.0, 100.0, Orientation::Y, 0, 0.0);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].orientation, Axis::Y);
}

#[test]
fn orientation_selects_plane_and_axis() {
    // 200 wide box: along x the width holds 4 layers of the 100 x 100 plane,
    // along y or z the 200 x 100 plane holds 48 per layer over 2 layers.
    let x = calculate_hex_packing_for_axis(20.0, 50.0, 200.0, 100.0, 100.0, Axis::X, 0, 0.0);
    assert_eq!((x.layers_along_axis, x.circles_per_layer, x.count), (4, 23, 92));

    let y = calculate_hex_packing_for_axis(20.0, 50.0, 200.0, 100.0, 100.0, Axis::Y, 0, 0.0);
    assert_eq!((y.layers_along_axis, y.circles_per_layer, y.count), (2, 48, 96));

    let z = calculate_hex_packing_for_axis(20.0, 50.0, 200.0, 100.0, 100.0, Axis::Z, 0, 0.0);
    assert_eq!(z.count, 96);
}

#[test]
fn max_count_caps_but_keeps_true_count() {
    let result = calculate_hex_packing_for_axis(20.0, 50.0, 100.0, 100.0, 100.0, Axis::Z, 10, 0.0);
    assert_eq!(result.count, 10);
    assert_eq!(result.uncapped_count, 46);
    assert!(result.exceeds(10));
    assert!(!result.exceeds(0));
    assert!(!result.exceeds(46));
}

#[test]
fn padding_widens_the_packing_diameter() {
    let padded = calculate_hex_packing_for_axis(18.0, 50.0, 100.0, 100.0, 100.0, Axis::Z, 0, 1.0);
    let plain = calculate_hex_packing_for_axis(20.0, 50.0, 100.0, 100.0, 100.0, Axis::Z, 0, 0.0);
    assert_eq!(padded, plain);
}

#[test]
fn degenerate_inputs_pack_nothing() {
    let cases = [
        (0.0, 50.0, 100.0, 100.0, 100.0),
        (20.0, 0.0, 100.0, 100.0, 100.0),
        (20.0, 50.0, 0.0, 100.0, 100.0),
        (20.0, 50.0, 100.0, -5.0, 100.0),
        (20.0, 50.0, 100.0, 100.0, 0.0),
        (20.0, 150.0, 100.0, 100.0, 100.0),
        (120.0, 50.0, 100.0, 100.0, 100.0),
    ];
    for (d, l, w, h, depth) in cases {
        for result in calculate_hex_packing(d, l, w, h, depth, Orientation::All, 0, 0.0) {
            assert_eq!(result.count, 0, "{d} x {l} in {w} x {h} x {depth}");
        }
    }
}

#[test]
fn huge_boxes_saturate_instead_of_overflowing() {
    for result in calculate_hex_packing(1.0, 1.0, 1e10, 1e10, 1e10, Orientation::All, 0, 0.0) {
        assert_eq!(result.count, u64::MAX);
        assert_eq!(result.layers_along_axis, 10_000_000_000);
    }

    let capped = calculate_hex_packing_for_axis(1.0, 1.0, 1e10, 1e10, 1e10, Axis::Z, 500, 0.0);
    assert_eq!(capped.count, 500);
    assert!(capped.exceeds(500));
}
