//! Hexagonal circle packing of cylinders inside a rectangular box.
//!
//! Cylinders are packed as circles in the plane perpendicular to their axis,
//! alternate rows shifted by half a diameter, and the layer is repeated along
//! the axis as many times as whole cylinder lengths fit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Vertical row spacing of hexagonal packing as a fraction of the diameter.
pub const HEX_ROW_SPACING: f64 = 0.866_025_403_784_438_6;

/// Box axis the cylinders' length runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Map box dimensions to `(plane width, plane height, axis length)`.
    ///
    /// - `x`: plane is height x depth, axis along width
    /// - `y`: plane is width x depth, axis along height
    /// - `z`: plane is width x height, axis along depth
    pub fn project(self, width_mm: f64, height_mm: f64, depth_mm: f64) -> (f64, f64, f64) {
        match self {
            Axis::X => (height_mm, depth_mm, width_mm),
            Axis::Y => (width_mm, depth_mm, height_mm),
            Axis::Z => (width_mm, height_mm, depth_mm),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(value)
    }
}

/// Requested packing orientation: one axis, or every axis evaluated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    All,
    X,
    Y,
    Z,
}

impl Orientation {
    /// Axes evaluated for this orientation, in x, y, z order.
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Orientation::All => &Axis::ALL,
            Orientation::X => &Axis::ALL[0..1],
            Orientation::Y => &Axis::ALL[1..2],
            Orientation::Z => &Axis::ALL[2..3],
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Orientation::All => "all",
            Orientation::X => "x",
            Orientation::Y => "y",
            Orientation::Z => "z",
        };
        f.write_str(value)
    }
}

impl FromStr for Orientation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Orientation::All),
            "x" => Ok(Orientation::X),
            "y" => Ok(Orientation::Y),
            "z" => Ok(Orientation::Z),
            other => Err(Error::invalid(
                "orientation",
                format!("expected one of all, x, y, z; got '{other}'"),
            )),
        }
    }
}

/// Hexagonal packing of one layer extruded along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerPacking {
    pub count: u64,
    pub layers: u64,
    pub circles_per_layer: u64,
}

/// Packing outcome for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingResult {
    /// Reported count, capped at `max_count` when a cap is set.
    pub count: u64,
    /// Count before the cap was applied.
    pub uncapped_count: u64,
    pub orientation: Axis,
    pub layers_along_axis: u64,
    pub circles_per_layer: u64,
}

impl PackingResult {
    /// Whether the true count exceeds a non-zero `max_count`.
    pub fn exceeds(&self, max_count: u64) -> bool {
        max_count > 0 && self.uncapped_count > max_count
    }
}

/// Pack circles of `diameter_mm` into a `plane_width` x `plane_height` rectangle
/// and repeat the layer along `axis_length`.
///
/// Even rows (0-based) hold `floor((W - d) / d) + 1` circles, odd rows are
/// offset by `d / 2` and hold `floor((W - d/2) / d)`. Rows are `d * sqrt(3)/2`
/// apart. Any non-positive input, or an axis shorter than one cylinder, yields
/// an empty packing.
pub fn pack_layer(
    diameter_mm: f64,
    cylinder_length_mm: f64,
    plane_width_mm: f64,
    plane_height_mm: f64,
    axis_length_mm: f64,
) -> LayerPacking {
    let empty = LayerPacking::default();
    if diameter_mm <= 0.0 || cylinder_length_mm <= 0.0 {
        return empty;
    }
    if plane_width_mm <= 0.0 || plane_height_mm <= 0.0 || axis_length_mm <= 0.0 {
        return empty;
    }

    let d = diameter_mm;
    let layers = (axis_length_mm / cylinder_length_mm).floor();
    if layers < 1.0 {
        return empty;
    }

    let even_row = ((plane_width_mm - d) / d).floor() + 1.0;
    if even_row <= 0.0 {
        return empty;
    }
    let odd_row = ((plane_width_mm - d / 2.0) / d).floor().max(0.0);

    let rows = 1.0 + ((plane_height_mm - d) / (d * HEX_ROW_SPACING)).floor();
    if rows <= 0.0 {
        return empty;
    }

    // Float-to-int casts saturate; the products saturate at u64::MAX too.
    let rows = rows as u64;
    let even_rows = rows.div_ceil(2);
    let odd_rows = rows / 2;
    let circles_per_layer = even_rows
        .saturating_mul(even_row as u64)
        .saturating_add(odd_rows.saturating_mul(odd_row as u64));
    let layers = layers as u64;

    LayerPacking {
        count: circles_per_layer.saturating_mul(layers),
        layers,
        circles_per_layer,
    }
}

/// Pack cylinders into the box along a single axis.
///
/// The packing diameter is `diameter_mm + 2 * padding_mm`; padding only spaces
/// the cylinders apart and does not change their physical size.
#[allow(clippy::too_many_arguments)]
pub fn calculate_hex_packing_for_axis(
    diameter_mm: f64,
    length_mm: f64,
    box_width_mm: f64,
    box_height_mm: f64,
    box_depth_mm: f64,
    axis: Axis,
    max_count: u64,
    padding_mm: f64,
) -> PackingResult {
    let packing_diameter = diameter_mm + 2.0 * padding_mm;
    let (plane_width, plane_height, axis_length) =
        axis.project(box_width_mm, box_height_mm, box_depth_mm);
    let layer = pack_layer(
        packing_diameter,
        length_mm,
        plane_width,
        plane_height,
        axis_length,
    );

    let count = if max_count > 0 {
        layer.count.min(max_count)
    } else {
        layer.count
    };

    PackingResult {
        count,
        uncapped_count: layer.count,
        orientation: axis,
        layers_along_axis: layer.layers,
        circles_per_layer: layer.circles_per_layer,
    }
}

/// Pack cylinders into the box for every axis the orientation asks for.
///
/// Returns one result per axis, in x, y, z order.
#[allow(clippy::too_many_arguments)]
pub fn calculate_hex_packing(
    diameter_mm: f64,
    length_mm: f64,
    box_width_mm: f64,
    box_height_mm: f64,
    box_depth_mm: f64,
    orientation: Orientation,
    max_count: u64,
    padding_mm: f64,
) -> Vec<PackingResult> {
    orientation
        .axes()
        .iter()
        .map(|&axis| {
            calculate_hex_packing_for_axis(
                diameter_mm,
                length_mm,
                box_width_mm,
                box_height_mm,
                box_depth_mm,
                axis,
                max_count,
                padding_mm,
            )
        })
        .collect()
}
