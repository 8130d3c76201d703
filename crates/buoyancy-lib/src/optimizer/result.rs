use serde::{Deserialize, Serialize};

use crate::buoyancy::BuoyancyReport;
use crate::failure::FailureReport;
use crate::packing::Axis;
use crate::thickness::WallMethod;

/// Upper bound on the number of results a run returns.
pub const MAX_RESULTS: usize = 1000;

/// Full evaluation of one feasible cylinder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CylinderResult {
    /// 1-based position after sorting.
    pub rank: usize,
    pub material_key: String,
    pub material_name: String,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub wall_thickness_mm: f64,
    pub endcap_thickness_mm: f64,
    pub wall_method: WallMethod,
    pub inner_diameter_mm: f64,
    /// Cavity length between the endcaps.
    pub inner_length_mm: f64,
    #[serde(flatten)]
    pub buoyancy: BuoyancyReport,
    #[serde(flatten)]
    pub failure: FailureReport,
}

/// A cylinder together with how many of it fit the box along one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedCylinderResult {
    #[serde(flatten)]
    pub cylinder: CylinderResult,
    #[serde(rename = "packingCount")]
    pub count: u64,
    #[serde(rename = "packingOrientation")]
    pub orientation: Axis,
    #[serde(rename = "packingLayers")]
    pub layers: u64,
    #[serde(rename = "packingCirclesPerLayer")]
    pub circles_per_layer: u64,
    /// Net buoyancy of one cylinder times `count`.
    pub total_buoyancy_kg: f64,
    /// Mass of one cylinder times `count`.
    pub total_mass_kg: f64,
}

/// One entry of the ranked result list.
///
/// Packed results only appear when box packing was requested, and then every
/// entry of the list is packed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptimizationResult {
    Packed(PackedCylinderResult),
    Single(CylinderResult),
}

impl OptimizationResult {
    pub fn cylinder(&self) -> &CylinderResult {
        match self {
            OptimizationResult::Packed(packed) => &packed.cylinder,
            OptimizationResult::Single(cylinder) => cylinder,
        }
    }

    pub fn packing(&self) -> Option<&PackedCylinderResult> {
        match self {
            OptimizationResult::Packed(packed) => Some(packed),
            OptimizationResult::Single(_) => None,
        }
    }

    pub fn rank(&self) -> usize {
        self.cylinder().rank
    }

    /// Total packed buoyancy for packed results, net buoyancy otherwise.
    pub fn ranking_key(&self) -> f64 {
        match self {
            OptimizationResult::Packed(packed) => packed.total_buoyancy_kg,
            OptimizationResult::Single(cylinder) => cylinder.buoyancy.net_buoyancy_kg,
        }
    }

    pub(crate) fn set_rank(&mut self, rank: usize) {
        match self {
            OptimizationResult::Packed(packed) => packed.cylinder.rank = rank,
            OptimizationResult::Single(cylinder) => cylinder.rank = rank,
        }
    }
}

impl From<CylinderResult> for OptimizationResult {
    fn from(cylinder: CylinderResult) -> Self {
        OptimizationResult::Single(cylinder)
    }
}

impl From<PackedCylinderResult> for OptimizationResult {
    fn from(packed: PackedCylinderResult) -> Self {
        OptimizationResult::Packed(packed)
    }
}
