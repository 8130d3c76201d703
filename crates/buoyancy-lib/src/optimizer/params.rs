use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::material::{Material, MaterialCatalog};
use crate::packing::Orientation;
use crate::thickness::EndcapConstraint;

use super::grid::GridRange;

/// Material key that selects comparison mode.
pub const COMPARE_ALL_KEY: &str = "ALL";

/// Which materials a run evaluates.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialSelection {
    /// One material. `material` overrides the catalog record when present,
    /// which is how custom materials enter a run.
    Single {
        key: String,
        material: Option<Material>,
    },
    /// Every listed key, in order; an empty list means the whole catalog.
    Compare { keys: Vec<String> },
}

impl MaterialSelection {
    /// Select a catalog material by key.
    pub fn key(key: impl Into<String>) -> Self {
        MaterialSelection::Single {
            key: key.into(),
            material: None,
        }
    }

    /// Select a caller-supplied material record.
    pub fn custom(key: impl Into<String>, material: Material) -> Self {
        MaterialSelection::Single {
            key: key.into(),
            material: Some(material),
        }
    }

    /// Interpret a stored key, treating [`COMPARE_ALL_KEY`] as comparison mode.
    pub fn from_key(key: &str, compare_keys: &[String]) -> Self {
        if key.trim().eq_ignore_ascii_case(COMPARE_ALL_KEY) {
            MaterialSelection::Compare {
                keys: compare_keys.to_vec(),
            }
        } else {
            MaterialSelection::key(key.trim())
        }
    }

    pub fn is_compare(&self) -> bool {
        matches!(self, MaterialSelection::Compare { .. })
    }
}

/// A material resolved for a run, with its position in the active set.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMaterial {
    pub key: String,
    pub material: Material,
}

/// Box envelope used to pack candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxDimensions {
    pub width_mm: f64,
    pub height_mm: f64,
    pub depth_mm: f64,
    pub enabled: bool,
    /// `0` means unlimited.
    pub max_count: u64,
    pub orientation: Orientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_diameter_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_length_mm: Option<f64>,
    /// Radial gap added around each cylinder for packing only.
    pub padding_mm: f64,
}

impl Default for BoxDimensions {
    fn default() -> Self {
        Self {
            width_mm: 100.0,
            height_mm: 100.0,
            depth_mm: 100.0,
            enabled: false,
            max_count: 0,
            orientation: Orientation::All,
            forced_diameter_mm: None,
            forced_length_mm: None,
            padding_mm: 0.0,
        }
    }
}

impl BoxDimensions {
    /// An enabled box of the given size with default packing options.
    pub fn enabled(width_mm: f64, height_mm: f64, depth_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
            depth_mm,
            enabled: true,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("box forced diameter", self.forced_diameter_mm),
            ("box forced length", self.forced_length_mm),
        ] {
            if let Some(value) = value {
                require_positive(field, value)?;
            }
        }
        if !self.enabled {
            return Ok(());
        }
        require_positive("box width", self.width_mm)?;
        require_positive("box height", self.height_mm)?;
        require_positive("box depth", self.depth_mm)?;
        if !self.padding_mm.is_finite() || self.padding_mm < 0.0 {
            return Err(Error::invalid(
                "box padding",
                format!("must be zero or positive, got {}", self.padding_mm),
            ));
        }
        Ok(())
    }
}

/// Input bundle for one optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationParams {
    /// Operating pressure in MPa.
    pub pressure_mpa: f64,
    pub material: MaterialSelection,
    /// Divides yield strength; at least 1.
    pub safety_factor: f64,
    pub diameter: GridRange,
    pub length: GridRange,
    /// kg/m³
    pub water_density: f64,
    pub box_dimensions: BoxDimensions,
    pub forced_wall_thickness_mm: Option<f64>,
    pub forced_endcap_thickness_mm: Option<f64>,
    pub endcap_constraint: EndcapConstraint,
}

impl Default for OptimizationParams {
    fn default() -> Self {
        Self {
            pressure_mpa: 0.3,
            material: MaterialSelection::key("ABS"),
            safety_factor: 2.5,
            diameter: GridRange::new(50.0, 150.0, 5.0),
            length: GridRange::new(100.0, 500.0, 10.0),
            water_density: crate::units::DEFAULT_WATER_DENSITY,
            box_dimensions: BoxDimensions::default(),
            forced_wall_thickness_mm: None,
            forced_endcap_thickness_mm: None,
            endcap_constraint: EndcapConstraint::Fixed,
        }
    }
}

impl OptimizationParams {
    /// Whether results carry packing fields and rank by total buoyancy.
    pub fn packing_enabled(&self) -> bool {
        self.box_dimensions.enabled
    }

    /// Diameter samples, collapsed to the box's forced diameter when set.
    pub fn diameter_range(&self) -> GridRange {
        self.box_dimensions
            .forced_diameter_mm
            .map(GridRange::fixed)
            .unwrap_or(self.diameter)
    }

    /// Length samples, collapsed to the box's forced length when set.
    pub fn length_range(&self) -> GridRange {
        self.box_dimensions
            .forced_length_mm
            .map(GridRange::fixed)
            .unwrap_or(self.length)
    }

    /// Check every numeric precondition before any candidate is evaluated.
    pub fn validate(&self) -> Result<()> {
        if !self.pressure_mpa.is_finite() || self.pressure_mpa < 0.0 {
            return Err(Error::invalid(
                "pressure",
                format!("must be zero or positive, got {}", self.pressure_mpa),
            ));
        }
        if !self.safety_factor.is_finite() || self.safety_factor < 1.0 {
            return Err(Error::invalid(
                "safety factor",
                format!("must be at least 1, got {}", self.safety_factor),
            ));
        }
        require_positive("water density", self.water_density)?;
        self.diameter.validate("diameter")?;
        self.length.validate("length")?;
        if let Some(wall) = self.forced_wall_thickness_mm {
            require_positive("forced wall thickness", wall)?;
        }
        if let Some(endcap) = self.forced_endcap_thickness_mm {
            require_positive("forced endcap thickness", endcap)?;
        }
        self.box_dimensions.validate()
    }

    /// Resolve the active material set against `catalog`.
    ///
    /// Comparison keys keep their given order; repeated keys are evaluated once.
    /// Unknown keys fail with suggestions.
    pub fn resolve_materials(&self, catalog: &MaterialCatalog) -> Result<Vec<ResolvedMaterial>> {
        match &self.material {
            MaterialSelection::Single {
                key,
                material: Some(material),
            } => {
                material.validate()?;
                Ok(vec![ResolvedMaterial {
                    key: key.clone(),
                    material: material.clone(),
                }])
            }
            MaterialSelection::Single {
                key,
                material: None,
            } => Ok(vec![resolve_key(catalog, key)?]),
            MaterialSelection::Compare { keys } => {
                let requested: Vec<&str> = if keys.is_empty() {
                    catalog.keys().collect()
                } else {
                    keys.iter().map(String::as_str).collect()
                };

                let mut resolved: Vec<ResolvedMaterial> = Vec::with_capacity(requested.len());
                for key in requested {
                    let entry = resolve_key(catalog, key)?;
                    if !resolved.iter().any(|r| r.key == entry.key) {
                        resolved.push(entry);
                    }
                }
                if resolved.is_empty() {
                    return Err(Error::EmptyMaterialSelection);
                }
                Ok(resolved)
            }
        }
    }
}

fn resolve_key(catalog: &MaterialCatalog, key: &str) -> Result<ResolvedMaterial> {
    let material = catalog.resolve(key)?.clone();
    let key = catalog.canonical_key(key).unwrap_or(key).to_string();
    Ok(ResolvedMaterial { key, material })
}

fn require_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("must be a positive number, got {value}"),
        ))
    }
}
