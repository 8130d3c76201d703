//! Project files: the optimization inputs and last results, stored as JSON.
//!
//! The layout matches the desktop application's `.buoy.json` files so either
//! tool can open the other's projects.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::failure::{analyze_failure, CylinderGeometry, FailureReport};
use crate::material::{Material, MaterialCatalog};
use crate::optimizer::{
    BoxDimensions, GridRange, MaterialSelection, OptimizationParams, OptimizationResult,
};
use crate::thickness::EndcapConstraint;
use crate::units::{depth_to_pressure, DEFAULT_WATER_DENSITY};

/// Schema version written by this build.
pub const PROJECT_VERSION: u32 = 2;

/// Name used when neither the file name nor the file provides one.
pub const DEFAULT_PROJECT_NAME: &str = "Untitled";

const PROJECT_EXTENSIONS: &[&str] = &[".buoy.json", ".tube", ".json"];

/// Everything needed to rerun an optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub depth_m: f64,
    pub pressure_mpa: f64,
    /// Use `pressure_mpa` as given instead of deriving it from depth.
    pub use_direct_pressure: bool,
    pub water_density: f64,
    pub safety_factor: f64,
    pub min_diameter_mm: f64,
    pub max_diameter_mm: f64,
    pub min_length_mm: f64,
    pub max_length_mm: f64,
    pub diameter_step_mm: f64,
    pub length_step_mm: f64,
    /// Catalog key, or `"ALL"` to compare `selected_materials`.
    pub selected_material: String,
    /// Keys compared in `"ALL"` mode; empty compares the whole catalog.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_materials: Vec<String>,
    pub custom_material: Option<Material>,
    #[serde(rename = "box")]
    pub box_dimensions: BoxDimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_wall_thickness_mm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_endcap_thickness_mm: Option<f64>,
    pub endcap_constraint: EndcapConstraint,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            depth_m: 30.0,
            pressure_mpa: 0.3,
            use_direct_pressure: false,
            water_density: DEFAULT_WATER_DENSITY,
            safety_factor: 2.5,
            min_diameter_mm: 50.0,
            max_diameter_mm: 150.0,
            min_length_mm: 100.0,
            max_length_mm: 500.0,
            diameter_step_mm: 5.0,
            length_step_mm: 10.0,
            selected_material: "ABS".to_string(),
            selected_materials: Vec::new(),
            custom_material: None,
            box_dimensions: BoxDimensions::default(),
            forced_wall_thickness_mm: None,
            forced_endcap_thickness_mm: None,
            endcap_constraint: EndcapConstraint::Fixed,
        }
    }
}

impl ProjectConfig {
    /// Operating pressure in MPa.
    pub fn operating_pressure(&self) -> f64 {
        if self.use_direct_pressure {
            self.pressure_mpa
        } else {
            depth_to_pressure(self.depth_m, self.water_density)
        }
    }

    /// Build run parameters. A custom material replaces the catalog entry
    /// unless comparison mode is selected.
    pub fn to_params(&self) -> OptimizationParams {
        let material = match (
            MaterialSelection::from_key(&self.selected_material, &self.selected_materials),
            &self.custom_material,
        ) {
            (MaterialSelection::Single { key, .. }, Some(custom)) => {
                MaterialSelection::custom(key, custom.clone())
            }
            (selection, _) => selection,
        };

        OptimizationParams {
            pressure_mpa: self.operating_pressure(),
            material,
            safety_factor: self.safety_factor,
            diameter: GridRange::new(
                self.min_diameter_mm,
                self.max_diameter_mm,
                self.diameter_step_mm,
            ),
            length: GridRange::new(self.min_length_mm, self.max_length_mm, self.length_step_mm),
            water_density: self.water_density,
            box_dimensions: self.box_dimensions.clone(),
            forced_wall_thickness_mm: self.forced_wall_thickness_mm,
            forced_endcap_thickness_mm: self.forced_endcap_thickness_mm,
            endcap_constraint: self.endcap_constraint,
        }
    }
}

/// A project as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProject {
    pub version: u32,
    pub name: String,
    pub config: ProjectConfig,
    pub results: Vec<OptimizationResult>,
    pub selected_result_index: Option<usize>,
}

impl SavedProject {
    /// A current-version project selecting the top result, if any.
    pub fn new(
        name: impl Into<String>,
        config: ProjectConfig,
        results: Vec<OptimizationResult>,
    ) -> Self {
        let selected_result_index = if results.is_empty() { None } else { Some(0) };
        Self {
            version: PROJECT_VERSION,
            name: name.into(),
            config,
            results,
            selected_result_index,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredProject {
    #[serde(default = "first_version")]
    version: u32,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    config: ProjectConfig,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    selected_result_index: Option<usize>,
}

fn first_version() -> u32 {
    1
}

/// Read a project file.
///
/// The project is named after the file, minus its project extension. Fields
/// missing from the config take their defaults. Results saved before failure
/// analysis existed get it recomputed from their geometry and the config;
/// records that still do not parse are dropped.
pub fn load_project(path: &Path) -> Result<SavedProject> {
    let data = fs::read_to_string(path)?;
    let stored: StoredProject = serde_json::from_str(&data)?;

    if stored.version > PROJECT_VERSION {
        return Err(Error::UnsupportedProjectVersion {
            version: stored.version,
        });
    }
    if stored.version < PROJECT_VERSION {
        warn!(
            path = %path.display(),
            version = stored.version,
            current = PROJECT_VERSION,
            "upgrading project file from older version"
        );
    }

    let stored_count = stored.results.len();
    let mut kept = Vec::with_capacity(stored_count);
    let mut results = Vec::with_capacity(stored_count);
    for (index, value) in stored.results.into_iter().enumerate() {
        if let Some(result) = read_stored_result(value, &stored.config) {
            kept.push(index);
            results.push(result);
        }
    }
    if results.len() < stored_count {
        warn!(
            path = %path.display(),
            dropped = stored_count - results.len(),
            "dropped stored results that could not be read"
        );
    }

    // Follow the selected record to its new position; if it was dropped,
    // select the top result instead.
    let selected_result_index = stored
        .selected_result_index
        .and_then(|stored_index| kept.iter().position(|&index| index == stored_index))
        .or(if results.is_empty() { None } else { Some(0) });

    let name = project_name_from_path(path)
        .or(stored.name)
        .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());

    debug!(path = %path.display(), results = results.len(), "loaded project");

    Ok(SavedProject {
        version: PROJECT_VERSION,
        name,
        config: stored.config,
        results,
        selected_result_index,
    })
}

/// Geometry of a stored result, enough to redo its failure analysis.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGeometry {
    material_key: String,
    diameter_mm: f64,
    length_mm: f64,
    wall_thickness_mm: f64,
    endcap_thickness_mm: f64,
}

fn read_stored_result(value: Value, config: &ProjectConfig) -> Option<OptimizationResult> {
    match value {
        Value::Object(mut fields) if !fields.contains_key("failureMode") => {
            let geometry: StoredGeometry =
                serde_json::from_value(Value::Object(fields.clone())).ok()?;
            let report = legacy_failure_report(&geometry, config)?;
            if let Value::Object(failure) = serde_json::to_value(report).ok()? {
                fields.extend(failure);
            }
            serde_json::from_value(Value::Object(fields)).ok()
        }
        value => serde_json::from_value(value).ok(),
    }
}

/// Failure analysis for a result stored without one, using the project's
/// material, endcap support and operating point.
fn legacy_failure_report(
    geometry: &StoredGeometry,
    config: &ProjectConfig,
) -> Option<FailureReport> {
    let custom = config
        .custom_material
        .as_ref()
        .filter(|_| geometry.material_key.eq_ignore_ascii_case(config.selected_material.trim()));
    let material = match custom {
        Some(material) => material,
        None => MaterialCatalog::builtin().get(&geometry.material_key)?,
    };
    let cylinder = CylinderGeometry {
        outer_diameter_mm: geometry.diameter_mm,
        length_mm: geometry.length_mm,
        wall_thickness_mm: geometry.wall_thickness_mm,
        endcap_thickness_mm: geometry.endcap_thickness_mm,
    };
    if cylinder.inner_diameter_mm() <= 0.0 {
        return None;
    }
    Some(analyze_failure(
        &cylinder,
        material,
        config.endcap_constraint,
        config.operating_pressure(),
        config.water_density,
    ))
}

/// Write a project file as pretty-printed JSON.
pub fn save_project(path: &Path, project: &SavedProject) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = BufWriter::new(fs::File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, project)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    debug!(path = %path.display(), results = project.results.len(), "saved project");
    Ok(())
}

/// File name without its project extension, e.g. `float.buoy.json` -> `float`.
pub fn project_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let lower = file_name.to_ascii_lowercase();
    let stem = PROJECT_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &file_name[..file_name.len() - ext.len()])
        .unwrap_or(file_name);
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn strips_project_extensions() {
        let name = |p: &str| project_name_from_path(&PathBuf::from(p));
        assert_eq!(name("/tmp/float.buoy.json").as_deref(), Some("float"));
        assert_eq!(name("legacy.TUBE").as_deref(), Some("legacy"));
        assert_eq!(name("plain.json").as_deref(), Some("plain"));
        assert_eq!(name("notes.txt").as_deref(), Some("notes.txt"));
        assert_eq!(name(".json"), None);
    }

    #[test]
    fn depth_drives_pressure_unless_direct() {
        let mut config = ProjectConfig::default();
        assert!((config.operating_pressure() - 0.3016575).abs() < 1e-9);
        config.use_direct_pressure = true;
        assert_eq!(config.operating_pressure(), 0.3);
    }

    #[test]
    fn custom_material_replaces_catalog_entry() {
        let config = ProjectConfig {
            selected_material: "MyResin".into(),
            custom_material: Some(Material::new("My Resin", 1100.0, 45.0, 2500.0, 0.35, 3.0)),
            ..ProjectConfig::default()
        };
        match config.to_params().material {
            MaterialSelection::Single {
                key,
                material: Some(material),
            } => {
                assert_eq!(key, "MyResin");
                assert_eq!(material.name, "My Resin");
            }
            other => panic!("unexpected selection: {other:?}"),
        }
    }

    #[test]
    fn all_key_ignores_custom_material() {
        let config = ProjectConfig {
            selected_material: "ALL".into(),
            selected_materials: vec!["ABS".into(), "PETG".into()],
            custom_material: Some(Material::new("X", 1100.0, 45.0, 2500.0, 0.35, 3.0)),
            ..ProjectConfig::default()
        };
        assert!(config.to_params().material.is_compare());
    }

    #[test]
    fn missing_config_fields_take_defaults() {
        let config: ProjectConfig =
            serde_json::from_str(r#"{"depthM": 100, "box": {"enabled": true}}"#).expect("parse");
        assert_eq!(config.depth_m, 100.0);
        assert_eq!(config.safety_factor, 2.5);
        assert!(config.box_dimensions.enabled);
        assert_eq!(config.box_dimensions.width_mm, 100.0);
    }
}
