//! Material physical properties.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Physical properties of a wall material.
///
/// Field names serialize in camelCase so material records embedded in
/// project files stay interchangeable with the desktop application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Display name.
    pub name: String,
    /// Density in kg/m³.
    pub density: f64,
    /// Yield strength in MPa.
    pub yield_strength: f64,
    /// Young's modulus in MPa.
    pub elastic_modulus: f64,
    /// Poisson's ratio (dimensionless).
    pub poissons_ratio: f64,
    /// Recommended safety factor for this material.
    pub safety_factor: f64,
}

impl Material {
    /// Create a material record. Call [`Material::validate`] before use in a run.
    pub fn new(
        name: impl Into<String>,
        density: f64,
        yield_strength: f64,
        elastic_modulus: f64,
        poissons_ratio: f64,
        safety_factor: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density,
            yield_strength,
            elastic_modulus,
            poissons_ratio,
            safety_factor,
        }
    }

    /// Validate material properties for correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MaterialValidation {
                message: "material name must not be empty".to_string(),
            });
        }

        let fields = [
            (self.density, "density"),
            (self.yield_strength, "yield_strength"),
            (self.elastic_modulus, "elastic_modulus"),
            (self.poissons_ratio, "poissons_ratio"),
            (self.safety_factor, "safety_factor"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::MaterialValidation {
                    message: format!("{field} of '{}' must be a finite positive number", self.name),
                });
            }
        }

        if self.poissons_ratio >= 0.5 {
            return Err(Error::MaterialValidation {
                message: format!(
                    "poissons_ratio of '{}' must be below 0.5, got {}",
                    self.name, self.poissons_ratio
                ),
            });
        }

        Ok(())
    }

    /// Allowable design stress (MPa) for the given safety factor.
    pub fn allowable_stress(&self, safety_factor: f64) -> f64 {
        self.yield_strength / safety_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abs() -> Material {
        Material::new("ABS", 1050.0, 40.0, 2300.0, 0.35, 3.0)
    }

    #[test]
    fn accepts_valid_material() {
        abs().validate().expect("ABS is valid");
    }

    #[test]
    fn rejects_incompressible_poisson_ratio() {
        let mut material = abs();
        material.poissons_ratio = 0.5;
        let err = material.validate().expect_err("nu = 0.5 is out of range");
        assert!(err.to_string().contains("poissons_ratio"));
    }

    #[test]
    fn rejects_non_finite_density() {
        let mut material = abs();
        material.density = f64::NAN;
        let err = material.validate().expect_err("NaN density");
        assert!(err.to_string().contains("density"));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(abs()).expect("serialize");
        assert_eq!(json["yieldStrength"], 40.0);
        assert_eq!(json["poissonsRatio"], 0.35);
    }
}
