//! Material catalog: the built-in table plus CSV-loaded custom materials.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

use super::properties::Material;

/// Category assigned to materials loaded from CSV.
pub const CUSTOM_CATEGORY: &str = "Custom";

// (key, display name, density kg/m³, yield MPa, modulus MPa, poisson, safety factor)
type BuiltinRow = (&'static str, &'static str, f64, f64, f64, f64, f64);

const ALUMINUM: &[BuiltinRow] = &[
    ("Al 6061-T6", "Aluminum 6061-T6", 2700.0, 276.0, 68900.0, 0.33, 2.0),
    ("Al 7075-T6", "Aluminum 7075-T6 (Aerospace)", 2810.0, 503.0, 71700.0, 0.33, 2.0),
    ("Al 5052-H32", "Aluminum 5052-H32 (Marine)", 2680.0, 193.0, 70300.0, 0.33, 2.0),
    ("Al 2024-T3", "Aluminum 2024-T3 (Aerospace)", 2780.0, 345.0, 73100.0, 0.33, 2.0),
];

const STAINLESS: &[BuiltinRow] = &[
    ("SS 304", "Stainless Steel 304", 8000.0, 215.0, 193000.0, 0.29, 2.0),
    ("SS 316", "Stainless Steel 316 (Marine)", 8000.0, 290.0, 193000.0, 0.29, 2.0),
    ("SS 17-4 PH", "Stainless Steel 17-4 PH", 7750.0, 1170.0, 197000.0, 0.27, 2.0),
    ("SS 303", "Stainless Steel 303 (Free Machining)", 8000.0, 240.0, 193000.0, 0.29, 2.0),
];

const UNFILLED: &[BuiltinRow] = &[
    ("ABS", "ABS", 1050.0, 40.0, 2300.0, 0.35, 3.0),
    ("ASA", "ASA (UV Resistant)", 1070.0, 45.0, 2400.0, 0.35, 3.0),
    ("PC", "Polycarbonate", 1200.0, 62.0, 2400.0, 0.37, 2.5),
    ("PETG", "PETG", 1270.0, 50.0, 2100.0, 0.38, 3.0),
    ("PLA", "PLA", 1240.0, 60.0, 3500.0, 0.36, 3.0),
    ("POM", "POM / Delrin / Acetal", 1410.0, 65.0, 2900.0, 0.35, 2.5),
    ("PP", "Polypropylene", 905.0, 32.0, 1500.0, 0.42, 3.0),
    ("HDPE", "HDPE (High Density PE)", 950.0, 26.0, 1100.0, 0.42, 3.0),
    ("UHMWPE", "UHMWPE", 930.0, 22.0, 800.0, 0.46, 3.0),
    ("PEEK", "PEEK", 1300.0, 100.0, 3600.0, 0.38, 2.0),
    ("PA6", "Nylon PA6", 1140.0, 75.0, 2800.0, 0.40, 2.5),
    ("PA66", "Nylon PA66", 1140.0, 82.0, 3000.0, 0.40, 2.5),
    ("PA12", "Nylon PA12", 1020.0, 50.0, 1600.0, 0.40, 2.5),
];

const GLASS_FILLED: &[BuiltinRow] = &[
    ("ABS-GF30", "ABS + 30% Glass Fiber", 1350.0, 90.0, 7500.0, 0.35, 2.5),
    ("PA6-GF30", "Nylon PA6 + 30% Glass Fiber", 1350.0, 185.0, 9500.0, 0.38, 2.0),
    ("PA66-GF30", "Nylon PA66 + 30% Glass Fiber", 1370.0, 195.0, 10000.0, 0.38, 2.0),
    ("PC-GF30", "Polycarbonate + 30% Glass Fiber", 1430.0, 110.0, 7000.0, 0.36, 2.0),
    ("PBT-GF30", "PBT + 30% Glass Fiber", 1520.0, 130.0, 9500.0, 0.38, 2.0),
    ("PP-GF30", "Polypropylene + 30% Glass Fiber", 1130.0, 70.0, 5500.0, 0.40, 2.5),
    ("PEEK-GF30", "PEEK + 30% Glass Fiber", 1510.0, 160.0, 11000.0, 0.38, 2.0),
];

const CARBON_FILLED: &[BuiltinRow] = &[
    ("ABS-CF20", "ABS + 20% Carbon Fiber", 1150.0, 75.0, 12000.0, 0.35, 2.5),
    ("PA6-CF20", "Nylon PA6 + 20% Carbon Fiber", 1200.0, 170.0, 17000.0, 0.38, 2.0),
    ("PA12-CF", "Nylon PA12 + Carbon Fiber", 1100.0, 85.0, 8500.0, 0.38, 2.0),
    ("PC-CF20", "Polycarbonate + 20% Carbon Fiber", 1280.0, 100.0, 14000.0, 0.36, 2.0),
    ("PEEK-CF30", "PEEK + 30% Carbon Fiber", 1400.0, 230.0, 24000.0, 0.38, 2.0),
];

const BUILTIN_CATEGORIES: &[(&str, &[BuiltinRow])] = &[
    ("Aluminum", ALUMINUM),
    ("Stainless Steel", STAINLESS),
    ("Unfilled Plastics", UNFILLED),
    ("Glass Filled", GLASS_FILLED),
    ("Carbon Filled", CARBON_FILLED),
];

static BUILTIN: Lazy<MaterialCatalog> = Lazy::new(|| {
    let mut catalog = MaterialCatalog::default();
    for (category, rows) in BUILTIN_CATEGORIES {
        for &(key, name, density, yield_strength, modulus, nu, sf) in rows.iter() {
            let material = Material::new(name, density, yield_strength, modulus, nu, sf);
            catalog.push(key.to_string(), material, category);
        }
    }
    catalog
});

/// One catalog entry: the lookup key and its material record.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub key: String,
    pub material: Material,
}

/// Keyed, ordered table of materials with a category grouping for presentation.
///
/// Keys keep insertion order; lookups are case-insensitive.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
    categories: Vec<(String, Vec<String>)>,
    source: Option<PathBuf>,
}

impl MaterialCatalog {
    /// The process-wide built-in catalog.
    pub fn builtin() -> &'static MaterialCatalog {
        &BUILTIN
    }

    /// Load custom materials from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load custom materials from a CSV reader.
    ///
    /// Expected columns (header synonyms tolerated): `key`, `name`, `density`,
    /// `yield_strength`, `elastic_modulus`, `poissons_ratio`, `safety_factor`.
    /// A missing `name` column falls back to the key.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::MaterialValidation {
                message: format!("failed to read material CSV headers: {err}"),
            })?
            .clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        };
        let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("key", &["key", "id", "material", "materialkey"]),
            ("name", &["name", "displayname", "materialname"]),
            ("density", &["density", "densitykgm3", "rho"]),
            (
                "yield_strength",
                &["yield_strength", "yieldstrength", "yieldmpa", "yield"],
            ),
            (
                "elastic_modulus",
                &["elastic_modulus", "elasticmodulus", "modulus", "modulusmpa", "e"],
            ),
            (
                "poissons_ratio",
                &["poissons_ratio", "poissonsratio", "poisson", "nu"],
            ),
            (
                "safety_factor",
                &["safety_factor", "safetyfactor", "sf"],
            ),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            if let Some(i) = alts
                .iter()
                .find_map(|alt| normalized_headers.iter().position(|h| *h == normalize(*alt)))
            {
                index_map.insert(*canon, i);
            }
        }

        let missing: Vec<&str> = [
            "key",
            "density",
            "yield_strength",
            "elastic_modulus",
            "poissons_ratio",
            "safety_factor",
        ]
        .into_iter()
        .filter(|c| !index_map.contains_key(c))
        .collect();

        if !missing.is_empty() {
            return Err(Error::MaterialValidation {
                message: format!(
                    "material CSV missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut catalog = Self::default();
        for (offset, record) in csv_reader.records().enumerate() {
            let record = record?;
            let row = offset + 2;

            let get = |field: &str| -> Option<&str> {
                index_map.get(field).and_then(|&i| record.get(i))
            };
            let key = get("key").unwrap_or_default().to_string();
            if key.is_empty() {
                return Err(Error::MaterialValidation {
                    message: format!("missing material key at row {row}"),
                });
            }
            let number = |field: &str| -> Result<f64> {
                get(field)
                    .unwrap_or_default()
                    .parse::<f64>()
                    .map_err(|e| Error::MaterialValidation {
                        message: format!("invalid {field} for material '{key}' at row {row}: {e}"),
                    })
            };

            let name = get("name")
                .filter(|n| !n.is_empty())
                .unwrap_or(key.as_str())
                .to_string();
            let material = Material::new(
                name,
                number("density")?,
                number("yield_strength")?,
                number("elastic_modulus")?,
                number("poissons_ratio")?,
                number("safety_factor")?,
            );
            material.validate()?;

            if catalog.get(&key).is_some() {
                return Err(Error::DuplicateMaterial {
                    key: normalize_key(&key),
                });
            }
            catalog.push(key, material, CUSTOM_CATEGORY);
        }

        Ok(catalog)
    }

    /// Append every entry of `other`, rejecting keys that already exist.
    pub fn extend_from(&mut self, other: &MaterialCatalog) -> Result<()> {
        for entry in &other.entries {
            if self.get(&entry.key).is_some() {
                return Err(Error::DuplicateMaterial {
                    key: normalize_key(&entry.key),
                });
            }
        }
        for (category, keys) in &other.categories {
            for key in keys {
                if let Some(material) = other.get(key) {
                    self.push(key.clone(), material.clone(), category);
                }
            }
        }
        Ok(())
    }

    /// Look up a material by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&Material> {
        self.index
            .get(&normalize_key(key))
            .map(|&i| &self.entries[i].material)
    }

    /// Look up a material by key, reporting close matches when it is missing.
    pub fn resolve(&self, key: &str) -> Result<&Material> {
        self.get(key).ok_or_else(|| Error::UnknownMaterial {
            key: key.to_string(),
            suggestions: self.fuzzy_matches(key, 3),
        })
    }

    /// Canonical spelling of a key as stored in the catalog.
    pub fn canonical_key(&self, key: &str) -> Option<&str> {
        self.index
            .get(&normalize_key(key))
            .map(|&i| self.entries[i].key.as_str())
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Category name to keys, in display order.
    pub fn categories(&self) -> &[(String, Vec<String>)] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    fn push(&mut self, key: String, material: Material, category: &str) {
        self.index.insert(normalize_key(&key), self.entries.len());
        match self.categories.iter_mut().find(|(name, _)| name == category) {
            Some((_, keys)) => keys.push(key.clone()),
            None => self
                .categories
                .push((category.to_string(), vec![key.clone()])),
        }
        self.entries.push(CatalogEntry { key, material });
    }

    fn fuzzy_matches(&self, key: &str, limit: usize) -> Vec<String> {
        let needle = normalize_key(key);
        let mut scored: Vec<(f64, &str)> = self
            .entries
            .iter()
            .map(|e| {
                (
                    strsim::normalized_levenshtein(&needle, &normalize_key(&e.key)),
                    e.key.as_str(),
                )
            })
            .filter(|(score, _)| *score >= 0.5)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, k)| k.to_string())
            .collect()
    }
}

/// Normalize a material key for case-insensitive lookup.
fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn builtin_has_every_category_entry() {
        let catalog = MaterialCatalog::builtin();
        let grouped: usize = catalog.categories().iter().map(|(_, keys)| keys.len()).sum();
        assert_eq!(grouped, catalog.len());
        assert_eq!(catalog.len(), 33);
        for entry in catalog.entries() {
            entry.material.validate().expect("builtin material valid");
        }
    }

    #[test]
    fn builtin_preserves_insertion_order() {
        let keys: Vec<&str> = MaterialCatalog::builtin().keys().take(3).collect();
        assert_eq!(keys, vec!["Al 6061-T6", "Al 7075-T6", "Al 5052-H32"]);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let catalog = MaterialCatalog::builtin();
        assert_eq!(catalog.get("abs").map(|m| m.density), Some(1050.0));
        assert_eq!(catalog.canonical_key("peek-cf30"), Some("PEEK-CF30"));
    }

    #[test]
    fn resolve_suggests_close_keys() {
        let err = MaterialCatalog::builtin()
            .resolve("PA-6")
            .expect_err("PA-6 is not a key");
        match err {
            Error::UnknownMaterial { suggestions, .. } => {
                assert!(suggestions.contains(&"PA6".to_string()), "{suggestions:?}")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn custom_csv_accepts_header_synonyms() {
        let csv = "Key,Name,Density,Yield,E,Nu,SF\nCF-Tube,Carbon tube,1550,600,70000,0.3,2.0\n";
        let catalog = MaterialCatalog::from_reader(Cursor::new(csv)).expect("parse custom CSV");
        let tube = catalog.get("cf-tube").expect("custom material present");
        assert_eq!(tube.name, "Carbon tube");
        assert_eq!(tube.elastic_modulus, 70000.0);
        assert_eq!(catalog.categories()[0].0, CUSTOM_CATEGORY);
    }
}
