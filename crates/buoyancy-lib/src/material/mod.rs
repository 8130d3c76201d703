//! Wall materials and the material catalog.
//!
//! - [`properties`] - The [`Material`] record and its validation
//! - [`catalog`] - Built-in catalog, category grouping, CSV-loaded custom materials
//!
//! # Example
//!
//! ```
//! use buoyancy_lib::material::MaterialCatalog;
//!
//! let catalog = MaterialCatalog::builtin();
//! let abs = catalog.get("ABS").unwrap();
//! assert_eq!(abs.density, 1050.0);
//! ```

pub mod catalog;
pub mod properties;

pub use catalog::{CatalogEntry, MaterialCatalog, CUSTOM_CATEGORY};
pub use properties::Material;
