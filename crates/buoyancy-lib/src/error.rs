use thiserror::Error;

/// Convenient result alias for the buoyancy library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an optimization or packing input fails validation.
    #[error("invalid {field}: {message}")]
    InvalidParameter { field: String, message: String },

    /// Raised when a grid range has its bounds reversed.
    #[error("invalid {field} range: min {min} is greater than max {max}")]
    InvalidRange { field: String, min: f64, max: f64 },

    /// Raised when a material key could not be found in the catalog.
    #[error("unknown material: {key}{}", format_suggestions(.suggestions))]
    UnknownMaterial {
        key: String,
        suggestions: Vec<String>,
    },

    /// Raised when material data fails validation.
    #[error("invalid material data: {message}")]
    MaterialValidation { message: String },

    /// Raised when duplicate material keys are encountered during catalog load.
    #[error("duplicate material key encountered: {key}")]
    DuplicateMaterial { key: String },

    /// Raised when a material comparison is requested over an empty set.
    #[error("material comparison requested without any materials")]
    EmptyMaterialSelection,

    /// Raised when a project file was written by a newer schema.
    #[error("unsupported project file version {version}")]
    UnsupportedProjectVersion { version: u32 },

    /// Raised when a cancellable optimization run was stopped before completion.
    #[error("optimization cancelled")]
    Cancelled,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV reader/writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_material_lists_suggestions() {
        let err = Error::UnknownMaterial {
            key: "AB".to_string(),
            suggestions: vec!["ABS".to_string()],
        };
        assert_eq!(err.to_string(), "unknown material: AB. Did you mean 'ABS'?");

        let err = Error::UnknownMaterial {
            key: "PA".to_string(),
            suggestions: vec!["PA6".to_string(), "PA12".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown material: PA. Did you mean one of: 'PA6', 'PA12'?"
        );
    }

    #[test]
    fn unknown_material_without_suggestions_is_bare() {
        let err = Error::UnknownMaterial {
            key: "unobtainium".to_string(),
            suggestions: Vec::new(),
        };
        assert_eq!(err.to_string(), "unknown material: unobtainium");
    }
}
