use thiserror::Error;

pub type ImportResult<T> = Result<T, ImportError>;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("You must have an active model to run the import")]
    NoActiveModel,

    #[error("Workbook contains no valid object or link worksheets")]
    NoImportableSheets,

    #[error("Host model error: {0}")]
    Host(String),

    #[error(transparent)]
    Property(#[from] PropertyError),

    #[error("Marker={marker} Err={source}")]
    Aborted {
        marker: String,
        #[source]
        source: Box<ImportError>,
    },
}

impl ImportError {
    /// Wrap a fatal error with the position of the last attempted operation.
    pub fn at(self, marker: impl Into<String>) -> Self {
        match self {
            // Already positioned by an inner scope
            aborted @ ImportError::Aborted { .. } => aborted,
            other => ImportError::Aborted {
                marker: marker.into(),
                source: Box::new(other),
            },
        }
    }
}

/// A value that could not be assigned to a property.
///
/// The `Display` form is the explanation line written to the import log.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Property={property} Value={value} Err={reason}")]
pub struct PropertyError {
    pub property: String,
    pub value: String,
    pub reason: String,
}

impl PropertyError {
    pub fn new(
        property: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_wraps_with_marker() {
        let err = ImportError::Host("name taken".to_string()).at("Sheet=Objects Row=4");
        assert_eq!(
            err.to_string(),
            "Marker=Sheet=Objects Row=4 Err=Host model error: name taken"
        );
    }

    #[test]
    fn test_at_keeps_innermost_marker() {
        let err = ImportError::NoActiveModel
            .at("Sheet=Links Row=2")
            .at("Begin.");
        match err {
            ImportError::Aborted { marker, .. } => assert_eq!(marker, "Sheet=Links Row=2"),
            other => panic!("Expected Aborted, got {other:?}"),
        }
    }

    #[test]
    fn test_property_error_explanation() {
        let err = PropertyError::new("InitialCapacity", "lots", "expected a number");
        assert_eq!(
            err.to_string(),
            "Property=InitialCapacity Value=lots Err=expected a number"
        );
    }
}
