use thiserror::Error;

/// Custom error type for Geoweave operations.
#[derive(Debug, Error)]
pub enum GeoweaveError {
    /// Too few locations survived aggregation to build a network.
    #[error("Insufficient data: {locations} location(s) after aggregation, need at least {required}")]
    DataInsufficiency { locations: usize, required: usize },

    /// Pipeline parameters were rejected before any stage ran.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input records or configuration could not be read or parsed.
    #[error("Input error: {0}")]
    Input(String),

    /// Stage outputs do not describe the same set of nodes.
    #[error("Inconsistent pipeline state: {0}")]
    Inconsistent(String),

    /// Writing an export artifact failed.
    #[error("Export error: {0}")]
    Export(String),
}

impl From<std::io::Error> for GeoweaveError {
    fn from(err: std::io::Error) -> Self {
        GeoweaveError::Input(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for GeoweaveError {
    fn from(err: serde_json::Error) -> Self {
        GeoweaveError::Input(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml_ng::Error> for GeoweaveError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        GeoweaveError::Input(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for GeoweaveError {
    fn from(err: toml::de::Error) -> Self {
        GeoweaveError::Configuration(format!("TOML error: {}", err))
    }
}
