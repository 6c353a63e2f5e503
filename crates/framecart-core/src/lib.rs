pub mod app_config;
pub mod attributes;
mod config;
pub mod lenses;
pub mod meridian;
pub mod rx;
pub mod validate;
pub mod variant;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use lenses::{LensCatalog, LensSelection};
pub use rx::{Eye, PdMeasurement, Prescription, PrescriptionEntry, UsageType};
pub use validate::{validate_prescription, ValidationReport};
pub use variant::normalize_variant_id;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid variant id \"{0}\": expected a numeric id or a gid://shopify/ProductVariant/ global id")]
    InvalidVariantId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read lens catalog at {path}: {source}")]
    CatalogIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse lens catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Validation(String),
}
