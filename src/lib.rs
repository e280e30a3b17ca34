//! Cardio Assist core library
//!
//! This module exports the core functionality of the heart-attack risk
//! prediction service: schema validation of patient vitals, the adapter
//! around the pretrained classifier artifact, and the HTTP surface.

use std::path::PathBuf;

pub mod api;
pub mod core;
pub mod models;

pub use crate::core::classifier::{ModelInput, RiskModel};
pub use crate::models::patient::{PatientRecord, RawValue, ValidationError};
pub use crate::models::RiskLevel;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Main error type for the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A named field failed a type, range or enum check. Expected; mapped
    /// to a client error and never crashes the process.
    #[error(transparent)]
    Validation(#[from] models::patient::ValidationError),

    /// The classifier artifact is missing or unreadable. Fatal at startup,
    /// never recovered per-request.
    #[error("cannot load model artifact from {}: {reason}", path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    /// A model input did not satisfy the feature contract. Server fault;
    /// propagated untranslated.
    #[error("model input does not match feature contract: {0}")]
    FeatureMismatch(String),
}

/// Application configuration
pub mod config {
    use serde::Deserialize;

    #[derive(Debug, Clone, Deserialize)]
    pub struct Config {
        pub server: ServerConfig,
        pub model: ModelConfig,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ServerConfig {
        pub host: String,
        pub port: u16,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ModelConfig {
        pub path: std::path::PathBuf,
    }

    /// Load configuration from file
    pub fn load_config() -> Result<Config, config::ConfigError> {
        let env = std::env::var("CARDIO_ENV").unwrap_or_else(|_| "development".into());

        config::Config::builder()
            // Built-in defaults, good enough to run without any config file
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("model.path", crate::RiskModel::DEFAULT_PATH)?
            // Start with default settings
            .add_source(config::File::with_name("config/default").required(false))
            // Override with environment-specific settings
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            // Override with environment variables
            .add_source(config::Environment::with_prefix("CARDIO").separator("__"))
            .build()?
            .try_deserialize()
    }
}
