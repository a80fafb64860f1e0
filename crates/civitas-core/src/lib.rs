pub mod app_config;
pub mod communes;
pub mod config;
pub mod geo;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use communes::{
    load_communes, parse_communes, CommuneConfig, CommuneRegistry, CommunesFile, PostalCodes,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{BoundingBox, Centroid, CommuneGeoContext};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read communes file {path}: {source}")]
    CommunesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse communes file: {0}")]
    CommunesFileParse(#[from] serde_yaml::Error),

    #[error("communes validation failed: {0}")]
    Validation(String),
}
