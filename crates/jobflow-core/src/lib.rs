pub mod app_config;
pub mod config;
pub mod jobs;
pub mod subscribers;
pub mod titles;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use jobs::{
    truncate_description, CanonicalJob, JobId, JobSource, StoredJob, DESCRIPTION_MAX_CHARS,
};
pub use subscribers::{EmailLog, Subscriber};
pub use titles::dedupe_titles;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
