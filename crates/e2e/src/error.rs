//! Error types for the scenario harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("API not ready after {0} attempts")]
    ApiUnavailable(usize),

    #[error("API error: {0}")]
    Api(String),

    #[error("Scenario spec parse error: {0}")]
    SpecParse(String),

    #[error("Step failed: {step} - {reason}")]
    StepFailed { step: String, reason: String },

    #[error(transparent)]
    Verify(#[from] relaycheck_common::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
