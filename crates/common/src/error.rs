//! Error types for relaycheck

use thiserror::Error;

/// Result type alias using the relaycheck Error
pub type Result<T> = std::result::Result<T, Error>;

/// relaycheck error types
///
/// Every unmet pagination invariant surfaces as [`Error::AssertionFailed`];
/// the remaining variants describe input the engine cannot work with.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Malformed connection for {query}: {reason}")]
    MalformedConnection { query: String, reason: String },

    #[error("Query {0} missing from response data")]
    MissingQuery(String),

    #[error("GraphQL errors: {0}")]
    GraphqlErrors(String),

    #[error("Unknown query type: {0}")]
    UnknownQuery(String),

    #[error("Field {path} not found on node {node}")]
    FieldNotFound { path: String, node: String },

    #[error("Invalid date value: {0}")]
    InvalidDate(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a failed check rather than unusable input
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::AssertionFailed(_))
    }
}

impl From<chrono::ParseError> for Error {
    fn from(e: chrono::ParseError) -> Self {
        Error::InvalidDate(e.to_string())
    }
}

/// Fail the current check with [`Error::AssertionFailed`] unless `cond` holds.
#[macro_export]
macro_rules! verify {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::Error::AssertionFailed(format!($($arg)+)));
        }
    };
}
