//! Error types for the casa price service.

use thiserror::Error;

/// Core error type for the price service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Feature schema could not be built
    #[error("Schema error: {0}")]
    Schema(String),

    /// Category value has no code in the fitted encoder
    #[error("Unseen category: {0}")]
    UnseenCategory(String),

    /// Model artifact is malformed or inference failed
    #[error("Model inference error: {0}")]
    Model(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnseenCategory("Atlantis".to_string());
        assert_eq!(err.to_string(), "Unseen category: Atlantis");
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
