//! Error handling for the gamestats-common crate.

use thiserror::Error;

/// Common error type for loading relations and reading configuration.
///
/// Row-level problems are not errors: loaders skip malformed rows and count
/// them. These variants cover failures that make a whole relation or the
/// configuration unusable.
#[derive(Error, Debug)]
pub enum CommonError {
    #[error("Relation '{relation}' unavailable: {message}")]
    RelationUnavailable {
        relation: &'static str,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("IO operation failed: {message}")]
    IoError {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    #[error("Invalid configuration: {message}")]
    ConfigurationError {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },
}

/// Result type alias for common operations.
pub type Result<T> = std::result::Result<T, CommonError>;

impl CommonError {
    /// Create a relation-unavailable error with a custom message.
    pub fn relation_unavailable<S: Into<String>>(relation: &'static str, message: S) -> Self {
        Self::RelationUnavailable {
            relation,
            message: message.into(),
            source: None,
        }
    }

    /// Create a relation-unavailable error with a custom message and source error.
    pub fn relation_unavailable_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        relation: &'static str,
        message: S,
        source: E,
    ) -> Self {
        Self::RelationUnavailable {
            relation,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an IO error with a custom message and source error.
    pub fn io_error_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::IoError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a configuration error with a custom message.
    pub fn configuration_error<S: Into<String>>(message: S) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with a custom message and source error.
    pub fn configuration_error_with_source<S: Into<String>, E: Into<anyhow::Error>>(
        message: S,
        source: E,
    ) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Name of the relation this error refers to, if any.
    pub fn relation(&self) -> Option<&'static str> {
        match self {
            Self::RelationUnavailable { relation, .. } => Some(*relation),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error_with_source("I/O error", err)
    }
}
