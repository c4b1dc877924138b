use thiserror::Error;

/// Core domain errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Upstream error: {operation} - {message}")]
    Upstream { operation: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Per-item failures are recorded in results; everything else aborts the call.
    pub fn is_per_item(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Upstream { .. })
    }

    /// Re-labels any error raised by a provider as an upstream failure of `operation`.
    ///
    /// `NotFound` and existing `Upstream` errors pass through untouched.
    pub fn into_upstream(self, operation: &str) -> Self {
        match self {
            Self::NotFound { .. } | Self::Upstream { .. } => self,
            other => Self::upstream(operation, other.to_string()),
        }
    }
}
