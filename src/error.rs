//! # Bridge Error Types
//!
//! Structured error handling for the bridge using thiserror, split along the
//! failure taxonomy the engine cares about: fatal configuration errors stop
//! scheduler startup outright, while recoverable probe failures are handled
//! locally and never surface here.

use thiserror::Error;

/// Errors produced while adapting host configuration and connections to the
/// scheduling engine.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// The bridge was asked to initialize without the state it needs. Fatal:
    /// the scheduler must not start.
    #[error("Configuration error: {component}: {message}")]
    Configuration { component: String, message: String },

    /// A configuration section could not be decomposed into name/value pairs.
    /// Indicates a schema/flattener mismatch, not a transient condition.
    #[error("Serialization error: {section}: {message}")]
    Serialization { section: String, message: String },

    /// Borrowing a connection from the host pool failed. Propagated to the
    /// engine unchanged; retry policy lives above this layer.
    #[error("Connection acquisition failed: {0}")]
    ConnectionAcquisition(#[from] sqlx::Error),

    /// The engine core reported a failure from one of its own operations.
    #[error("Engine error: {operation}: {message}")]
    Engine { operation: String, message: String },

    /// No connection provider registered under the requested name.
    #[error("Unknown connection provider: {name}")]
    UnknownProvider { name: String },
}

impl BridgeError {
    /// Create a configuration error
    pub fn configuration(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error for a named configuration section
    pub fn serialization(section: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            section: section.into(),
            message: message.into(),
        }
    }

    /// Create an engine-side error
    pub fn engine(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Engine {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Whether this error should abort scheduler startup entirely
    pub fn is_fatal_for_startup(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::Serialization { .. } | Self::Engine { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_fatal() {
        let err = BridgeError::configuration("job_store", "no pool installed");
        assert!(err.is_fatal_for_startup());
        assert_eq!(
            err.to_string(),
            "Configuration error: job_store: no pool installed"
        );
    }

    #[test]
    fn unknown_provider_is_not_fatal() {
        let err = BridgeError::UnknownProvider {
            name: "missing".to_string(),
        };
        assert!(!err.is_fatal_for_startup());
    }
}
