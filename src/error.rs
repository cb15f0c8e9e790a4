//! Error types and handling for the AquaScope dashboard

use thiserror::Error;

use crate::notifications::Severity;

/// Main error type for the AquaScope dashboard
#[derive(Error, Debug)]
pub enum AquaScopeError {
    /// An optional host capability (speech capture/playback) is missing
    #[error("Capability unavailable: {capability}")]
    CapabilityUnavailable { capability: String },

    /// Input validation errors, raised before any side effect
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Uploaded file is not an image
    #[error("Invalid file type: {mime_type}")]
    InvalidFileType { mime_type: String },

    /// Chat endpoint or other network failure
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Navigation target or reference entry does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl AquaScopeError {
    /// Create a new capability-unavailable error
    pub fn capability<S: Into<String>>(capability: S) -> Self {
        Self::CapabilityUnavailable {
            capability: capability.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new invalid file type error
    pub fn invalid_file_type<S: Into<String>>(mime_type: S) -> Self {
        Self::InvalidFileType {
            mime_type: mime_type.into(),
        }
    }

    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AquaScopeError::CapabilityUnavailable { capability } => {
                format!("{capability} not supported in this environment")
            }
            AquaScopeError::Validation { message } => message.clone(),
            AquaScopeError::InvalidFileType { .. } => {
                "Please select a valid image file".to_string()
            }
            AquaScopeError::Transport { .. } => "Could not reach server".to_string(),
            AquaScopeError::NotFound { what } => format!("{what} not found"),
            AquaScopeError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            AquaScopeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            AquaScopeError::General { message } => message.clone(),
        }
    }

    /// Notification severity used when this error is surfaced as a toast
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            AquaScopeError::CapabilityUnavailable { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
