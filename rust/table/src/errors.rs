//! Serializable error reporting for UI collaborators.
//!
//! Host errors are turned into an [`ErrorResponse`] carrying a machine-readable
//! code and a human-readable message, and logged at a level that matches
//! their [`ErrorSeverity`].
use serde::{Deserialize, Serialize};
use std::fmt;

/// Standard error payload handed to the UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "stale_version")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Rejected input; expected during normal play
    Client,
    /// Unexpected host failure
    Server,
    /// Shared state can no longer be trusted
    Critical,
}

/// Conversion of host errors into [`ErrorResponse`] payloads
pub trait IntoErrorResponse {
    /// Machine-readable error code
    fn error_code(&self) -> &'static str;

    /// Human-readable error message
    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Client
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Logs the error according to its severity and returns the payload
    fn report(&self) -> ErrorResponse {
        let response = self.to_error_response();
        match self.severity() {
            ErrorSeverity::Client => {
                tracing::info!(error = %response.error, "client error: {}", response.message)
            }
            ErrorSeverity::Server => {
                tracing::error!(error = %response.error, "server error: {}", response.message)
            }
            ErrorSeverity::Critical => {
                tracing::error!(
                    error = %response.error,
                    critical = true,
                    "critical error: {}",
                    response.message
                )
            }
        }
        response
    }
}
