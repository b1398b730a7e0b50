use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes shared by the store, the service, and the AI layers.
///
/// The outer transport layer maps codes to status classes (not found -> 404,
/// validation -> 400, AI failures -> 5xx); tests match on codes instead of
/// message text.
pub mod codes {
    /// Unknown incident ID.
    pub const INCIDENT_NOT_FOUND: &str = "INCIDENT_NOT_FOUND";
    /// Missing or empty required fields on create/update.
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    /// No AI client is configured for the requested operation.
    pub const AI_NOT_CONFIGURED: &str = "AI_NOT_CONFIGURED";
    /// Transport failure, non-2xx status, or empty completion from a provider.
    pub const AI_PROVIDER_FAILED: &str = "AI_PROVIDER_FAILED";
    /// Provider call exceeded its deadline.
    pub const AI_TIMEOUT: &str = "AI_TIMEOUT";
    /// Unrecognized provider selector in the client configuration.
    pub const AI_PROVIDER_UNKNOWN: &str = "AI_PROVIDER_UNKNOWN";
}

/// Single structured error shape used across backend layers and exposed over RPC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn incident_not_found(id: &str) -> Self {
        Self::new(codes::INCIDENT_NOT_FOUND, "Incident not found")
            .with_details(format!("id={id}"))
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.code == codes::INCIDENT_NOT_FOUND
    }

    pub fn is_validation(&self) -> bool {
        self.code == codes::VALIDATION_FAILED
    }

    pub fn is_timeout(&self) -> bool {
        self.code == codes::AI_TIMEOUT
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for AppError {}
