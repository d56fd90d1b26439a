//! Port for the external text-generation service.

use async_trait::async_trait;
use thiserror::Error;

/// One generation call: a fixed instruction, the project context and the
/// user's prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// System instruction for the report type.
    pub instruction: String,
    /// Context message, already prefixed for the service.
    pub context: String,
    /// User prompt.
    pub prompt: String,
}

/// Failure of an external generation call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    /// No usable credential is configured.
    #[error("generation service is not configured")]
    Unconfigured,

    /// The request could not be sent or timed out.
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("{status} {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// External text-generation service.
#[async_trait]
pub trait ReportTextGenerator: Send + Sync {
    /// Generates report text.
    ///
    /// Returns `Ok(None)` when the service answered successfully without
    /// any text.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the call fails.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<String>, GenerationError>;
}
