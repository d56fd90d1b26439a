//! Error classification shared by the engine's service layers.

use std::fmt;

/// Client-facing classification of a service failure.
///
/// Request layers map every service error through `category()` instead of
/// matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A referenced project, user, task or report does not exist.
    NotFound,
    /// The request is malformed or conflicts with the current aggregate
    /// state.
    Conflict,
    /// Infrastructure failure unrelated to the request content.
    Internal,
}

impl ErrorCategory {
    /// Returns the canonical label for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
