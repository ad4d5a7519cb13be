//! Custom error types for biopubs.
//!
//! This module defines all error types used throughout the library.
//! All functions return `Result<T, BiopubsError>` instead of using `unwrap()`.

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for biopubs operations.
///
/// The `Display` text of each variant is what the prompt proxy hands back to
/// callers in its `{ "error": ... }` body.
#[derive(Debug, Error)]
pub enum BiopubsError {
    /// Network/HTTP request error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Malformed input or upstream payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Upstream gateway answered 429
    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    /// Upstream gateway answered 402
    #[error("AI credits depleted. Please add more credits in workspace settings.")]
    CreditsDepleted,

    /// Any other non-2xx from the upstream gateway.
    /// The body is logged server-side and never shown to callers.
    #[error("AI Gateway error")]
    Gateway {
        /// Upstream HTTP status
        status: u16,
        /// Upstream response body
        body: String,
    },

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl BiopubsError {
    /// HTTP status the prompt proxy answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            BiopubsError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            BiopubsError::CreditsDepleted => StatusCode::PAYMENT_REQUIRED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to proxy callers.
    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }
    }
}

/// Fallback text when an error carries no message
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Result type alias using `BiopubsError`
pub type Result<T> = std::result::Result<T, BiopubsError>;

/// Extension trait for adding context to Option types
pub trait OptionExt<T> {
    /// Convert Option to Result with a parse error message
    fn ok_or_parse(self, msg: &str) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_parse(self, msg: &str) -> Result<T> {
        self.ok_or_else(|| BiopubsError::Parse(msg.to_string()))
    }
}
