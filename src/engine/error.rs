//! Error types for the Invidious engine.

use thiserror::Error;

/// Errors that can occur while building requests or normalizing responses.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration rejected at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A video item is missing data the backend guarantees.
    #[error("Malformed item {video_id}: {reason}")]
    MalformedItem {
        /// Id of the offending video.
        video_id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The response body is not a JSON array of items.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// HTTP request failed (host side).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend returned status: {0}")]
    Upstream(u16),
}

impl EngineError {
    /// Build a malformed-item error.
    pub fn malformed(video_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            video_id: video_id.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error only concerns a single result item.
    #[must_use]
    pub const fn is_item_level(&self) -> bool {
        matches!(self, Self::MalformedItem { .. })
    }

    /// Check if this error is retryable.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::HttpRequest(_) => true,
            Self::Upstream(status) => *status >= 500,
            _ => false,
        }
    }
}

/// Result alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
