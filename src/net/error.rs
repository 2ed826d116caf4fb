//! Error taxonomy for the advisory backend.
//!
//! None of these reach the UI: the [`Advisor`](super::advisor::Advisor)
//! implementation turns each one into a fixed, displayable fallback string.

/// Errors raised while talking to the generative-text backend.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// No credential configured. Detected before any network attempt.
    #[error("API key missing")]
    MissingCredential,

    /// Transport failure: connect, timeout, or body read.
    #[error("request failed: {0}")]
    Request(String),

    /// Non-success HTTP status.
    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// The backend reported an error inside an otherwise valid response.
    #[error("backend error: {0}")]
    Backend(String),

    /// Invalid configuration value.
    #[error("config error: {0}")]
    Config(String),
}

impl AdvisorError {
    /// `true` for the credential check, `false` for every backend call failure.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, Self::MissingCredential)
    }
}

impl From<reqwest::Error> for AdvisorError {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e.to_string())
    }
}

impl From<serde_json::Error> for AdvisorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}
