use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("OpenRouter API key is missing.")]
    CredentialMissing,

    #[error("OpenRouter request failed: {status} {body}")]
    Transport { status: u16, body: String },

    #[error("No content returned from OpenRouter.")]
    EmptyResponse,

    /// Structured-insight text could not be turned into a usable document.
    #[error("{0}")]
    Parse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Run cancelled before the agent finished")]
    Cancelled,
}
