// web-server/src/salt/error.rs
use thiserror::Error;

/// Failures talking to salt-api
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Salt API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Salt API request failed: {0}")]
    Transport(String),

    #[error("Salt API login failed: {0}")]
    Login(String),

    #[error("Salt API returned an unexpected payload: {0}")]
    Decode(String),

    #[error("invalid Salt API url: {0}")]
    InvalidUrl(String),

    #[error("incomplete Salt command: {0}")]
    Incomplete(String),
}

impl UpstreamError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UpstreamError::Status { status: 401, .. })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}
