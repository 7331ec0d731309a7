//! Error types for the lead API client.

use lead_core::WizardError;
use thiserror::Error;

/// Errors that can occur when talking to the lead conversation API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed or the response could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The server refused the request.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The wizard could not produce a submission.
    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),
}

impl ClientError {
    /// True for failures worth retrying unchanged.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(_) => true,
            ClientError::Rejected { status, .. } => *status >= 500,
            ClientError::NotFound(_) | ClientError::Wizard(_) => false,
        }
    }
}
