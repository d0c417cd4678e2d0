use shared::error::{ApiError, ErrorCode};
use thiserror::Error;

use crate::attachment::AttachmentError;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not signed in: no access token available for {path}")]
    Unauthenticated { path: String },
    #[error("{message}")]
    Auth { status: u16, message: String },
    #[error("unable to reach the case service: {0}")]
    Transport(String),
    #[error("unable to parse response from the case service: {0}")]
    Parse(String),
    #[error("{error}")]
    Rejected { status: u16, error: ApiError },
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
}

impl ClientError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ClientError::Rejected {
            status,
            error: ApiError::new(ErrorCode::from_status(status), message),
        }
    }

    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            ClientError::Unauthenticated { .. } | ClientError::Auth { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Auth { status, .. } | ClientError::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            ClientError::Parse(value.to_string())
        } else {
            ClientError::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        ClientError::Parse(value.to_string())
    }
}
