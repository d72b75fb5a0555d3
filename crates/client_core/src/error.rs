use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach the analyser service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("analyser service returned {status}")]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("malformed response from analyser service: {0}")]
    MalformedResponse(String),
    #[error("invalid upload: {0}")]
    InvalidUpload(String),
    #[error("invalid service endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

impl ClientError {
    /// Text shown in a status region. Server detail wins over `fallback`;
    /// other failures describe themselves.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ClientError::Server { message: None, .. } => fallback.to_string(),
            ClientError::Transport(_) => {
                "Could not reach the analyser service. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedResponse(err.to_string())
        } else {
            ClientError::Transport(err)
        }
    }
}
