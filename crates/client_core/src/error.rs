use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not logged in: no valid session token")]
    NotAuthenticated,
    #[error("server returned {status}: {detail}")]
    Http { status: StatusCode, detail: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed server response: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("session storage failure: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("document still processing after {attempts} checks")]
    IngestionPending { attempts: u32 },
    #[error("request not sent: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Auth,
    Transport,
    Validation,
    Server,
    Unknown,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::NotAuthenticated => ErrorCategory::Auth,
            ClientError::Http { status, .. } => {
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN {
                    ErrorCategory::Auth
                } else if status.is_client_error() {
                    ErrorCategory::Validation
                } else if status.is_server_error() {
                    ErrorCategory::Server
                } else {
                    ErrorCategory::Unknown
                }
            }
            ClientError::Transport(err) if err.is_decode() => ErrorCategory::Server,
            ClientError::Transport(_) | ClientError::Unavailable(_) => ErrorCategory::Transport,
            ClientError::Decode(_) | ClientError::IngestionPending { .. } => ErrorCategory::Server,
            ClientError::Validation(_) | ClientError::Url(_) => ErrorCategory::Validation,
            ClientError::Storage(_) | ClientError::Io(_) => ErrorCategory::Unknown,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category() == ErrorCategory::Auth
    }

    /// Short text suitable for a status line in a front end.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::NotAuthenticated => "Please log in to continue.".to_string(),
            ClientError::Validation(message) | ClientError::Unavailable(message) => message.clone(),
            ClientError::Http { detail, .. } if !detail.is_empty() => detail.clone(),
            ClientError::Http { status, .. } => format!("Request failed ({status})."),
            ClientError::Transport(_) => {
                "Server unreachable; check the URL or your network and retry.".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
