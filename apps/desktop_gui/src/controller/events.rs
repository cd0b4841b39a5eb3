//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{router::Route, ClientError, ClientResult, ErrorCategory, UserSession};
use shared::{
    domain::DocumentId,
    protocol::{ChatMessage, DocumentRecord, MessageResponse},
};

pub enum UiEvent {
    Error(UiError),
    LoginFinished(ClientResult<UserSession>),
    RegisterFinished(ClientResult<UserSession>),
    LoggedOut(ClientResult<Route>),
    DocumentsLoaded(ClientResult<Vec<DocumentRecord>>),
    UploadFinished(ClientResult<MessageResponse>),
    DocumentLoaded {
        document_id: DocumentId,
        result: ClientResult<DocumentRecord>,
    },
    HistoryLoaded {
        document_id: DocumentId,
        result: ClientResult<Vec<ChatMessage>>,
    },
    AnswerReceived {
        document_id: DocumentId,
        result: ClientResult<ChatMessage>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CommandQueue,
    Logout,
    Documents,
    Chat,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: ErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(category: ErrorCategory, context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    pub fn from_client(context: UiErrorContext, err: &ClientError) -> Self {
        Self::new(err.category(), context, err.user_message())
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == ErrorCategory::Auth
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn banner_text(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

pub fn err_label(category: ErrorCategory) -> &'static str {
    match category {
        ErrorCategory::Auth => "Authentication",
        ErrorCategory::Transport => "Connection",
        ErrorCategory::Validation => "Input",
        ErrorCategory::Server => "Server",
        ErrorCategory::Unknown => "Unexpected",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_auth_failures_ask_for_reauth() {
        let err = UiError::from_client(UiErrorContext::Documents, &ClientError::NotAuthenticated);
        assert!(err.requires_reauth());
        assert_eq!(err.context(), UiErrorContext::Documents);
        assert_eq!(
            err.banner_text(),
            "Authentication error: Please log in to continue."
        );
    }

    #[test]
    fn validation_failures_keep_their_message() {
        let err = UiError::from_client(
            UiErrorContext::Chat,
            &ClientError::Validation("select a PDF first".into()),
        );
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.requires_reauth());
        assert_eq!(err.message(), "select a PDF first");
    }
}
