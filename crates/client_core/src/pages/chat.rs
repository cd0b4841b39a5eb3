use shared::{
    domain::{ChatRole, DocumentId},
    protocol::{ChatMessage, DocumentRecord},
};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    error::{ClientError, ClientResult},
    AskPdfClient,
};

pub const GREETING: &str = "Hello! I'm your PDF assistant. Ask me anything about this document.";
pub const PROCESSING_NOTICE: &str =
    "This document is still being processed. Check back once it is ready.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStatus {
    Loading,
    /// Ingestion has not finished on the server.
    Processing,
    Ready,
    Failed(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("question is empty")]
    EmptyInput,
    #[error("a question is already being answered")]
    Busy,
    #[error("document is not ready for questions")]
    NotReady,
    #[error(transparent)]
    Client(#[from] ClientError),
}

#[derive(Debug, Clone)]
pub struct ChatPage {
    pub document_id: DocumentId,
    pub document: Option<DocumentRecord>,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub status: ChatStatus,
    pub in_flight: bool,
    pub error: Option<String>,
    history_requested: bool,
}

impl ChatPage {
    pub fn new(document_id: DocumentId) -> Self {
        Self {
            document_id,
            document: None,
            messages: vec![ChatMessage::new(ChatRole::System, GREETING)],
            input: String::new(),
            status: ChatStatus::Loading,
            in_flight: false,
            error: None,
            history_requested: false,
        }
    }

    pub fn title(&self) -> &str {
        self.document
            .as_ref()
            .map(|doc| doc.pdf_name.as_str())
            .unwrap_or("Loading document...")
    }

    pub fn can_submit(&self) -> bool {
        self.status == ChatStatus::Ready && !self.in_flight && !self.input.trim().is_empty()
    }

    /// Records fresh metadata; returns true when history should be fetched next.
    ///
    /// History is requested at most once per page unless that fetch fails.
    pub fn apply_document(&mut self, result: ClientResult<DocumentRecord>) -> bool {
        match result {
            Ok(record) => {
                let ready = record.insert_status;
                self.document = Some(record);
                if ready {
                    self.status = ChatStatus::Ready;
                    !std::mem::replace(&mut self.history_requested, true)
                } else {
                    self.status = ChatStatus::Processing;
                    false
                }
            }
            Err(err) => {
                error!(document_id = %self.document_id, "failed to fetch document: {err}");
                self.status = ChatStatus::Failed(err.user_message());
                false
            }
        }
    }

    /// Slots the server-side history in after the greeting. Messages added
    /// locally while the fetch was running stay after it.
    pub fn apply_history(&mut self, result: ClientResult<Vec<ChatMessage>>) {
        match result {
            Ok(history) => {
                debug!(document_id = %self.document_id, count = history.len(), "loaded chat history");
                let after_greeting = self.messages.len().min(1);
                self.messages.splice(after_greeting..after_greeting, history);
            }
            Err(err) => {
                error!(document_id = %self.document_id, "failed to fetch chat history: {err}");
                self.history_requested = false;
                self.error = Some(err.user_message());
            }
        }
    }

    pub async fn open(&mut self, client: &AskPdfClient) {
        self.status = ChatStatus::Loading;
        self.refresh(client).await;
    }

    /// Re-checks ingestion and pulls history once the document becomes ready.
    pub async fn refresh(&mut self, client: &AskPdfClient) {
        let result = client.document(self.document_id).await;
        if self.apply_document(result) {
            let history = client.chat_history(self.document_id).await;
            self.apply_history(history);
        }
    }

    /// Validates and optimistically appends the question; returns the query to send.
    pub fn begin_submit(&mut self, input: &str) -> Result<String, ChatError> {
        let query = input.trim();
        if query.is_empty() {
            return Err(ChatError::EmptyInput);
        }
        if self.in_flight {
            return Err(ChatError::Busy);
        }
        if self.status != ChatStatus::Ready {
            return Err(ChatError::NotReady);
        }
        self.messages.push(ChatMessage::user_now(query));
        self.input.clear();
        self.in_flight = true;
        self.error = None;
        Ok(query.to_string())
    }

    pub fn complete_submit(&mut self, result: ClientResult<ChatMessage>) -> Result<(), ChatError> {
        self.in_flight = false;
        match result {
            Ok(reply) => {
                self.messages.push(reply);
                Ok(())
            }
            Err(err) => {
                error!(document_id = %self.document_id, "question failed: {err}");
                self.error = Some(err.user_message());
                Err(err.into())
            }
        }
    }

    pub async fn submit(&mut self, client: &AskPdfClient, input: &str) -> Result<(), ChatError> {
        let query = self.begin_submit(input)?;
        let result = client.ask(self.document_id, &query).await;
        self.complete_submit(result)
    }
}

#[cfg(test)]
#[path = "../tests/chat_page_tests.rs"]
mod tests;
