use std::{path::Path, sync::Arc, time::Duration};

use shared::{
    domain::DocumentId,
    protocol::{ChatMessage, DocumentRecord, LoginRequest, MessageResponse, RegisterRequest},
};
use tracing::{debug, info, warn};

pub mod api;
pub mod config;
pub mod error;
pub mod pages;
pub mod router;
pub mod session;

pub use api::{AskPdfApi, HttpApi, PdfUpload};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorCategory};
pub use router::Route;
pub use session::{FileStorage, MemoryStorage, SessionStorage, SessionStore, UserSession};

/// Couples the session store with the backend API.
///
/// Protected operations read the bearer token from the store at call time,
/// so a logout elsewhere in the process takes effect on the next request.
#[derive(Clone)]
pub struct AskPdfClient {
    api: Arc<dyn AskPdfApi>,
    session: Arc<SessionStore>,
    config: ClientConfig,
}

impl AskPdfClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn SessionStorage>) -> ClientResult<Self> {
        let api = Arc::new(HttpApi::new(&config)?);
        let session = Arc::new(SessionStore::load(storage));
        Ok(Self::with_api(config, api, session))
    }

    pub fn with_api(
        config: ClientConfig,
        api: Arc<dyn AskPdfApi>,
        session: Arc<SessionStore>,
    ) -> Self {
        Self {
            api,
            session,
            config,
        }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn login(&self, request: &LoginRequest) -> ClientResult<UserSession> {
        let response = self.api.login(request).await?;
        let user = UserSession::from(response);
        self.session.set_user(user.clone())?;
        info!(email = %user.email, "logged in");
        Ok(user)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<UserSession> {
        let response = self.api.register(request).await?;
        let mut user = UserSession::from(response);
        user.plan.get_or_insert(request.plan);
        self.session.set_user(user.clone())?;
        info!(email = %user.email, plan = %request.plan, "registered");
        Ok(user)
    }

    /// Clears the local session; the server call is best effort.
    pub async fn logout(&self) -> ClientResult<()> {
        if let Some(user) = self.session.current() {
            if let Err(err) = self.api.logout(&user.token).await {
                warn!(email = %user.email, "server logout failed: {err}");
            }
        }
        self.session.remove_user()?;
        info!("logged out");
        Ok(())
    }

    pub async fn documents(&self) -> ClientResult<Vec<DocumentRecord>> {
        let token = self.session.bearer()?;
        self.api.list_documents(&token).await
    }

    pub async fn upload(&self, upload: PdfUpload) -> ClientResult<MessageResponse> {
        let token = self.session.bearer()?;
        self.api.upload_document(&token, upload).await
    }

    pub async fn upload_pdf(&self, path: &Path) -> ClientResult<MessageResponse> {
        let upload = PdfUpload::from_path(path).await?;
        self.upload(upload).await
    }

    pub async fn document(&self, id: DocumentId) -> ClientResult<DocumentRecord> {
        let token = self.session.bearer()?;
        self.api.get_document(&token, id).await
    }

    pub async fn chat_history(&self, id: DocumentId) -> ClientResult<Vec<ChatMessage>> {
        let token = self.session.bearer()?;
        self.api.chat_history(&token, id).await
    }

    pub async fn ask(&self, id: DocumentId, query: &str) -> ClientResult<ChatMessage> {
        let token = self.session.bearer()?;
        self.api.ask(&token, id, query).await
    }

    /// Polls document metadata until ingestion completes.
    pub async fn wait_until_ingested(
        &self,
        id: DocumentId,
        interval: Duration,
        max_attempts: u32,
    ) -> ClientResult<DocumentRecord> {
        let max_attempts = max_attempts.max(1);
        for attempt in 1..=max_attempts {
            let record = self.document(id).await?;
            if record.insert_status {
                info!(document_id = %id, attempt, "document ingested");
                return Ok(record);
            }
            debug!(document_id = %id, attempt, max_attempts, "document still processing");
            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }
        Err(ClientError::IngestionPending {
            attempts: max_attempts,
        })
    }

    /// [`Self::wait_until_ingested`] with the configured poll cadence.
    pub async fn wait_until_ingested_default(
        &self,
        id: DocumentId,
    ) -> ClientResult<DocumentRecord> {
        self.wait_until_ingested(
            id,
            self.config.ingestion_poll_interval,
            self.config.ingestion_poll_attempts,
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/mock_backend.rs"]
pub(crate) mod mock_backend;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
