//! HTTP seam to the AskPDF backend.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::DocumentId,
    error::ApiError,
    protocol::{
        AuthResponse, ChatHistoryResponse, ChatMessage, ChatReply, ChatRequestBody,
        DocumentEnvelope, DocumentListResponse, DocumentRecord, LoginRequest, MessageResponse,
        RegisterRequest,
    },
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    config::ClientConfig,
    error::{ClientError, ClientResult},
};

/// A single PDF picked for upload.
#[derive(Debug, Clone)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PdfUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> ClientResult<Self> {
        let file_name = file_name.into();
        if !is_pdf_name(&file_name) {
            return Err(ClientError::Validation(format!(
                "'{file_name}' is not a .pdf file"
            )));
        }
        Ok(Self { file_name, bytes })
    }

    pub async fn from_path(path: &Path) -> ClientResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                ClientError::Validation(format!("no file name in path {}", path.display()))
            })?
            .to_string();
        if !is_pdf_name(&file_name) {
            return Err(ClientError::Validation(format!(
                "'{file_name}' is not a .pdf file"
            )));
        }
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { file_name, bytes })
    }
}

pub fn is_pdf_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[async_trait]
pub trait AskPdfApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse>;
    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse>;
    async fn logout(&self, token: &str) -> ClientResult<MessageResponse>;
    async fn list_documents(&self, token: &str) -> ClientResult<Vec<DocumentRecord>>;
    async fn upload_document(&self, token: &str, upload: PdfUpload)
        -> ClientResult<MessageResponse>;
    async fn get_document(&self, token: &str, id: DocumentId) -> ClientResult<DocumentRecord>;
    async fn chat_history(&self, token: &str, id: DocumentId) -> ClientResult<Vec<ChatMessage>>;
    async fn ask(&self, token: &str, id: DocumentId, query: &str) -> ClientResult<ChatMessage>;
}

pub struct HttpApi {
    http: Client,
    root: Url,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            root: config.api_root()?,
        })
    }

    pub fn root(&self) -> &Url {
        &self.root
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.root.join(path.trim_start_matches('/'))?)
    }
}

async fn check_status(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&body)
        .map(|err| err.message())
        .unwrap_or_else(|_| body.trim().to_string());
    warn!(%status, %detail, "backend rejected request");
    Err(ClientError::Http { status, detail })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

#[async_trait]
impl AskPdfApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        let url = self.endpoint("auth/login")?;
        debug!(%url, email = %request.email, "login");
        let response = self.http.post(url).json(request).send().await?;
        read_json(response).await
    }

    async fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        let url = self.endpoint("auth/register")?;
        debug!(%url, email = %request.email, plan = %request.plan, "register");
        let response = self.http.post(url).json(request).send().await?;
        read_json(response).await
    }

    async fn logout(&self, token: &str) -> ClientResult<MessageResponse> {
        let url = self.endpoint("auth/logout")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        read_json(response).await
    }

    async fn list_documents(&self, token: &str) -> ClientResult<Vec<DocumentRecord>> {
        let url = self.endpoint("documents/all")?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body: DocumentListResponse = read_json(response).await?;
        debug!(count = body.documents.len(), "fetched documents");
        Ok(body.documents)
    }

    async fn upload_document(
        &self,
        token: &str,
        upload: PdfUpload,
    ) -> ClientResult<MessageResponse> {
        let url = self.endpoint("documents/ingest")?;
        let size_bytes = upload.bytes.len();
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let body: MessageResponse = read_json(response).await?;
        info!(
            file_name = %upload.file_name,
            size_bytes,
            message = %body.message,
            "uploaded document"
        );
        Ok(body)
    }

    async fn get_document(&self, token: &str, id: DocumentId) -> ClientResult<DocumentRecord> {
        let url = self.endpoint(&format!("documents/{id}"))?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let envelope: DocumentEnvelope = read_json(response).await?;
        Ok(envelope.into_record())
    }

    async fn chat_history(&self, token: &str, id: DocumentId) -> ClientResult<Vec<ChatMessage>> {
        let url = self.endpoint(&format!("documents/{id}/chats"))?;
        let response = self.http.get(url).bearer_auth(token).send().await?;
        let body: ChatHistoryResponse = read_json(response).await?;
        Ok(body.chats)
    }

    async fn ask(&self, token: &str, id: DocumentId, query: &str) -> ClientResult<ChatMessage> {
        let url = self.endpoint(&format!("documents/{id}/chat"))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&ChatRequestBody {
                query: query.to_string(),
            })
            .send()
            .await?;
        let reply: ChatReply = read_json(response).await?;
        Ok(reply.into())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
