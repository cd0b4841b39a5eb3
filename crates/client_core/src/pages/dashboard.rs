use std::path::{Path, PathBuf};

use shared::{
    domain::DocumentId,
    protocol::{DocumentRecord, MessageResponse},
};
use tracing::{error, info};

use crate::{
    api::is_pdf_name,
    error::{ClientError, ClientResult},
    router::Route,
    AskPdfClient,
};

#[derive(Debug, Clone, Default)]
pub struct DashboardPage {
    pub documents: Vec<DocumentRecord>,
    pub is_loading: bool,
    pub upload_open: bool,
    pub is_uploading: bool,
    pub selected_file: Option<PathBuf>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl DashboardPage {
    pub fn upload_label(&self) -> &'static str {
        if self.is_uploading {
            "Uploading..."
        } else {
            "Upload"
        }
    }

    pub fn chat_route(id: DocumentId) -> Route {
        Route::Chat { document_id: id }
    }

    pub fn selected_file_name(&self) -> Option<String> {
        self.selected_file
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
    }

    pub fn begin_load(&mut self) {
        self.is_loading = true;
    }

    pub fn apply_documents(&mut self, result: ClientResult<Vec<DocumentRecord>>) {
        self.is_loading = false;
        match result {
            Ok(documents) => {
                self.documents = documents;
                self.error = None;
            }
            Err(err) => {
                error!("failed to fetch documents: {err}");
                self.error = Some(err.user_message());
            }
        }
    }

    pub async fn load(&mut self, client: &AskPdfClient) {
        self.begin_load();
        let result = client.documents().await;
        self.apply_documents(result);
    }

    pub fn open_upload(&mut self) {
        self.upload_open = true;
        self.notice = None;
    }

    pub fn close_upload(&mut self) {
        if !self.is_uploading {
            self.upload_open = false;
            self.selected_file = None;
        }
    }

    pub fn select_file(&mut self, path: impl Into<PathBuf>) -> ClientResult<()> {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_pdf_name(&name) {
            let err = ClientError::Validation(format!("'{name}' is not a PDF"));
            self.error = Some(err.user_message());
            return Err(err);
        }
        self.selected_file = Some(path);
        self.error = None;
        Ok(())
    }

    /// Returns the file to upload, or `None` when nothing can be sent yet.
    pub fn begin_upload(&mut self) -> Option<PathBuf> {
        if self.is_uploading {
            return None;
        }
        let path = self.selected_file.clone()?;
        self.is_uploading = true;
        self.error = None;
        Some(path)
    }

    /// Applies the upload outcome; returns true when the list should be refreshed.
    pub fn finish_upload(&mut self, result: &ClientResult<MessageResponse>) -> bool {
        self.is_uploading = false;
        self.upload_open = false;
        match result {
            Ok(response) => {
                info!(message = %response.message, "upload accepted");
                self.selected_file = None;
                self.notice = Some(response.message.clone());
                true
            }
            Err(err) => {
                error!("upload failed: {err}");
                self.error = Some(err.user_message());
                false
            }
        }
    }

    /// Uploads the selected file and refreshes the list on success.
    pub async fn upload(&mut self, client: &AskPdfClient) -> ClientResult<()> {
        let Some(path) = self.begin_upload() else {
            return Err(ClientError::Validation("select a PDF first".into()));
        };
        let result = client.upload_pdf(&path).await;
        if self.finish_upload(&result) {
            self.load(client).await;
        }
        result.map(|_| ())
    }
}

#[cfg(test)]
#[path = "../tests/dashboard_page_tests.rs"]
mod tests;
