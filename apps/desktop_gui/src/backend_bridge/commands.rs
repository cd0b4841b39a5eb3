//! Backend commands queued from UI to backend worker.

use std::path::PathBuf;

use shared::{
    domain::DocumentId,
    protocol::{LoginRequest, RegisterRequest},
};

pub enum BackendCommand {
    Login(LoginRequest),
    Register(RegisterRequest),
    Logout,
    ListDocuments,
    Upload {
        path: PathBuf,
    },
    FetchDocument {
        document_id: DocumentId,
    },
    LoadHistory {
        document_id: DocumentId,
    },
    Ask {
        document_id: DocumentId,
        query: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Login(_) => "login",
            BackendCommand::Register(_) => "register",
            BackendCommand::Logout => "logout",
            BackendCommand::ListDocuments => "list_documents",
            BackendCommand::Upload { .. } => "upload",
            BackendCommand::FetchDocument { .. } => "fetch_document",
            BackendCommand::LoadHistory { .. } => "load_history",
            BackendCommand::Ask { .. } => "ask",
        }
    }
}
