//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{
    pages::{navbar, NavAction},
    AskPdfClient, ErrorCategory,
};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the worker thread. Each command runs as its own task so a slow
/// answer does not hold up document refreshes.
pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>, client: AskPdfClient) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    ErrorCategory::Unknown,
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: {err}"),
                )));
                return;
            }
        };
        tracing::info!(server = %client.config().base_url, "backend worker ready");

        while let Ok(cmd) = cmd_rx.recv() {
            let client = client.clone();
            let ui_tx = ui_tx.clone();
            let name = cmd.name();
            runtime.spawn(async move {
                let event = run_command(&client, cmd).await;
                // Every completion must reach the UI; pending flags are cleared there.
                let delivered =
                    tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok()).await;
                match delivered {
                    Ok(true) => tracing::debug!(command = name, "backend command finished"),
                    Ok(false) => tracing::debug!(command = name, "ui closed; dropping result"),
                    Err(err) => tracing::warn!(command = name, "failed to deliver result: {err}"),
                }
            });
        }
        tracing::info!("command queue closed; backend worker exiting");
    });
}

async fn run_command(client: &AskPdfClient, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::Login(request) => UiEvent::LoginFinished(client.login(&request).await),
        BackendCommand::Register(request) => {
            UiEvent::RegisterFinished(client.register(&request).await)
        }
        BackendCommand::Logout => {
            UiEvent::LoggedOut(navbar::activate(NavAction::Logout, client).await)
        }
        BackendCommand::ListDocuments => UiEvent::DocumentsLoaded(client.documents().await),
        BackendCommand::Upload { path } => UiEvent::UploadFinished(client.upload_pdf(&path).await),
        BackendCommand::FetchDocument { document_id } => UiEvent::DocumentLoaded {
            document_id,
            result: client.document(document_id).await,
        },
        BackendCommand::LoadHistory { document_id } => UiEvent::HistoryLoaded {
            document_id,
            result: client.chat_history(document_id).await,
        },
        BackendCommand::Ask { document_id, query } => UiEvent::AnswerReceived {
            document_id,
            result: client.ask(document_id, &query).await,
        },
    }
}
