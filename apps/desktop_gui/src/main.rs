use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{config::DEFAULT_BASE_URL, AskPdfClient, ClientConfig, FileStorage};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{AppPaths, AskPdfApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(name = "askpdf-desktop", about = "Desktop front end for chatting with PDFs")]
struct Args {
    /// Same variable the CLI settings layer reads.
    #[arg(long, env = "ASKPDF__SERVER_URL", default_value = DEFAULT_BASE_URL)]
    server_url: String,
    /// Shared with the CLI by default so a login carries over.
    #[arg(long)]
    session_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();
    let startup = StartupConfig {
        server_url: args.server_url,
        session_file: args.session_file,
    };
    let paths = AppPaths::from_startup(&startup)?;
    tracing::debug!(
        data_root = %paths.data_root.display(),
        session = %paths.session_path.display(),
        "resolved app paths"
    );

    let client = AskPdfClient::new(
        ClientConfig::with_base_url(startup.server_url.clone()),
        Arc::new(FileStorage::new(paths.session_path.clone())),
    )
    .context("failed to build client")?;
    let session_rx = client.session().subscribe();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, client);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AskPDF")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([720.0, 520.0]),
        ..Default::default()
    };
    eframe::run_native(
        "AskPDF",
        options,
        Box::new(move |_cc| Ok(Box::new(AskPdfApp::new(cmd_tx, ui_rx, session_rx)))),
    )
    .map_err(|err| anyhow!("desktop gui exited with error: {err}"))
}
