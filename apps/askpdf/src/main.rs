use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    pages::{
        chat::PROCESSING_NOTICE, navbar, pricing, ChatError, ChatPage, ChatStatus,
        DashboardPage, LoginPage, NavAction, RegisterPage,
    },
    router::{guard, Route},
    AskPdfClient, FileStorage,
};
use shared::{
    domain::{ChatRole, DocumentId, Plan},
    protocol::{ChatMessage, DocumentRecord},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(name = "askpdf", about = "Chat with your PDF documents")]
struct Args {
    /// Backend base URL, e.g. http://localhost:8000. Also read from ASKPDF__SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    /// Where the logged-in user is remembered between runs.
    #[arg(long)]
    session_file: Option<PathBuf>,
    /// Settings file; defaults to ./askpdf.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and remember the session.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
        /// Defaults to --password when that is given, otherwise prompted.
        #[arg(long)]
        confirm_password: Option<String>,
        #[arg(long, default_value = "free")]
        plan: Plan,
    },
    /// Forget the session and notify the server.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// List uploaded documents.
    Docs,
    /// Upload a PDF for ingestion.
    Upload {
        file: PathBuf,
        /// Block until the server finishes processing.
        #[arg(long)]
        wait: bool,
    },
    /// Wait for a document to finish processing.
    Wait { document_id: DocumentId },
    /// Ask questions about a document; interactive unless --ask is given.
    Chat {
        document_id: DocumentId,
        #[arg(long)]
        ask: Option<String>,
    },
    /// Show the available plans.
    Pricing,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    if let Some(session_file) = args.session_file {
        settings.session_file = Some(session_file);
    }
    let session_path = settings.session_path()?;
    debug!(server_url = %settings.server_url, session = %session_path.display(), "starting");

    let client = AskPdfClient::new(
        settings.client_config(),
        Arc::new(FileStorage::new(session_path)),
    )
    .context("failed to build client")?;

    match args.command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt("Password: ")?,
            };
            let mut page = LoginPage {
                email,
                password,
                ..LoginPage::default()
            };
            page.submit(&client).await?;
            print_whoami(&client);
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
            plan,
        } => {
            let (password, confirm_password) = match (password, confirm_password) {
                (Some(password), Some(confirm)) => (password, confirm),
                (Some(password), None) => (password.clone(), password),
                (None, confirm) => {
                    let password = prompt("Password: ")?;
                    let confirm = match confirm {
                        Some(confirm) => confirm,
                        None => prompt("Confirm password: ")?,
                    };
                    (password, confirm)
                }
            };
            let mut page = RegisterPage {
                name,
                email,
                password,
                confirm_password,
                ..RegisterPage::with_plan(plan)
            };
            page.submit(&client).await?;
            print_whoami(&client);
        }
        Command::Logout => {
            navbar::activate(NavAction::Logout, &client).await?;
            println!("Logged out.");
        }
        Command::Whoami => print_whoami(&client),
        Command::Docs => {
            require_session(&client, Route::Dashboard)?;
            let mut page = DashboardPage::default();
            page.load(&client).await;
            if let Some(error) = page.error {
                bail!(error);
            }
            print_documents(&page);
        }
        Command::Upload { file, wait } => {
            require_session(&client, Route::Dashboard)?;
            let mut page = DashboardPage::default();
            page.open_upload();
            page.select_file(&file)?;
            page.upload(&client).await?;
            if let Some(notice) = &page.notice {
                println!("{notice}");
            }
            print_documents(&page);

            if wait {
                let id = newest_upload(&page, &file)?.id;
                wait_for(&client, id).await?;
            } else if let Some(error) = &page.error {
                eprintln!("warning: upload accepted but the list did not refresh: {error}");
            }
        }
        Command::Wait { document_id } => {
            require_session(&client, Route::Chat { document_id })?;
            wait_for(&client, document_id).await?;
        }
        Command::Chat { document_id, ask } => {
            require_session(&client, Route::Chat { document_id })?;
            run_chat(&client, document_id, ask).await?;
        }
        Command::Pricing => print_pricing(),
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn require_session(client: &AskPdfClient, route: Route) -> Result<()> {
    let session = client.session().current();
    if guard(route, session.as_ref()) == Route::Login {
        bail!("not logged in; run `askpdf login --email <email>` first");
    }
    Ok(())
}

fn print_whoami(client: &AskPdfClient) {
    match client.session().current() {
        Some(user) => {
            let plan = user.plan.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
            println!("{} <{}> (plan: {plan})", user.name, user.email);
        }
        None => println!("Not logged in."),
    }
}

fn print_documents(page: &DashboardPage) {
    if page.documents.is_empty() {
        println!("No documents yet. Upload one with `askpdf upload <file.pdf>`.");
        return;
    }
    for doc in &page.documents {
        let status = if doc.insert_status { "ready" } else { "processing" };
        println!("{}  {:<10}  {}  {}", doc.id, status, doc.created_at, doc.pdf_name);
    }
}

fn print_pricing() {
    println!("{}\n{}\n", pricing::HEADLINE, pricing::SUBHEADLINE);
    for offer in &pricing::OFFERS {
        let badge = if offer.popular { "  [Popular]" } else { "" };
        println!("{} - {}{badge}", offer.title, offer.price_label());
        println!("  {}", offer.tagline);
        for feature in offer.features {
            println!("  * {feature}");
        }
        println!("  {} -> {}\n", offer.call_to_action, offer.route());
    }
}

/// Picks the most recent listing entry for an uploaded file.
fn newest_upload<'a>(page: &'a DashboardPage, file: &Path) -> Result<&'a DocumentRecord> {
    if let Some(error) = &page.error {
        bail!("upload accepted but the document list could not be refreshed: {error}");
    }
    let file_name = file.file_name().map(|n| n.to_string_lossy().into_owned());
    page.documents
        .iter()
        .filter(|doc| Some(&doc.pdf_name) == file_name.as_ref())
        .max_by(|a, b| a.created_at_parsed().cmp(&b.created_at_parsed()))
        .context("uploaded document not found in listing")
}

async fn wait_for(client: &AskPdfClient, id: DocumentId) -> Result<()> {
    println!("Waiting for {id} to finish processing...");
    let record = client.wait_until_ingested_default(id).await?;
    println!("{} is ready.", record.pdf_name);
    Ok(())
}

fn print_message(message: &ChatMessage) {
    let speaker = match message.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
        ChatRole::System => "askpdf",
    };
    println!("[{speaker}] {}", message.content);
}

async fn run_chat(client: &AskPdfClient, id: DocumentId, ask: Option<String>) -> Result<()> {
    let mut page = ChatPage::new(id);
    page.open(client).await;
    match &page.status {
        ChatStatus::Failed(reason) => bail!("cannot open document: {reason}"),
        ChatStatus::Processing => {
            println!("{}: {PROCESSING_NOTICE}", page.title());
            return Ok(());
        }
        ChatStatus::Loading | ChatStatus::Ready => {}
    }

    if let Some(question) = ask {
        page.submit(client, &question).await?;
        if let Some(reply) = page.messages.last() {
            print_message(reply);
        }
        return Ok(());
    }

    println!("Chatting with {} (/refresh to reload, /quit to leave)", page.title());
    for message in &page.messages {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/refresh" => {
                page.refresh(client).await;
                info!(status = ?page.status, "refreshed chat");
                continue;
            }
            _ => {}
        }
        match page.submit(client, &line).await {
            Ok(()) => {
                if let Some(reply) = page.messages.last() {
                    print_message(reply);
                }
            }
            Err(ChatError::EmptyInput) => {}
            Err(err) => eprintln!("error: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const FIRST: &str = "8a1d2c3b-0000-4000-8000-000000000001";
    const SECOND: &str = "8a1d2c3b-0000-4000-8000-000000000002";
    const THIRD: &str = "8a1d2c3b-0000-4000-8000-000000000003";

    fn record(id: &str, name: &str, created_at: &str) -> DocumentRecord {
        DocumentRecord {
            id: id.parse().expect("document id"),
            pdf_name: name.into(),
            created_at: created_at.into(),
            insert_status: false,
        }
    }

    #[test]
    fn newest_upload_reports_failed_refresh_instead_of_missing_document() {
        let page = DashboardPage {
            error: Some("Server unreachable".into()),
            ..DashboardPage::default()
        };

        let err =
            newest_upload(&page, Path::new("/tmp/report.pdf")).expect_err("refresh failed");
        assert!(err.to_string().contains("Server unreachable"));
    }

    #[test]
    fn newest_upload_picks_latest_matching_name() {
        let page = DashboardPage {
            documents: vec![
                record(FIRST, "report.pdf", "2024-05-01T10:00:00"),
                record(SECOND, "report.pdf", "2024-05-02T10:00:00"),
                record(THIRD, "other.pdf", "2024-05-03T10:00:00"),
            ],
            ..DashboardPage::default()
        };

        let doc = newest_upload(&page, Path::new("/tmp/report.pdf")).expect("found");
        assert_eq!(doc.id.to_string(), SECOND);
    }

    #[test]
    fn server_url_flag_leaves_env_to_the_settings_layer() {
        let command = Args::command();
        let server_url = command
            .get_arguments()
            .find(|arg| arg.get_id() == "server_url")
            .expect("server_url arg");
        assert!(server_url.get_env().is_none());
    }

    #[test]
    fn register_accepts_confirm_password_flag() {
        let args = Args::try_parse_from([
            "askpdf",
            "register",
            "--name",
            "Ada",
            "--email",
            "ada@example.com",
            "--password",
            "hunter22",
            "--confirm-password",
            "hunter22",
        ])
        .expect("parse");
        assert!(matches!(
            args.command,
            Command::Register { confirm_password: Some(ref c), .. } if c == "hunter22"
        ));
    }
}
