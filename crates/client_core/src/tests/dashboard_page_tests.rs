use super::*;
use crate::pages::fake_api::{client_for, FakeApi};
use reqwest::StatusCode;
use std::sync::Arc;

#[tokio::test]
async fn load_lists_documents() {
    let (api, id) = FakeApi::with_document("handbook.pdf", true);
    let client = client_for(api, true);
    let mut page = DashboardPage::default();

    page.load(&client).await;

    assert!(!page.is_loading);
    assert_eq!(page.documents.len(), 1);
    assert_eq!(page.documents[0].id, id);
    assert_eq!(
        DashboardPage::chat_route(id).to_string(),
        format!("/chat/{id}")
    );
}

#[tokio::test]
async fn load_failure_keeps_previous_list_and_reports_error() {
    let (api, _id) = FakeApi::with_document("handbook.pdf", true);
    let client = client_for(api.clone(), true);
    let mut page = DashboardPage::default();
    page.load(&client).await;

    api.state.lock().expect("state").fail_list = Some(StatusCode::INTERNAL_SERVER_ERROR);
    page.load(&client).await;

    assert_eq!(page.documents.len(), 1);
    assert_eq!(page.error.as_deref(), Some("listing failed"));
}

#[tokio::test]
async fn load_without_session_asks_user_to_log_in() {
    let client = client_for(Arc::new(FakeApi::default()), false);
    let mut page = DashboardPage::default();

    page.load(&client).await;

    assert_eq!(page.error.as_deref(), Some("Please log in to continue."));
}

#[test]
fn select_file_accepts_only_pdfs() {
    let mut page = DashboardPage::default();

    assert!(page.select_file("/tmp/notes.txt").is_err());
    assert!(page.selected_file.is_none());

    page.select_file("/tmp/report.pdf").expect("pdf accepted");
    assert_eq!(page.selected_file_name().as_deref(), Some("report.pdf"));
}

#[test]
fn begin_upload_needs_a_selection_and_blocks_reentry() {
    let mut page = DashboardPage::default();
    assert!(page.begin_upload().is_none());

    page.select_file("/tmp/report.pdf").expect("pdf");
    assert!(page.begin_upload().is_some());
    assert_eq!(page.upload_label(), "Uploading...");
    assert!(page.begin_upload().is_none());

    page.close_upload();
    assert!(page.selected_file.is_some(), "dialog stays while uploading");
}

#[tokio::test]
async fn upload_refreshes_list_with_new_document() {
    let api = Arc::new(FakeApi::default());
    let client = client_for(api.clone(), true);
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fresh.pdf");
    std::fs::write(&path, b"%PDF-1.7").expect("write");

    let mut page = DashboardPage::default();
    page.open_upload();
    page.select_file(&path).expect("select");
    page.upload(&client).await.expect("upload");

    assert!(!page.upload_open);
    assert!(!page.is_uploading);
    assert!(page.selected_file.is_none());
    assert_eq!(page.notice.as_deref(), Some("Documents ingested successfully"));
    assert_eq!(page.documents.len(), 1);
    assert_eq!(page.documents[0].pdf_name, "fresh.pdf");
    assert_eq!(api.state.lock().expect("state").uploads, vec!["fresh.pdf"]);
}

#[tokio::test]
async fn upload_of_missing_file_reports_error() {
    let client = client_for(Arc::new(FakeApi::default()), true);
    let mut page = DashboardPage::default();
    page.select_file("/definitely/not/here.pdf").expect("select");

    let err = page.upload(&client).await.expect_err("must fail");

    assert!(matches!(err, ClientError::Io(_)));
    assert!(page.error.is_some());
    assert!(!page.is_uploading);
}
