use super::*;
use crate::pages::fake_api::{client_for, FakeApi};

#[tokio::test]
async fn ready_document_loads_history_after_greeting() {
    let (api, id) = FakeApi::with_document("paper.pdf", true);
    api.state
        .lock()
        .expect("state")
        .history
        .push(ChatMessage::new(ChatRole::User, "earlier question"));
    let client = client_for(api.clone(), true);
    let mut page = ChatPage::new(id);

    page.open(&client).await;

    assert_eq!(page.status, ChatStatus::Ready);
    assert_eq!(page.title(), "paper.pdf");
    assert_eq!(page.messages.len(), 2);
    assert_eq!(page.messages[0].content, GREETING);
    assert_eq!(page.messages[1].content, "earlier question");
}

#[tokio::test]
async fn processing_document_skips_history_until_refresh_sees_it_ready() {
    let (api, id) = FakeApi::with_document("paper.pdf", false);
    let client = client_for(api.clone(), true);
    let mut page = ChatPage::new(id);

    page.open(&client).await;
    assert_eq!(page.status, ChatStatus::Processing);
    assert_eq!(api.state.lock().expect("state").history_calls, 0);
    assert!(matches!(
        page.begin_submit("anything?"),
        Err(ChatError::NotReady)
    ));

    api.set_ingested(id);
    page.refresh(&client).await;
    assert_eq!(page.status, ChatStatus::Ready);
    assert_eq!(api.state.lock().expect("state").history_calls, 1);

    page.refresh(&client).await;
    assert_eq!(
        api.state.lock().expect("state").history_calls,
        1,
        "history is fetched once"
    );
}

#[tokio::test]
async fn unknown_document_fails_with_server_detail() {
    let client = client_for(std::sync::Arc::new(FakeApi::default()), true);
    let mut page = ChatPage::new(DocumentId(uuid::Uuid::new_v4()));

    page.open(&client).await;

    assert_eq!(
        page.status,
        ChatStatus::Failed("Document not found".to_string())
    );
}

#[tokio::test]
async fn submit_appends_question_then_answer() {
    let (api, id) = FakeApi::with_document("paper.pdf", true);
    let client = client_for(api.clone(), true);
    let mut page = ChatPage::new(id);
    page.open(&client).await;

    page.submit(&client, "  what is the budget?  ")
        .await
        .expect("submit");

    let tail: Vec<_> = page
        .messages
        .iter()
        .skip(1)
        .map(|m| (m.role, m.content.as_str()))
        .collect();
    assert_eq!(
        tail,
        vec![
            (ChatRole::User, "what is the budget?"),
            (ChatRole::Assistant, "answer to: what is the budget?"),
        ]
    );
    assert!(!page.in_flight);
    assert_eq!(api.state.lock().expect("state").asked, vec!["what is the budget?"]);
}

#[test]
fn second_question_while_in_flight_is_rejected() {
    let mut page = ChatPage::new(DocumentId(uuid::Uuid::new_v4()));
    page.status = ChatStatus::Ready;

    page.begin_submit("first").expect("first");
    assert!(matches!(page.begin_submit("second"), Err(ChatError::Busy)));
    assert_eq!(page.messages.len(), 2, "only the first question is appended");

    page.complete_submit(Ok(ChatMessage::new(ChatRole::Assistant, "done")))
        .expect("complete");
    assert!(page.begin_submit("second").is_ok());
}

#[test]
fn blank_input_is_rejected_without_touching_messages() {
    let mut page = ChatPage::new(DocumentId(uuid::Uuid::new_v4()));
    page.status = ChatStatus::Ready;

    assert!(matches!(page.begin_submit("   "), Err(ChatError::EmptyInput)));
    assert_eq!(page.messages.len(), 1);
    assert!(!page.can_submit());
}

#[tokio::test]
async fn failed_answer_keeps_question_and_records_error() {
    let (api, id) = FakeApi::with_document("paper.pdf", true);
    api.state.lock().expect("state").fail_ask = Some("model overloaded".into());
    let client = client_for(api, true);
    let mut page = ChatPage::new(id);
    page.open(&client).await;

    let err = page.submit(&client, "hello?").await.expect_err("must fail");

    assert!(matches!(err, ChatError::Client(_)));
    assert_eq!(page.messages.last().map(|m| m.role), Some(ChatRole::User));
    assert_eq!(page.error.as_deref(), Some("model overloaded"));
    assert!(!page.in_flight);
}

fn ready_record(id: DocumentId) -> DocumentRecord {
    DocumentRecord {
        id,
        pdf_name: "paper.pdf".into(),
        created_at: "2024-05-01T10:00:00".into(),
        insert_status: true,
    }
}

#[test]
fn late_history_keeps_question_asked_while_it_loaded() {
    let id = DocumentId(uuid::Uuid::new_v4());
    let mut page = ChatPage::new(id);
    assert!(page.apply_document(Ok(ready_record(id))));

    page.begin_submit("what is this?").expect("question accepted");
    page.complete_submit(Ok(ChatMessage::new(ChatRole::Assistant, "a paper")))
        .expect("answer");
    page.apply_history(Ok(vec![
        ChatMessage::new(ChatRole::User, "earlier question"),
        ChatMessage::new(ChatRole::Assistant, "earlier answer"),
    ]));

    let contents: Vec<_> = page.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            GREETING,
            "earlier question",
            "earlier answer",
            "what is this?",
            "a paper",
        ]
    );
}

#[test]
fn failed_history_is_requested_again_on_next_refresh() {
    let id = DocumentId(uuid::Uuid::new_v4());
    let mut page = ChatPage::new(id);
    assert!(page.apply_document(Ok(ready_record(id))));
    assert!(!page.apply_document(Ok(ready_record(id))), "already requested");

    page.apply_history(Err(ClientError::Validation("history unavailable".into())));

    assert_eq!(page.error.as_deref(), Some("history unavailable"));
    assert!(page.apply_document(Ok(ready_record(id))));
}
