use super::*;
use jsonwebtoken::{EncodingKey, Header};
use serde::Serialize;

#[derive(Serialize)]
struct TestClaims {
    user: serde_json::Value,
    exp: i64,
}

fn jwt_expiring_at(exp: i64) -> String {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &TestClaims {
            user: serde_json::json!({"name": "Ada", "email": "ada@example.com"}),
            exp,
        },
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .expect("encode jwt")
}

fn session_with_token(token: impl Into<String>) -> UserSession {
    UserSession {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        token: token.into(),
        plan: Some(Plan::Free),
    }
}

#[test]
fn set_user_persists_blob_under_user_key() {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::load(storage.clone());
    assert!(!store.is_logged_in());

    store
        .set_user(session_with_token("opaque-token"))
        .expect("set user");

    let raw = storage
        .read(SESSION_STORAGE_KEY)
        .expect("read")
        .expect("blob present");
    let persisted: UserSession = serde_json::from_str(&raw).expect("decode blob");
    assert_eq!(persisted.token, "opaque-token");
    assert_eq!(store.bearer().expect("bearer"), "opaque-token");
}

#[test]
fn remove_user_clears_store_and_storage() {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::load(storage.clone());
    store
        .set_user(session_with_token("opaque-token"))
        .expect("set user");

    store.remove_user().expect("remove user");

    assert!(store.current().is_none());
    assert!(storage.read(SESSION_STORAGE_KEY).expect("read").is_none());
    assert!(matches!(store.bearer(), Err(ClientError::NotAuthenticated)));
}

#[test]
fn subscribers_observe_login_and_logout() {
    let store = SessionStore::in_memory();
    let mut rx = store.subscribe();
    assert!(rx.borrow_and_update().is_none());

    store
        .set_user(session_with_token("opaque-token"))
        .expect("set user");
    assert!(rx.has_changed().expect("sender alive"));
    assert_eq!(
        rx.borrow_and_update().as_ref().map(|u| u.name.clone()),
        Some("Ada".to_string())
    );

    store.remove_user().expect("remove");
    assert!(rx.has_changed().expect("sender alive"));
    assert!(rx.borrow_and_update().is_none());
}

#[test]
fn load_restores_session_from_file_storage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    {
        let store = SessionStore::load(Arc::new(FileStorage::new(&path)));
        store
            .set_user(session_with_token(jwt_expiring_at(Utc::now().timestamp() + 3600)))
            .expect("set user");
    }

    let reloaded = SessionStore::load(Arc::new(FileStorage::new(&path)));
    let user = reloaded.current().expect("restored");
    assert_eq!(user.email, "ada@example.com");
    assert!(!user.is_expired());
}

#[test]
fn load_discards_expired_token_and_removes_key() {
    let storage = Arc::new(MemoryStorage::new());
    let expired = session_with_token(jwt_expiring_at(Utc::now().timestamp() - 60));
    storage
        .write(
            SESSION_STORAGE_KEY,
            &serde_json::to_string(&expired).expect("encode"),
        )
        .expect("seed");

    let store = SessionStore::load(storage.clone());

    assert!(store.current().is_none());
    assert!(storage.read(SESSION_STORAGE_KEY).expect("read").is_none());
}

#[test]
fn load_treats_corrupt_blob_as_logged_out() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .write(SESSION_STORAGE_KEY, "{not json")
        .expect("seed");

    let store = SessionStore::load(storage);
    assert!(!store.is_logged_in());
}

#[test]
fn opaque_tokens_never_count_as_expired() {
    let user = session_with_token("not-a-jwt");
    assert_eq!(user.token_expiry(), None);
    assert!(!user.is_expired());
}

#[test]
fn file_storage_recovers_from_corrupt_file_on_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    fs::write(&path, "garbage").expect("seed garbage");

    let storage = FileStorage::new(&path);
    assert!(storage.read(SESSION_STORAGE_KEY).is_err());

    storage.write(SESSION_STORAGE_KEY, "{}").expect("write");
    assert_eq!(
        storage.read(SESSION_STORAGE_KEY).expect("read").as_deref(),
        Some("{}")
    );
}

#[tokio::test]
async fn expired_token_set_at_runtime_blocks_protected_calls() {
    let store = Arc::new(SessionStore::in_memory());
    store
        .set_user(session_with_token(jwt_expiring_at(Utc::now().timestamp() - 60)))
        .expect("set user");
    assert!(matches!(store.bearer(), Err(ClientError::NotAuthenticated)));

    let api = Arc::new(crate::pages::fake_api::FakeApi::default());
    let client = crate::AskPdfClient::with_api(crate::ClientConfig::default(), api, store);

    let err = client.documents().await.expect_err("expired token");
    assert!(matches!(err, ClientError::NotAuthenticated));
    assert!(err.requires_reauth());
}
