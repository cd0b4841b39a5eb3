//! Process-wide user session, mirrored into a key/value storage.
//!
//! The store is observable: front ends hold a [`watch::Receiver`] and redraw
//! whenever the session is replaced or cleared.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use shared::{domain::Plan, protocol::AuthResponse};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Storage key the user blob lives under.
pub const SESSION_STORAGE_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub name: String,
    pub email: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

impl From<AuthResponse> for UserSession {
    fn from(value: AuthResponse) -> Self {
        Self {
            name: value.name,
            email: value.email,
            token: value.token,
            plan: value.plan,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    exp: Option<i64>,
}

impl UserSession {
    /// Expiry read from the token's `exp` claim, if the token is a JWT.
    ///
    /// The signature is not checked; only the server can do that.
    pub fn token_expiry(&self) -> Option<i64> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        jsonwebtoken::decode::<TokenClaims>(
            &self.token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .ok()
        .and_then(|data| data.claims.exp)
    }

    pub fn is_expired(&self) -> bool {
        self.token_expiry()
            .is_some_and(|exp| exp <= Utc::now().timestamp())
    }
}

pub trait SessionStorage: Send + Sync {
    fn read(&self, key: &str) -> ClientResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON object on disk holding string values by key.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> ClientResult<HashMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                ClientError::Storage(format!("corrupt storage file {}: {e}", self.path.display()))
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn store_map(&self, map: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(map)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn guard(&self) -> ClientResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| ClientError::Storage("file storage lock poisoned".into()))
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> ClientResult<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.load_map()?.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> ClientResult<()> {
        let _guard = self.guard()?;
        // A corrupt file is replaced rather than blocking every future login.
        let mut map = self.load_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        self.store_map(&map)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let _guard = self.guard()?;
        let mut map = self.load_map().unwrap_or_default();
        if map.remove(key).is_some() {
            self.store_map(&map)?;
        }
        Ok(())
    }
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    tx: watch::Sender<Option<UserSession>>,
}

impl SessionStore {
    /// Restores the persisted user, treating unreadable or expired blobs as
    /// logged out.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match storage.read(SESSION_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserSession>(&raw) {
                Ok(user) if user.is_expired() => {
                    info!(email = %user.email, "persisted session expired; clearing");
                    if let Err(err) = storage.remove(SESSION_STORAGE_KEY) {
                        warn!("failed to remove expired session: {err}");
                    }
                    None
                }
                Ok(user) => {
                    debug!(email = %user.email, "restored persisted session");
                    Some(user)
                }
                Err(err) => {
                    warn!("ignoring unreadable session blob: {err}");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                warn!("failed to read session storage: {err}");
                None
            }
        };

        let (tx, _rx) = watch::channel(restored);
        Self { storage, tx }
    }

    pub fn in_memory() -> Self {
        Self::load(Arc::new(MemoryStorage::new()))
    }

    pub fn current(&self) -> Option<UserSession> {
        self.tx.borrow().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Token for protected calls, read at call time.
    pub fn bearer(&self) -> ClientResult<String> {
        match self.current() {
            Some(user) if user.is_expired() => Err(ClientError::NotAuthenticated),
            Some(user) => Ok(user.token),
            None => Err(ClientError::NotAuthenticated),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<UserSession>> {
        self.tx.subscribe()
    }

    pub fn set_user(&self, user: UserSession) -> ClientResult<()> {
        let raw = serde_json::to_string(&user).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.tx.send_replace(Some(user));
        self.storage.write(SESSION_STORAGE_KEY, &raw)
    }

    pub fn remove_user(&self) -> ClientResult<()> {
        self.tx.send_replace(None);
        self.storage.remove(SESSION_STORAGE_KEY)
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
