//! In-memory account backends for tests and the demo binary.

use super::error::{AccountError, Result};
use super::providers::{AssetUploader, AuthProvider, DocumentStore};
use super::types::{ProfileUpdate, Session};
use crate::types::UserId;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Minimum password length accepted at sign-up
pub const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    password: String,
    session: Session,
}

/// Mock auth backend.
///
/// Accounts are keyed by email. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthProvider {
    accounts: Arc<Mutex<HashMap<String, Account>>>,
    current: Arc<Mutex<Option<UserId>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryAuthProvider {
    /// Create an empty auth backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account up front and return its session.
    ///
    /// # Errors
    ///
    /// Returns error if the email is taken.
    pub fn with_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Session> {
        let session = Session {
            uid: UserId::new(uuid::Uuid::new_v4().to_string()),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            photo_url: None,
        };
        let mut accounts = self.lock_accounts()?;
        if accounts.contains_key(email) {
            return Err(AccountError::EmailInUse);
        }
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                session: session.clone(),
            },
        );
        Ok(session)
    }

    /// Make every call fail with [`AccountError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Release);
    }

    /// Currently signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserId> {
        self.current.lock().ok().and_then(|current| current.clone())
    }

    fn lock_accounts(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Account>>> {
        self.accounts
            .lock()
            .map_err(|_| AccountError::Unavailable("auth storage poisoned".to_string()))
    }

    fn set_current(&self, uid: Option<UserId>) -> Result<()> {
        let mut current = self
            .current
            .lock()
            .map_err(|_| AccountError::Unavailable("auth storage poisoned".to_string()))?;
        *current = uid;
        Ok(())
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Acquire) {
            return Err(AccountError::Unavailable("auth backend offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.ensure_available()?;
        let session = {
            let accounts = self.lock_accounts()?;
            match accounts.get(email) {
                Some(account) if account.password == password => account.session.clone(),
                _ => return Err(AccountError::InvalidCredentials),
            }
        };
        self.set_current(Some(session.uid.clone()))?;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        self.ensure_available()?;
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AccountError::WeakPassword {
                min_length: MIN_PASSWORD_LENGTH,
            });
        }
        let session = self.with_account(email, password, None)?;
        self.set_current(Some(session.uid.clone()))?;
        Ok(session)
    }

    async fn update_profile(&self, uid: &UserId, update: ProfileUpdate) -> Result<Session> {
        self.ensure_available()?;
        let mut accounts = self.lock_accounts()?;
        let account = accounts
            .values_mut()
            .find(|account| &account.session.uid == uid)
            .ok_or(AccountError::NotSignedIn)?;

        if let Some(display_name) = update.display_name {
            account.session.display_name = Some(display_name);
        }
        if let Some(photo_url) = update.photo_url {
            account.session.photo_url = Some(photo_url);
        }
        Ok(account.session.clone())
    }

    async fn sign_out(&self) -> Result<()> {
        self.ensure_available()?;
        self.set_current(None)
    }
}

/// Mock document database.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<Mutex<HashMap<(String, String), Value>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.lock().map(|docs| docs.len()).unwrap_or(0)
    }

    /// Whether nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        let documents = self
            .documents
            .lock()
            .map_err(|_| AccountError::Unavailable("document storage poisoned".to_string()))?;
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    async fn set_document(&self, collection: &str, id: &str, document: Value) -> Result<()> {
        self.documents
            .lock()
            .map_err(|_| AccountError::Unavailable("document storage poisoned".to_string()))?
            .insert((collection.to_string(), id.to_string()), document);
        Ok(())
    }
}

/// Mock image host.
///
/// Returns a deterministic URL derived from the file name, or fails every
/// upload when built with [`Self::failing`].
#[derive(Debug, Clone)]
pub struct InMemoryAssetUploader {
    base_url: String,
    fail: bool,
}

impl InMemoryAssetUploader {
    /// Uploader serving files under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            fail: false,
        }
    }

    /// Uploader that refuses every image.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            base_url: String::new(),
            fail: true,
        }
    }
}

impl Default for InMemoryAssetUploader {
    fn default() -> Self {
        Self::new("https://images.example.com")
    }
}

#[async_trait]
impl AssetUploader for InMemoryAssetUploader {
    async fn upload_image(&self, uri: &str) -> Result<String> {
        if self.fail {
            return Err(AccountError::UploadFailed("upload refused".to_string()));
        }
        let filename = uri.rsplit('/').next().unwrap_or(uri);
        if filename.is_empty() {
            return Err(AccountError::UploadFailed(format!("no file name in {uri}")));
        }
        Ok(format!("{}/{filename}", self.base_url.trim_end_matches('/')))
    }
}
