//! Backends the account reducer depends on.
//!
//! The reducer only sees these traits; the demo binary and tests plug in the
//! in-memory versions from [`super::mocks`].

use super::error::Result;
use super::types::{ProfileUpdate, Session};
use crate::types::UserId;
use async_trait::async_trait;
use serde_json::Value;

/// Email/password authentication
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Signs in an existing account
    ///
    /// # Errors
    ///
    /// Returns [`super::AccountError::InvalidCredentials`] on a mismatch.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Creates an account and signs it in
    ///
    /// # Errors
    ///
    /// Returns error if the email is taken or the password is refused.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Session>;

    /// Applies `update` to the signed-in user and returns the refreshed session
    ///
    /// # Errors
    ///
    /// Returns error if no user is signed in or the backend fails.
    async fn update_profile(&self, uid: &UserId, update: ProfileUpdate) -> Result<Session>;

    /// Ends the current session
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn sign_out(&self) -> Result<()>;
}

/// JSON documents addressed by collection and id
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a document, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>>;

    /// Creates or replaces a document
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    async fn set_document(&self, collection: &str, id: &str, document: Value) -> Result<()>;
}

/// Image hosting for avatars
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Uploads the local image at `uri` and returns its public URL
    ///
    /// # Errors
    ///
    /// Returns [`super::AccountError::UploadFailed`] if the upload is refused.
    async fn upload_image(&self, uri: &str) -> Result<String>;
}
