//! User accounts: authentication, profile documents and avatar uploads.
//!
//! # Architecture
//!
//! [`AccountReducer`] validates form input synchronously and hands the backend
//! work to effects. The backends sit behind the traits in [`providers`]:
//!
//! - [`AuthProvider`]: email/password accounts and the auth profile
//! - [`DocumentStore`]: `users/{uid}` profile documents
//! - [`AssetUploader`]: avatar image hosting
//!
//! [`mocks`] holds in-memory implementations for tests and the demo.

pub mod error;
pub mod mocks;
pub mod providers;
pub mod reducer;
pub mod types;

pub use error::{AccountError, Result};
pub use providers::{AssetUploader, AuthProvider, DocumentStore};
pub use reducer::{AccountAction, AccountEnvironment, AccountReducer, AccountState};
pub use types::{ProfileUpdate, Role, Session, SignUpForm, UserProfile};
