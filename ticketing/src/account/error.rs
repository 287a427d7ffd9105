//! Error types for the account backends.

use thiserror::Error;

/// Result type alias for account operations.
pub type Result<T> = std::result::Result<T, AccountError>;

/// Failures reported by the auth, document and upload backends.
///
/// Display strings are shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    // ═══════════════════════════════════════════════════════════
    // Authentication
    // ═══════════════════════════════════════════════════════════

    /// Email and password do not match an account.
    #[error("The email or password is incorrect")]
    InvalidCredentials,

    /// An account already uses this email.
    #[error("The email address is already in use by another account")]
    EmailInUse,

    /// The backend refused the password.
    #[error("Password should be at least {min_length} characters")]
    WeakPassword {
        /// Minimum accepted length
        min_length: usize,
    },

    /// The operation needs a signed-in user.
    #[error("No user is signed in")]
    NotSignedIn,

    // ═══════════════════════════════════════════════════════════
    // Storage
    // ═══════════════════════════════════════════════════════════

    /// Image upload failed.
    #[error("Failed to upload image: {0}")]
    UploadFailed(String),

    /// A stored document could not be read or written.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Backend unreachable or internal failure.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for AccountError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidDocument(error.to_string())
    }
}
