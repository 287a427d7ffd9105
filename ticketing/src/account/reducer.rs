//! Sign-in, sign-up, sign-out and profile editing.

use super::error::Result;
use super::providers::{AssetUploader, AuthProvider, DocumentStore};
use super::types::{ProfileUpdate, Session, SignUpForm, UserProfile};
use crate::catalog::HomeFeed;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use ticketbook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Account screens state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    /// Signed-in user
    pub session: Option<Session>,
    /// Whether a backend request is running
    pub busy: bool,
    /// Whether the profile editor is open
    pub editing: bool,
    /// Last success message ("Welcome back!")
    pub notice: Option<String>,
    /// Last failure message
    pub last_error: Option<String>,
}

impl AccountState {
    /// Signed-out state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a user is signed in
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    /// Name for the home screen greeting
    #[must_use]
    pub fn greeting_name(&self) -> String {
        HomeFeed::greeting_name_for(
            self.session
                .as_ref()
                .and_then(|session| session.display_name.as_deref()),
        )
    }
}

/// Inputs of the account screens
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountAction {
    // Commands
    /// Sign in with email and password
    SignIn {
        /// Email
        email: String,
        /// Password
        password: String,
    },
    /// Create an account
    SignUp {
        /// Sign-up form contents
        form: SignUpForm,
    },
    /// End the session
    SignOut,
    /// Open the profile editor
    StartEditing,
    /// Close the profile editor without saving
    CancelEditing,
    /// Save the profile editor
    SaveProfile {
        /// Display name as typed
        display_name: String,
        /// Newly picked local avatar image
        avatar_uri: Option<String>,
    },

    // Effect results
    /// Sign-in succeeded
    SignedIn {
        /// New session
        session: Session,
        /// Welcome message
        greeting: String,
    },
    /// Sign-in failed
    SignInFailed {
        /// Reason
        reason: String,
    },
    /// Account created and signed in
    SignedUp {
        /// New session
        session: Session,
    },
    /// Account creation failed
    SignUpFailed {
        /// Reason
        reason: String,
    },
    /// Session ended
    SignedOut,
    /// Sign-out failed
    SignOutFailed {
        /// Reason
        reason: String,
    },
    /// Profile saved
    ProfileUpdated {
        /// Refreshed session
        session: Session,
    },
    /// Nothing to save
    ProfileUnchanged,
    /// Profile save failed
    ProfileUpdateFailed {
        /// Reason
        reason: String,
    },
}

/// Account backends
#[derive(Clone)]
pub struct AccountEnvironment {
    /// Authentication
    pub auth: Arc<dyn AuthProvider>,
    /// Profile documents
    pub documents: Arc<dyn DocumentStore>,
    /// Avatar hosting
    pub uploader: Arc<dyn AssetUploader>,
}

impl AccountEnvironment {
    /// Creates a new `AccountEnvironment`
    #[must_use]
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        documents: Arc<dyn DocumentStore>,
        uploader: Arc<dyn AssetUploader>,
    ) -> Self {
        Self {
            auth,
            documents,
            uploader,
        }
    }
}

/// Reducer for the account screens
#[derive(Clone, Debug, Default)]
pub struct AccountReducer;

impl AccountReducer {
    /// Creates a new `AccountReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_sign_in(email: &str, password: &str) -> std::result::Result<(), String> {
        if email.trim().is_empty() || password.is_empty() {
            return Err("Please enter your email and password.".to_string());
        }
        Ok(())
    }

    /// Changes between the editor contents and the current session
    ///
    /// A missing display name compares equal to an empty one. `photo_url`
    /// holds the local image URI until the avatar is uploaded.
    fn pending_changes(
        session: &Session,
        display_name: &str,
        avatar_uri: Option<String>,
    ) -> ProfileUpdate {
        ProfileUpdate {
            display_name: (session.display_name.as_deref().unwrap_or_default() != display_name)
                .then(|| display_name.to_string()),
            photo_url: avatar_uri.filter(|uri| session.photo_url.as_deref() != Some(uri.as_str())),
        }
    }

    async fn sign_in(env: AccountEnvironment, email: String, password: String) -> AccountAction {
        let result: Result<(Session, String)> = async {
            let session = env.auth.sign_in(&email, &password).await?;
            let document = env
                .documents
                .get_document(UserProfile::COLLECTION, session.uid.as_str())
                .await?;
            let profile = document.and_then(|doc| {
                serde_json::from_value::<UserProfile>(doc)
                    .map_err(|error| tracing::warn!(%error, "Ignoring malformed user document"))
                    .ok()
            });
            Ok((session, UserProfile::greeting(profile.as_ref())))
        }
        .await;

        match result {
            Ok((session, greeting)) => {
                tracing::info!(uid = %session.uid, "Signed in");
                AccountAction::SignedIn { session, greeting }
            },
            Err(error) => {
                tracing::warn!(%error, "Sign-in failed");
                AccountAction::SignInFailed {
                    reason: error.to_string(),
                }
            },
        }
    }

    async fn sign_up(env: AccountEnvironment, form: SignUpForm) -> AccountAction {
        let result: Result<Session> = async {
            let session = env.auth.sign_up(&form.email, &form.password).await?;

            // A failed avatar upload still creates the account
            let photo_url = match form.avatar_uri.as_deref() {
                Some(uri) => env
                    .uploader
                    .upload_image(uri)
                    .await
                    .map_err(|error| tracing::warn!(%error, "Avatar upload failed"))
                    .ok(),
                None => None,
            };

            let session = env
                .auth
                .update_profile(
                    &session.uid,
                    ProfileUpdate {
                        display_name: Some(form.full_name.clone()),
                        photo_url,
                    },
                )
                .await?;

            let document = serde_json::to_value(form.profile())?;
            env.documents
                .set_document(UserProfile::COLLECTION, session.uid.as_str(), document)
                .await?;
            Ok(session)
        }
        .await;

        match result {
            Ok(session) => {
                tracing::info!(uid = %session.uid, role = %form.role(), "Account created");
                AccountAction::SignedUp { session }
            },
            Err(error) => {
                tracing::warn!(%error, "Sign-up failed");
                AccountAction::SignUpFailed {
                    reason: error.to_string(),
                }
            },
        }
    }

    async fn sign_out(env: AccountEnvironment) -> AccountAction {
        match env.auth.sign_out().await {
            Ok(()) => AccountAction::SignedOut,
            Err(error) => {
                tracing::warn!(%error, "Sign-out failed");
                AccountAction::SignOutFailed {
                    reason: "Failed to sign out. Please try again.".to_string(),
                }
            },
        }
    }

    async fn save_profile(
        env: AccountEnvironment,
        session: Session,
        changes: ProfileUpdate,
    ) -> AccountAction {
        let photo_url = match changes.photo_url {
            Some(uri) => match env.uploader.upload_image(&uri).await {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::warn!(%error, "Avatar upload failed");
                    return AccountAction::ProfileUpdateFailed {
                        reason: "Failed to upload avatar image. Please try again.".to_string(),
                    };
                },
            },
            None => None,
        };

        let update = ProfileUpdate {
            display_name: changes.display_name,
            photo_url,
        };
        match env.auth.update_profile(&session.uid, update).await {
            Ok(session) => AccountAction::ProfileUpdated { session },
            Err(error) => {
                tracing::warn!(%error, "Profile update failed");
                AccountAction::ProfileUpdateFailed {
                    reason: "Failed to update profile. Please try again.".to_string(),
                }
            },
        }
    }

    fn begin(state: &mut AccountState) -> std::result::Result<(), String> {
        if state.busy {
            return Err("Another request is still in progress.".to_string());
        }
        state.busy = true;
        state.last_error = None;
        state.notice = None;
        Ok(())
    }

    fn finish(state: &mut AccountState, error: Option<String>) {
        state.busy = false;
        state.last_error = error;
    }
}

impl Reducer for AccountReducer {
    type State = AccountState;
    type Action = AccountAction;
    type Environment = AccountEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            AccountAction::SignIn { email, password } => {
                if let Err(error) = Self::validate_sign_in(&email, &password) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                if let Err(error) = Self::begin(state) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                let env = env.clone();
                smallvec![Effect::future(async move {
                    Some(Self::sign_in(env, email, password).await)
                })]
            },

            AccountAction::SignUp { form } => {
                if let Err(error) = form.validate() {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                if let Err(error) = Self::begin(state) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                let env = env.clone();
                smallvec![Effect::future(async move { Some(Self::sign_up(env, form).await) })]
            },

            AccountAction::SignOut => {
                if let Err(error) = Self::begin(state) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                let env = env.clone();
                smallvec![Effect::future(async move { Some(Self::sign_out(env).await) })]
            },

            AccountAction::StartEditing => {
                if state.session.is_some() {
                    state.editing = true;
                }
                SmallVec::new()
            },
            AccountAction::CancelEditing => {
                state.editing = false;
                SmallVec::new()
            },

            AccountAction::SaveProfile {
                display_name,
                avatar_uri,
            } => {
                let Some(session) = state.session.clone() else {
                    state.last_error = Some("No user is signed in".to_string());
                    return SmallVec::new();
                };

                let changes = Self::pending_changes(&session, &display_name, avatar_uri);
                if changes.is_empty() {
                    return self.reduce(state, AccountAction::ProfileUnchanged, env);
                }

                if let Err(error) = Self::begin(state) {
                    state.last_error = Some(error);
                    return SmallVec::new();
                }
                let env = env.clone();
                smallvec![Effect::future(async move {
                    Some(Self::save_profile(env, session, changes).await)
                })]
            },

            // ========== Results ==========
            AccountAction::SignedIn { session, greeting } => {
                Self::finish(state, None);
                state.session = Some(session);
                state.notice = Some(greeting);
                SmallVec::new()
            },
            AccountAction::SignedUp { session } => {
                Self::finish(state, None);
                state.session = Some(session);
                state.notice = Some("Account created successfully!".to_string());
                SmallVec::new()
            },
            AccountAction::SignedOut => {
                Self::finish(state, None);
                state.session = None;
                state.editing = false;
                state.notice = None;
                SmallVec::new()
            },
            AccountAction::ProfileUpdated { session } => {
                Self::finish(state, None);
                state.session = Some(session);
                state.editing = false;
                SmallVec::new()
            },
            AccountAction::ProfileUnchanged => {
                state.editing = false;
                SmallVec::new()
            },
            AccountAction::SignInFailed { reason }
            | AccountAction::SignUpFailed { reason }
            | AccountAction::SignOutFailed { reason }
            | AccountAction::ProfileUpdateFailed { reason } => {
                Self::finish(state, Some(reason));
                SmallVec::new()
            },
        }
    }
}
