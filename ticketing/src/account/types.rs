//! Account data: sessions, stored user profiles and form input.

use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user as reported by the auth backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Backend user id
    pub uid: UserId,
    /// Sign-in email
    pub email: String,
    /// Name shown in the app
    pub display_name: Option<String>,
    /// Avatar URL
    pub photo_url: Option<String>,
}

/// Kind of account chosen at sign-up
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Organises events
    #[serde(rename = "Event Manager")]
    EventManager,
    /// Buys tickets
    #[default]
    #[serde(rename = "Regular User")]
    RegularUser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::EventManager => "Event Manager",
            Self::RegularUser => "Regular User",
        })
    }
}

/// Document stored under `users/{uid}`
///
/// Every field is optional on read; accounts created by older clients may
/// lack some of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Full name entered at sign-up
    #[serde(default)]
    pub full_name: Option<String>,
    /// Contact email
    #[serde(default)]
    pub email: Option<String>,
    /// Account kind
    #[serde(default)]
    pub role: Option<Role>,
    /// Organisation (event managers only)
    #[serde(default)]
    pub company_name: Option<String>,
    /// Free-text experience (event managers only)
    #[serde(default)]
    pub event_experience: Option<String>,
}

impl UserProfile {
    /// Collection holding user profiles
    pub const COLLECTION: &'static str = "users";

    /// Greeting shown after sign-in
    #[must_use]
    pub fn greeting(profile: Option<&Self>) -> String {
        match profile {
            Some(Self {
                role: Some(_),
                full_name,
                ..
            }) => format!("Welcome back, {}!", full_name.as_deref().unwrap_or_default()),
            _ => "Welcome back!".to_string(),
        }
    }
}

/// Sign-up screen input
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignUpForm {
    /// Sign-in email
    pub email: String,
    /// Password
    pub password: String,
    /// Password typed again
    pub confirm_password: String,
    /// Full name
    pub full_name: String,
    /// Whether the user registers as an event manager
    pub is_event_manager: bool,
    /// Organisation (kept only for event managers)
    pub company_name: String,
    /// Experience (kept only for event managers)
    pub event_experience: String,
    /// Local image picked as avatar
    pub avatar_uri: Option<String>,
}

impl SignUpForm {
    /// Checks required fields and password confirmation
    ///
    /// # Errors
    ///
    /// Returns the message to show when the form is incomplete or the
    /// passwords differ.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let required = [
            &self.email,
            &self.password,
            &self.confirm_password,
            &self.full_name,
        ];
        if required.iter().any(|field| field.is_empty()) {
            return Err("Please fill out all required fields.".to_string());
        }

        if self.password != self.confirm_password {
            return Err("Passwords do not match.".to_string());
        }

        Ok(())
    }

    /// Account kind selected on the form
    #[must_use]
    pub const fn role(&self) -> Role {
        if self.is_event_manager {
            Role::EventManager
        } else {
            Role::RegularUser
        }
    }

    /// Profile document written for the new account
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        let manager_only = |value: &str| self.is_event_manager.then(|| value.to_string());
        UserProfile {
            full_name: Some(self.full_name.clone()),
            email: Some(self.email.clone()),
            role: Some(self.role()),
            company_name: manager_only(&self.company_name),
            event_experience: manager_only(&self.event_experience),
        }
    }
}

/// Fields to change on the auth profile; `None` leaves a field as is
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    /// New display name
    pub display_name: Option<String>,
    /// New avatar URL
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Whether nothing would change
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none() && self.photo_url.is_none()
    }
}
