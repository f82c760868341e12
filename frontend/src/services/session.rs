use gloo::storage::errors::StorageError;
use gloo::storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use yew::prelude::*;

/// Storage key holding the signed-in user.
pub const SESSION_KEY: &str = "session";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[serde(other)]
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Read the signed-in user written by the auth flow, if any.
pub fn load_session() -> Option<CurrentUser> {
    match LocalStorage::get::<CurrentUser>(SESSION_KEY) {
        Ok(user) => Some(user),
        Err(StorageError::KeyNotFound(_)) => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable session: {}", e);
            None
        }
    }
}

/// Current user from the surrounding session context.
#[hook]
pub fn use_session() -> Option<CurrentUser> {
    use_context::<Option<CurrentUser>>().flatten()
}
