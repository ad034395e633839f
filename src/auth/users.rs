//! Fixed operator account table.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::PasswordHash;
use crate::error::RelayError;

/// Operator role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May list operator accounts.
    Admin,
    /// May control the LED.
    User,
}

/// One operator account.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Login name.
    pub username: String,
    /// Granted role.
    pub role: Role,
    password: PasswordHash,
}

impl UserRecord {
    /// Creates an account, hashing `password` under a fresh salt.
    #[must_use]
    pub fn new(username: impl Into<String>, password: &str, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
            password: PasswordHash::new(password),
        }
    }
}

/// Account listing entry; never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    /// Login name.
    pub username: String,
    /// Granted role.
    pub role: Role,
}

/// In-memory account table, fixed after startup.
#[derive(Debug)]
pub struct UserStore {
    users: Vec<UserRecord>,
    /// Checked against when the username is unknown, so both rejections
    /// cost one hash.
    decoy: PasswordHash,
}

impl UserStore {
    /// Creates a store holding the given accounts.
    #[must_use]
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            decoy: PasswordHash::new(""),
        }
    }

    /// Checks a username/password pair and returns the matching account.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] for an unknown user or a wrong
    /// password, with the same message in both cases.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&UserRecord, RelayError> {
        let user = self.users.iter().find(|u| u.username == username);
        let hash = user.map_or(&self.decoy, |u| &u.password);
        let verified = hash.verify(password);
        match user {
            Some(user) if verified => Ok(user),
            _ => Err(RelayError::Unauthorized(
                "invalid username or password".to_string(),
            )),
        }
    }

    /// Lists usernames and roles.
    #[must_use]
    pub fn summaries(&self) -> Vec<UserSummary> {
        self.users
            .iter()
            .map(|u| UserSummary {
                username: u.username.clone(),
                role: u.role,
            })
            .collect()
    }
}
