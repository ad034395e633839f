//! Operator login, session verification, and the admin-only listing.

use crate::auth::{Claims, Role, TokenSigner, UserRecord, UserStore, UserSummary};
use crate::config::RelayConfig;
use crate::error::RelayError;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginGrant {
    /// Signed session token.
    pub token: String,
    /// Authenticated username.
    pub username: String,
    /// Role embedded in the token.
    pub role: Role,
}

/// Operator guard: a fixed user table plus a token signer.
#[derive(Debug)]
pub struct AuthService {
    users: UserStore,
    signer: TokenSigner,
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

impl AuthService {
    /// Creates the service with its accounts and signer.
    #[must_use]
    pub fn new(users: UserStore, signer: TokenSigner) -> Self {
        Self { users, signer }
    }

    /// Builds the table with the single bootstrap admin from configuration.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        let admin = UserRecord::new(&*config.admin_username, &config.admin_password, Role::Admin);
        Self::new(
            UserStore::new(vec![admin]),
            TokenSigner::new(&config.session_secret, config.session_ttl),
        )
    }

    /// Checks credentials and issues a session token.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] on a wrong username or password.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginGrant, RelayError> {
        let user = match self.users.authenticate(username, password) {
            Ok(user) => user,
            Err(err) => {
                tracing::warn!(username, "operator login rejected");
                return Err(err);
            }
        };
        let token = self.signer.issue(&user.username, user.role, now_secs())?;
        tracing::info!(username = %user.username, role = ?user.role, "operator logged in");
        Ok(LoginGrant {
            token,
            username: user.username.clone(),
            role: user.role,
        })
    }

    /// Verifies a session token.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Unauthorized`] if the token is invalid or
    /// expired.
    pub fn authenticate(&self, token: &str) -> Result<Claims, RelayError> {
        self.signer.verify(token, now_secs())
    }

    /// Requires the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Forbidden`] for any other role.
    pub fn require_admin(claims: &Claims) -> Result<(), RelayError> {
        if claims.role == Role::Admin {
            Ok(())
        } else {
            Err(RelayError::Forbidden("admin role required".to_string()))
        }
    }

    /// Lists accounts (usernames and roles only) for an admin.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Forbidden`] unless `claims` carry the admin role.
    pub fn list_users(&self, claims: &Claims) -> Result<Vec<UserSummary>, RelayError> {
        Self::require_admin(claims)?;
        Ok(self.users.summaries())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn make_service() -> AuthService {
        let config = RelayConfig {
            admin_username: "admin".to_string(),
            admin_password: "letmein".to_string(),
            ..RelayConfig::default()
        };
        AuthService::from_config(&config)
    }

    #[test]
    fn login_token_carries_stored_role() {
        let service = make_service();
        let Ok(grant) = service.login("admin", "letmein") else {
            panic!("login should succeed");
        };
        assert_eq!(grant.role, Role::Admin);
        let Ok(claims) = service.authenticate(&grant.token) else {
            panic!("token should verify");
        };
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sub, "admin");
    }

    #[test]
    fn wrong_password_yields_unauthorized() {
        let service = make_service();
        assert!(matches!(
            service.login("admin", "letme1n"),
            Err(RelayError::Unauthorized(_))
        ));
    }

    #[test]
    fn listing_requires_admin() {
        let service = make_service();
        let user_claims = Claims {
            sub: "viewer".to_string(),
            role: Role::User,
            iat: 0,
            exp: i64::MAX,
        };
        assert!(matches!(
            service.list_users(&user_claims),
            Err(RelayError::Forbidden(_))
        ));

        let Ok(grant) = service.login("admin", "letmein") else {
            panic!("login should succeed");
        };
        let Ok(admin_claims) = service.authenticate(&grant.token) else {
            panic!("token should verify");
        };
        let Ok(users) = service.list_users(&admin_claims) else {
            panic!("admin may list users");
        };
        assert_eq!(users.len(), 1);
        let json = serde_json::to_string(&users).unwrap_or_default();
        assert!(!json.contains("letmein"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn token_from_other_deployment_is_rejected() {
        let service = make_service();
        let foreign = TokenSigner::new("someone-else", Duration::from_secs(60));
        let Ok(token) = foreign.issue("admin", Role::Admin, now_secs()) else {
            panic!("issue failed");
        };
        assert!(service.authenticate(&token).is_err());
    }
}
