// web-server/src/auth/service.rs
use common::models::user::User;
use common::{AuthConfig, TokenError, TokenService};

use super::{require_active, AuthError, PasswordHasher, UserStore};

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::InvalidOrExpired => AuthError::InvalidOrExpired,
            other => AuthError::Token(other.to_string()),
        }
    }
}

/// Login and bearer-token resolution on top of the credential store
#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    tokens: TokenService,
    /// Verified against on unknown usernames so every failed login costs one bcrypt run
    decoy_hash: String,
}

impl AuthService {
    pub fn new(users: UserStore, tokens: TokenService) -> Self {
        let decoy_hash = users.hasher().hash("saltshark-decoy").unwrap_or_else(|e| {
            tracing::warn!("Could not prepare decoy password hash: {}", e);
            String::new()
        });
        Self { users, tokens, decoy_hash }
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost);
        let users = UserStore::seeded(hasher, &config.admin_password)?;
        let tokens = TokenService::from_config(config)?;
        Ok(Self::new(users, tokens))
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Verify credentials and issue a token. Unknown user, wrong password and
    /// inactive account all fail the same way.
    pub fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let record = match self.users.find(username) {
            Some(record) => record,
            None => {
                self.users.hasher().verify(password, &self.decoy_hash);
                tracing::info!("Login failed for unknown user");
                return Err(AuthError::BadCredentials);
            }
        };

        if !self.users.hasher().verify(password, &record.password_hash) || !record.user.is_active {
            tracing::info!("Login failed for {}", username);
            return Err(AuthError::BadCredentials);
        }

        let token = self.tokens.issue(&record.user.username)?;
        tracing::info!("User {} logged in", username);
        Ok(token)
    }

    /// Resolve a bearer token to the user it names, as the store has it now
    pub fn current_user(&self, token: &str) -> Result<User, AuthError> {
        let username = self.tokens.validate(token)?;

        self.users
            .find(&username)
            .map(|record| record.user)
            .ok_or(AuthError::Unauthenticated)
    }

    /// `current_user` that also rejects deactivated accounts
    pub fn current_active_user(&self, token: &str) -> Result<User, AuthError> {
        require_active(self.current_user(token)?)
    }
}
