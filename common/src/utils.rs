// Common Crate - utils.rs
// common/src/utils.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AuthConfig;

/// Setup tracing for consistent logging across the gateway.
/// `RUST_LOG` overrides the default `info` level.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Err(e) = fmt().with_env_filter(filter).try_init() {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, malformed token or past expiry; callers never learn which
    #[error("Could not validate credentials")]
    InvalidOrExpired,
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,       // username
    pub exp: usize,        // expiration time
    pub iat: usize,        // issued at time
}

/// Issues and validates the bearer tokens handed to browser clients.
/// Stateless: nothing is stored, so a token lives until its `exp`.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
    default_ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], algorithm: &str, default_ttl: Duration) -> Result<Self, TokenError> {
        let algorithm = parse_hmac_algorithm(algorithm)?;
        Ok(Self {
            algorithm,
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            default_ttl,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, TokenError> {
        Self::new(
            config.secret_key.as_bytes(),
            &config.algorithm,
            Duration::minutes(config.access_token_expire_minutes),
        )
    }

    /// Sign a token for `subject` that expires after the configured lifetime
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_ttl(subject, self.default_ttl)
    }

    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: subject.to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: (now + ttl).timestamp().max(0) as usize,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check signature and expiry, returning the subject
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let data = decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::InvalidOrExpired)?;

        // jsonwebtoken accepts exp == now; expiry must be strictly in the future
        if data.claims.exp as i64 <= Utc::now().timestamp() || data.claims.sub.is_empty() {
            return Err(TokenError::InvalidOrExpired);
        }

        Ok(data.claims.sub)
    }
}

fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, TokenError> {
    match name.to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        _ => Err(TokenError::UnsupportedAlgorithm(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(b"test-secret", "HS256", Duration::minutes(30)).unwrap()
    }

    #[test]
    fn test_issue_and_validate() {
        let tokens = service();
        let token = tokens.issue("admin").unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "admin");
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = service();
        let token = tokens.issue_with_ttl("admin", Duration::seconds(-5)).unwrap();
        assert_eq!(tokens.validate(&token), Err(TokenError::InvalidOrExpired));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let tokens = service();
        let token = tokens.issue("admin").unwrap();
        let forged_source = tokens.issue("root").unwrap();

        // splice the payload of one token onto the signature of another
        let parts: Vec<&str> = token.split('.').collect();
        let forged: Vec<&str> = forged_source.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged[1], parts[2]);
        assert_eq!(tokens.validate(&tampered), Err(TokenError::InvalidOrExpired));

        assert_eq!(tokens.validate("not-a-jwt"), Err(TokenError::InvalidOrExpired));
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let other = TokenService::new(b"other-secret", "HS256", Duration::minutes(30)).unwrap();
        let token = other.issue("admin").unwrap();
        assert_eq!(service().validate(&token), Err(TokenError::InvalidOrExpired));
    }

    #[test]
    fn test_algorithm_parsing() {
        assert!(TokenService::new(b"s", "hs512", Duration::minutes(1)).is_ok());
        assert_eq!(
            TokenService::new(b"s", "RS256", Duration::minutes(1)).unwrap_err(),
            TokenError::UnsupportedAlgorithm("RS256".to_string())
        );
    }
}
