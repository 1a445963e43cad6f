// web-server/src/auth/password.rs
use super::AuthError;

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;

/// bcrypt with a configurable cost factor
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        // bcrypt rejects costs outside 4..=31
        Self { cost: cost.clamp(MIN_COST, MAX_COST) }
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// A malformed hash never errors, it just fails to verify
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted() {
        let hasher = PasswordHasher::new(4);
        let first = hasher.hash("testpassword123").unwrap();
        let second = hasher.hash("testpassword123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("testpassword123", &first));
        assert!(hasher.verify("testpassword123", &second));
        assert!(!hasher.verify("wrongpassword", &first));
    }

    #[test]
    fn test_malformed_hash_returns_false() {
        let hasher = PasswordHasher::new(4);
        assert!(!hasher.verify("anything", "not-a-bcrypt-hash"));
        assert!(!hasher.verify("anything", ""));
    }

    #[test]
    fn test_cost_is_clamped() {
        let hasher = PasswordHasher::new(1);
        assert!(hasher.hash("pw").is_ok());
    }
}
