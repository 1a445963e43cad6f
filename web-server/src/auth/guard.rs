// web-server/src/auth/guard.rs
use common::models::user::{Role, User};

use super::AuthError;

pub fn require_active(user: User) -> Result<User, AuthError> {
    if user.is_active {
        Ok(user)
    } else {
        Err(AuthError::Inactive)
    }
}

pub fn require_role(user: User, allowed: &[Role]) -> Result<User, AuthError> {
    if allowed.contains(&user.role) {
        Ok(user)
    } else {
        tracing::warn!("{} ({}) denied, needs one of {:?}", user.username, user.role, allowed);
        Err(AuthError::Forbidden)
    }
}

/// Role set a route admits, used as the type parameter of `Authorized`
pub trait RolePolicy: 'static {
    const ALLOWED: &'static [Role];
}

pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const ALLOWED: &'static [Role] = &[Role::Administrator];
}

pub struct AdminOrOperator;

impl RolePolicy for AdminOrOperator {
    const ALLOWED: &'static [Role] = &[Role::Administrator, Role::Operator];
}

pub struct AdminOrAuditor;

impl RolePolicy for AdminOrAuditor {
    const ALLOWED: &'static [Role] = &[Role::Administrator, Role::Auditor];
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: Role, is_active: bool) -> User {
        User {
            id: "1".to_string(),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            full_name: None,
            role,
            is_active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_require_role_iff_member() {
        let sets: [&[Role]; 4] = [AdminOnly::ALLOWED, AdminOrOperator::ALLOWED, AdminOrAuditor::ALLOWED, &Role::ALL];

        for allowed in sets {
            for role in Role::ALL {
                let outcome = require_role(user(role, true), allowed);
                if allowed.contains(&role) {
                    assert_eq!(outcome.unwrap().role, role);
                } else {
                    assert_eq!(outcome.unwrap_err(), AuthError::Forbidden);
                }
            }
        }
    }

    #[test]
    fn test_empty_role_set_admits_nobody() {
        for role in Role::ALL {
            assert_eq!(require_role(user(role, true), &[]).unwrap_err(), AuthError::Forbidden);
        }
    }

    #[test]
    fn test_require_active() {
        assert!(require_active(user(Role::ReadOnly, true)).is_ok());
        assert_eq!(require_active(user(Role::Administrator, false)).unwrap_err(), AuthError::Inactive);
    }
}
