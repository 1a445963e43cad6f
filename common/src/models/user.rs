// common/src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed role set. Serialized with the names the frontend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "admin")]
    Administrator,
    #[serde(rename = "operator")]
    Operator,
    #[serde(rename = "auditor")]
    Auditor,
    #[serde(rename = "read-only")]
    ReadOnly,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Administrator, Role::Operator, Role::Auditor, Role::ReadOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrator => "admin",
            Role::Operator => "operator",
            Role::Auditor => "auditor",
            Role::ReadOnly => "read-only",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::ReadOnly
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User as returned by the API. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Credential store entry
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        record.user.clone()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_names() {
        for role in Role::ALL {
            let encoded = serde_json::to_value(role).unwrap();
            assert_eq!(encoded, serde_json::Value::String(role.as_str().to_string()));
            let decoded: Role = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, role);
        }
        assert!(serde_json::from_str::<Role>("\"superuser\"").is_err());
    }

    #[test]
    fn test_user_create_defaults_to_read_only() {
        let create: UserCreate = serde_json::from_str(
            r#"{"username":"bob","email":"bob@example.com","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(create.role, Role::ReadOnly);
        assert!(create.full_name.is_none());
    }
}
