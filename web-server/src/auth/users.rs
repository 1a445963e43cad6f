// web-server/src/auth/users.rs
use chrono::Utc;
use common::models::user::{Role, User, UserCreate, UserRecord, UserUpdate};
use std::sync::Arc;

use super::{AuthError, PasswordHasher};
use crate::error::{ApiError, ApiResult};
use crate::store::{MemoryRepository, Repository};

pub const ADMIN_USERNAME: &str = "admin";

fn duplicate() -> ApiError {
    ApiError::BadRequest("Username already registered".to_string())
}

/// Credential store keyed by username, the only lookup key
#[derive(Clone)]
pub struct UserStore {
    records: Arc<dyn Repository<UserRecord>>,
    hasher: PasswordHasher,
}

impl UserStore {
    pub fn new(records: Arc<dyn Repository<UserRecord>>, hasher: PasswordHasher) -> Self {
        Self { records, hasher }
    }

    /// In-memory store holding the single seeded administrator
    pub fn seeded(hasher: PasswordHasher, admin_password: &str) -> Result<Self, AuthError> {
        let store = Self::new(Arc::new(MemoryRepository::new()), hasher);

        let admin = User {
            id: store.records.next_id(),
            username: ADMIN_USERNAME.to_string(),
            email: "admin@example.com".to_string(),
            full_name: Some("Administrator".to_string()),
            role: Role::Administrator,
            is_active: true,
            created_at: Utc::now(),
        };
        let password_hash = hasher.hash(admin_password)?;
        store.records.put(&admin.username.clone(), UserRecord { user: admin, password_hash });

        Ok(store)
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn find(&self, username: &str) -> Option<UserRecord> {
        self.records.get(username)
    }

    pub fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.records.list().into_iter().find(|record| record.user.id == id)
    }

    pub fn list(&self) -> Vec<User> {
        self.records.list().iter().map(User::from).collect()
    }

    /// Register a user; of two concurrent creates for one username exactly
    /// one succeeds
    pub fn create(&self, new_user: UserCreate) -> ApiResult<User> {
        if self.records.get(&new_user.username).is_some() {
            return Err(duplicate());
        }

        let password_hash = self.hasher.hash(&new_user.password)?;
        let user = User {
            id: self.records.next_id(),
            username: new_user.username,
            email: new_user.email,
            full_name: new_user.full_name,
            role: new_user.role,
            is_active: true,
            created_at: Utc::now(),
        };
        self.records
            .insert_if_absent(&user.username, UserRecord { user: user.clone(), password_hash })
            .map_err(|_| duplicate())?;

        tracing::info!("Created user {} with role {}", user.username, user.role);
        Ok(user)
    }

    pub fn update(&self, user_id: &str, changes: UserUpdate) -> ApiResult<User> {
        let mut record = self.find_by_id(user_id).ok_or_else(|| ApiError::not_found("User"))?;

        if let Some(email) = changes.email {
            record.user.email = email;
        }
        if let Some(full_name) = changes.full_name {
            record.user.full_name = Some(full_name);
        }
        if let Some(role) = changes.role {
            record.user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            record.user.is_active = is_active;
        }
        if let Some(password) = changes.password {
            record.password_hash = self.hasher.hash(&password)?;
        }

        let user = record.user.clone();
        self.records.put(&user.username, record);
        Ok(user)
    }

    /// Delete by id; the acting user can never remove their own account
    pub fn delete(&self, user_id: &str, acting: &User) -> ApiResult<User> {
        if acting.id == user_id {
            return Err(ApiError::BadRequest("Cannot delete yourself".to_string()));
        }

        let record = self.find_by_id(user_id).ok_or_else(|| ApiError::not_found("User"))?;
        self.records.delete(&record.user.username);

        tracing::info!("Deleted user {}", record.user.username);
        Ok(record.user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> UserStore {
        UserStore::seeded(PasswordHasher::new(4), "admin123").unwrap()
    }

    fn new_user(username: &str, role: Role) -> UserCreate {
        UserCreate {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            full_name: None,
            password: "secret".to_string(),
            role,
        }
    }

    #[test]
    fn test_seeded_admin() {
        let store = store();
        let admin = store.find("admin").unwrap();
        assert_eq!(admin.user.role, Role::Administrator);
        assert!(admin.user.is_active);
        assert!(store.hasher().verify("admin123", &admin.password_hash));
    }

    #[test]
    fn test_duplicate_username_rejected() {
        let store = store();
        store.create(new_user("ops", Role::Operator)).unwrap();
        let err = store.create(new_user("ops", Role::Auditor)).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_concurrent_creates_of_one_username() {
        use std::sync::Barrier;
        use std::thread;

        for _ in 0..20 {
            let store = store();
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = [Role::Operator, Role::Auditor]
                .into_iter()
                .map(|role| {
                    let store = store.clone();
                    let barrier = barrier.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        store.create(new_user("dup", role))
                    })
                })
                .collect();
            let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            let created: Vec<&User> = outcomes.iter().filter_map(|o| o.as_ref().ok()).collect();
            assert_eq!(created.len(), 1);
            assert!(outcomes.iter().any(|o| matches!(o, Err(ApiError::BadRequest(_)))));
            assert_eq!(store.find("dup").unwrap().user.id, created[0].id);
        }
    }

    #[test]
    fn test_update_rehashes_password() {
        let store = store();
        let ops = store.create(new_user("ops", Role::Operator)).unwrap();

        let updated = store
            .update(
                &ops.id,
                UserUpdate {
                    password: Some("rotated".to_string()),
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.is_active);

        let record = store.find("ops").unwrap();
        assert!(store.hasher().verify("rotated", &record.password_hash));
        assert!(!store.hasher().verify("secret", &record.password_hash));

        assert!(matches!(
            store.update("999", UserUpdate::default()),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_self_delete_rejected_for_every_role() {
        let store = store();
        for (name, role) in [("a", Role::Administrator), ("o", Role::Operator), ("r", Role::ReadOnly)] {
            let user = store.create(new_user(name, role)).unwrap();
            assert!(matches!(store.delete(&user.id, &user), Err(ApiError::BadRequest(_))));
            assert!(store.find(name).is_some());
        }
    }

    #[test]
    fn test_delete_other_user() {
        let store = store();
        let admin = store.find("admin").unwrap().user;
        let ops = store.create(new_user("ops", Role::Operator)).unwrap();

        store.delete(&ops.id, &admin).unwrap();
        assert!(store.find("ops").is_none());
        assert!(matches!(store.delete(&ops.id, &admin), Err(ApiError::NotFound(_))));
    }
}
