use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::User;

/// Process-local user store, keyed by email. Used when no database is
/// configured and by the test harness.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(email).map(|u| u.value().clone()))
    }

    async fn update_password(&self, user: &mut User, password_hash: String) -> Result<(), AppError> {
        let mut stored = self
            .users
            .get_mut(&user.email)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        stored.update_password(password_hash.clone());
        user.update_password(password_hash);
        Ok(())
    }

    async fn insert(&self, user: User) -> Result<User, AppError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::BadRequest(
                "Email is already registered".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_password_writes_through_to_stored_user() {
        let store = MemoryUserStore::new();
        let mut user = store
            .insert(User::new("a@x.com", "old-hash".to_string()))
            .await
            .unwrap();

        store
            .update_password(&mut user, "new-hash".to_string())
            .await
            .unwrap();

        assert_eq!(user.password_hash, "new-hash");
        let reloaded = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        store
            .insert(User::new("a@x.com", "h".to_string()))
            .await
            .unwrap();

        let err = store
            .insert(User::new("a@x.com", "h2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
