use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.to_string(),
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn update_password(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }
}
