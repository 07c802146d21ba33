use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::UserStore;
use crate::error::AppError;
use crate::models::User;

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_password(&self, user: &mut User, password_hash: String) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user.id)
            .bind(&password_hash)
            .execute(&self.pool)
            .await?;
        user.update_password(password_hash);
        Ok(())
    }

    async fn insert(&self, user: User) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, created_at)
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
