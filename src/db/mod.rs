mod memory;
mod users;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::User;

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Persistence for user accounts. The auth flows only read a user by email
/// and write back a new password hash.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Replace the user's hash and persist it.
    async fn update_password(&self, user: &mut User, password_hash: String) -> Result<(), AppError>;

    async fn insert(&self, user: User) -> Result<User, AppError>;
}
