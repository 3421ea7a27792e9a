mod memory;
mod postgres;

use axum::async_trait;
use users_shared::User;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// Persistence for user records.
///
/// Ids are assigned on insert, increase monotonically and are never reused.
/// `find_all` returns users in ascending id order.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> anyhow::Result<User>;
    async fn update(&self, user: &User, username: &str, email: &str) -> anyhow::Result<()>;
    async fn delete(&self, user: &User) -> anyhow::Result<()>;
}
