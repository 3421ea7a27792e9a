use anyhow::Context;
use axum::async_trait;
use users_shared::User;

use super::UserStore;
use crate::db::DbPool;

#[derive(Clone)]
pub struct PgUserStore {
    db: DbPool,
}

impl PgUserStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("find user {id}"))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> anyhow::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .context("insert user")
    }

    async fn update(&self, user: &User, username: &str, email: &str) -> anyhow::Result<()> {
        let result = sqlx::query("UPDATE users SET username = $1, email = $2 WHERE id = $3")
            .bind(username)
            .bind(email)
            .bind(user.id)
            .execute(&self.db)
            .await
            .with_context(|| format!("update user {}", user.id))?;

        if result.rows_affected() == 0 {
            anyhow::bail!("user {} no longer exists", user.id);
        }

        Ok(())
    }

    async fn delete(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete user {}", user.id))?;

        Ok(())
    }
}
