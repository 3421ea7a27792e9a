use std::collections::BTreeMap;

use axum::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use users_shared::User;

use super::UserStore;

#[derive(Default)]
struct Inner {
    last_id: i32,
    users: BTreeMap<i32, User>,
}

/// Process-local store used with `USER_STORE=memory` and in tests.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> anyhow::Result<User> {
        let mut inner = self.inner.write().await;
        // Same guarantee as the UNIQUE constraint on the postgres table.
        if inner.users.values().any(|u| u.email == email) {
            anyhow::bail!("duplicate email {email:?}");
        }

        inner.last_id += 1;
        let user = User {
            id: inner.last_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.map(str::to_string),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: &User, username: &str, email: &str) -> anyhow::Result<()> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.email == email && u.id != user.id)
        {
            anyhow::bail!("duplicate email {email:?}");
        }

        let Some(stored) = inner.users.get_mut(&user.id) else {
            anyhow::bail!("user {} no longer exists", user.id);
        };
        stored.username = username.to_string();
        stored.email = email.to_string();
        Ok(())
    }

    async fn delete(&self, user: &User) -> anyhow::Result<()> {
        self.inner.write().await.users.remove(&user.id);
        Ok(())
    }
}
