use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod db;
mod error;
mod handlers;
mod password;
mod routes;
mod store;
mod validation;

use crate::config::{Config, StoreKind};
use crate::store::{MemoryUserStore, PgUserStore, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;

    let store: Arc<dyn UserStore> = match config.store {
        StoreKind::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = db::create_pool(url, config.max_connections).await?;
            Arc::new(PgUserStore::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory user store, records are lost on shutdown");
            Arc::new(MemoryUserStore::new())
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_router(store, config);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "users_server=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
