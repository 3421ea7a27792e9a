use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::users as user_handlers;
use crate::store::UserStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub config: Config,
}

pub fn create_router(store: Arc<dyn UserStore>, config: Config) -> Router {
    let state = AppState { store, config };

    let user_routes = Router::new()
        .route(
            "/",
            get(user_handlers::list_users).post(user_handlers::create_user),
        )
        .route(
            "/:id",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/users", user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
