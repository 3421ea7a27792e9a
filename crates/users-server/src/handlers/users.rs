use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::instrument;
use users_shared::{api::MessageResponse, User};

use crate::error::AppError;
use crate::password::hash_password;
use crate::routes::AppState;
use crate::validation::{validate_create, validate_update, ValidationErrors};

type JsonBody = Result<Json<Value>, JsonRejection>;

/// Unreadable bodies fail validation like any other malformed payload.
fn read_body(payload: JsonBody) -> Result<Value, AppError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(%rejection, "rejected request body");
        ValidationErrors::body(rejection.body_text()).into()
    })
}

/// Ids that are not integers, or do not fit the id column, match no user.
fn parse_user_id(raw: &str) -> Result<i32, AppError> {
    raw.parse().map_err(|_| AppError::user_not_found(raw))
}

async fn find_user(state: &AppState, user_id: i32) -> Result<User, AppError> {
    state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(user_id))
}

/// POST /users
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: JsonBody,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let body = read_body(payload)?;
    let req = validate_create(&body, state.config.require_password)?;

    if state.store.find_by_email(&req.email).await?.is_some() {
        tracing::debug!(email = %req.email, "email already registered");
        return Err(AppError::duplicate_email());
    }

    let password_hash = req.password.as_deref().map(hash_password).transpose()?;
    let user = state
        .store
        .insert(&req.username, &req.email, password_hash.as_deref())
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "user created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new(format!("{} was added!", user.email))),
    ))
}

/// GET /users
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.store.find_all().await?))
}

/// GET /users/:id
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user_id = parse_user_id(&raw_id)?;
    Ok(Json(find_user(&state, user_id).await?))
}

/// PUT /users/:id
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: JsonBody,
) -> Result<Json<MessageResponse>, AppError> {
    let body = read_body(payload)?;
    let req = validate_update(&body)?;

    let user_id = parse_user_id(&raw_id)?;
    let user = find_user(&state, user_id).await?;

    // Keeping one's own email is not a conflict.
    if let Some(owner) = state.store.find_by_email(&req.email).await? {
        if owner.id != user.id {
            tracing::debug!(user_id, owner_id = owner.id, "email held by another user");
            return Err(AppError::duplicate_email());
        }
    }

    state.store.update(&user, &req.username, &req.email).await?;

    tracing::info!(user_id, email = %req.email, "user updated");

    Ok(Json(MessageResponse::new(format!("{user_id} was updated!"))))
}

/// DELETE /users/:id
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id = parse_user_id(&raw_id)?;
    let user = find_user(&state, user_id).await?;

    state.store.delete(&user).await?;

    tracing::info!(user_id, email = %user.email, "user removed");

    Ok(Json(MessageResponse::new(format!("{} was removed!", user.email))))
}
