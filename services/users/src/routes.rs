//! User management service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::json;

use crate::{error::ApiError, models::UserWrite, state::AppState, validation};

/// Query parameters for the paged listing
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Create the router for the user management service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", post(upsert_user))
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id", put(update_user))
        .route("/users/:id", delete(delete_user))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "users-service"
    }))
}

/// Create or update a user
pub async fn upsert_user(
    State(state): State<AppState>,
    Json(mut payload): Json<UserWrite>,
) -> Result<impl IntoResponse, ApiError> {
    payload.email = payload.email.trim().to_string();
    validation::validate_user_write(&payload).map_err(ApiError::BadRequest)?;

    let creating = payload.id <= 0;
    let user = state.user_service.add_or_edit_user(payload).await?;

    let status = if creating {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(user)))
}

/// Update a user addressed by path identifier
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(mut payload): Json<UserWrite>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.id != id {
        return Err(ApiError::BadRequest(
            "Invalid user data or mismatched id".to_string(),
        ));
    }
    payload.id = id;

    payload.email = payload.email.trim().to_string();
    validation::validate_user_write(&payload).map_err(ApiError::BadRequest)?;

    let user = state.user_service.add_or_edit_user(payload).await?;

    Ok(Json(user))
}

/// Get a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_service
        .get_user_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(user))
}

/// Get all users, paged
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .user_service
        .get_all_users(params.page, params.page_size)
        .await?;

    Ok(Json(page))
}

/// Delete a user by ID
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.user_service.delete_user(id).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    Ok(Json(json!({ "deleted": true })))
}
