//! User management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use finbook_core::user::{NewUser, User, UserPatch};
use finbook_shared::types::UserId;

use crate::AppState;
use crate::error::{error_response, parse_id, require_text};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", put(update_user))
        .route("/users/{id}", delete(delete_user))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Email address, unique across users.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New email address.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
}

fn user_body(user: &User) -> Value {
    json!({
        "id": user.id.to_string(),
        "email": user.email,
        "name": user.name,
        "created_at": user.created_at.to_rfc3339(),
        "updated_at": user.updated_at.to_rfc3339(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/users` - Register a user.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> impl IntoResponse {
    if let Err(response) = require_text(&payload.email, "email") {
        return response;
    }
    if let Err(response) = require_text(&payload.name, "name") {
        return response;
    }

    match state
        .users
        .create(NewUser {
            email: payload.email,
            name: payload.name,
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "User registered");
            (StatusCode::CREATED, Json(json!({ "user": user_body(&user) }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/users` - List all users.
async fn list_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.users.list().await {
        Ok(users) => {
            let body: Vec<Value> = users.iter().map(user_body).collect();
            (StatusCode::OK, Json(json!({ "users": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/users/{id}` - Fetch one user.
async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: UserId = match parse_id(&id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.users.get(id).await {
        Ok(user) => (StatusCode::OK, Json(json!({ "user": user_body(&user) }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/users/{id}` - Update a user.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> impl IntoResponse {
    let id: UserId = match parse_id(&id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Some(email) = &payload.email
        && let Err(response) = require_text(email, "email")
    {
        return response;
    }
    if let Some(name) = &payload.name
        && let Err(response) = require_text(name, "name")
    {
        return response;
    }

    let patch = UserPatch {
        email: payload.email,
        name: payload.name,
    };

    match state.users.update(id, patch).await {
        Ok(user) => {
            info!(user_id = %user.id, "User updated");
            (StatusCode::OK, Json(json!({ "user": user_body(&user) }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/users/{id}` - Delete a user.
async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: UserId = match parse_id(&id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.users.delete(id).await {
        Ok(()) => {
            info!(user_id = %id, "User deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}
