//! Account management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use finbook_core::account::{Account, AccountPatch, NewAccount};
use finbook_shared::AppError;
use finbook_shared::types::{AccountId, UserId};

use crate::AppState;
use crate::error::{error_response, parse_amount, parse_id, require_text};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account))
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}", get(get_account))
        .route("/accounts/{id}", put(update_account))
        .route("/accounts/{id}", delete(delete_account))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Owning user id.
    pub user_id: String,
    /// Account name.
    pub name: String,
    /// Opening balance as a decimal string; defaults to zero.
    pub initial_balance: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Deserialize)]
pub struct UpdateAccountRequest {
    /// New account name.
    pub name: Option<String>,
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Owning user id.
    pub user_id: Option<String>,
}

fn account_body(account: &Account) -> Value {
    json!({
        "id": account.id.to_string(),
        "user_id": account.user_id.to_string(),
        "name": account.name,
        "balance": account.balance.to_string(),
        "goal_locked_amount": account.goal_locked_amount.to_string(),
        "available": account.available().to_string(),
        "created_at": account.created_at.to_rfc3339(),
        "updated_at": account.updated_at.to_rfc3339(),
    })
}

fn required_user_id(raw: Option<&str>) -> Result<UserId, axum::response::Response> {
    let Some(raw) = raw else {
        return Err(error_response(&AppError::Validation(
            "user_id query parameter is required".to_string(),
        )));
    };
    parse_id(raw, "user")
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/accounts` - Open an account for a user.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let user_id: UserId = match parse_id(&payload.user_id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Err(response) = require_text(&payload.name, "name") {
        return response;
    }
    let initial_balance = match payload.initial_balance.as_deref() {
        Some(raw) => match parse_amount(raw, "initial_balance") {
            Ok(amount) => amount,
            Err(response) => return response,
        },
        None => rust_decimal::Decimal::ZERO,
    };

    match state
        .accounts
        .create(NewAccount {
            user_id,
            name: payload.name,
            initial_balance,
        })
        .await
    {
        Ok(account) => {
            info!(account_id = %account.id, user_id = %account.user_id, "Account opened");
            (
                StatusCode::CREATED,
                Json(json!({ "account": account_body(&account) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/accounts?user_id=` - List a user's accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let user_id = match required_user_id(query.user_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.accounts.list(user_id).await {
        Ok(accounts) => {
            let body: Vec<Value> = accounts.iter().map(account_body).collect();
            (StatusCode::OK, Json(json!({ "accounts": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/accounts/{id}` - Fetch one account.
async fn get_account(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: AccountId = match parse_id(&id, "account") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.accounts.get(id).await {
        Ok(account) => (
            StatusCode::OK,
            Json(json!({ "account": account_body(&account) })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/accounts/{id}` - Rename an account.
async fn update_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    let id: AccountId = match parse_id(&id, "account") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Some(name) = &payload.name
        && let Err(response) = require_text(name, "name")
    {
        return response;
    }

    match state
        .accounts
        .update(id, AccountPatch { name: payload.name })
        .await
    {
        Ok(account) => {
            info!(account_id = %account.id, "Account updated");
            (
                StatusCode::OK,
                Json(json!({ "account": account_body(&account) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/accounts/{id}` - Delete an account.
async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id: AccountId = match parse_id(&id, "account") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.accounts.delete(id).await {
        Ok(()) => {
            info!(account_id = %id, "Account deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}
