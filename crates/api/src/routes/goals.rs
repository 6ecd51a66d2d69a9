//! Savings goal routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use finbook_core::goal::{Goal, GoalPatch, NewGoal};
use finbook_shared::AppError;
use finbook_shared::types::{AccountId, GoalId, UserId};

use crate::AppState;
use crate::error::{error_response, parse_amount, parse_id, require_text};

/// Creates the goal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/goals", post(create_goal))
        .route("/goals", get(list_goals))
        .route("/goals/{id}", get(get_goal))
        .route("/goals/{id}", put(update_goal))
        .route("/goals/{id}", delete(delete_goal))
        .route("/goals/{id}/contributions", post(contribute))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a goal.
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    /// Owning user id.
    pub user_id: String,
    /// Funding account id.
    pub account_id: String,
    /// Goal name.
    pub name: String,
    /// Amount to reach, as a decimal string.
    pub target_amount: String,
    /// Starting progress as a decimal string; defaults to zero.
    pub initial_amount: Option<String>,
    /// Whether contributions reserve funds on the account.
    #[serde(default)]
    pub lock_funds: bool,
}

/// Request body for updating a goal.
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    /// New goal name.
    pub name: Option<String>,
    /// New target amount as a decimal string.
    pub target_amount: Option<String>,
}

/// Request body for a direct contribution.
#[derive(Debug, Deserialize)]
pub struct ContributionRequest {
    /// Contribution amount as a decimal string.
    pub amount: String,
}

/// Query parameters scoping goals to a user.
#[derive(Debug, Deserialize)]
pub struct GoalListQuery {
    /// Owning user id.
    pub user_id: Option<String>,
}

fn goal_body(goal: &Goal) -> Value {
    json!({
        "id": goal.id.to_string(),
        "user_id": goal.user_id.to_string(),
        "account_id": goal.account_id.to_string(),
        "name": goal.name,
        "target_amount": goal.target_amount.to_string(),
        "current_amount": goal.current_amount.to_string(),
        "status": goal.status,
        "lock_funds": goal.lock_funds,
        "reserved_amount": goal.reserved_amount.to_string(),
        "created_at": goal.created_at.to_rfc3339(),
        "updated_at": goal.updated_at.to_rfc3339(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/goals` - Create a savings goal.
async fn create_goal(
    State(state): State<AppState>,
    Json(payload): Json<CreateGoalRequest>,
) -> impl IntoResponse {
    let user_id: UserId = match parse_id(&payload.user_id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let account_id: AccountId = match parse_id(&payload.account_id, "account") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Err(response) = require_text(&payload.name, "name") {
        return response;
    }
    let target_amount = match parse_amount(&payload.target_amount, "target_amount") {
        Ok(amount) => amount,
        Err(response) => return response,
    };
    if target_amount <= Decimal::ZERO {
        return error_response(&AppError::Validation(
            "target_amount must be positive".to_string(),
        ));
    }
    let initial_amount = match payload.initial_amount.as_deref() {
        Some(raw) => match parse_amount(raw, "initial_amount") {
            Ok(amount) => amount,
            Err(response) => return response,
        },
        None => Decimal::ZERO,
    };
    if initial_amount < Decimal::ZERO {
        return error_response(&AppError::Validation(
            "initial_amount must not be negative".to_string(),
        ));
    }

    match state
        .goals
        .create(NewGoal {
            user_id,
            account_id,
            name: payload.name,
            target_amount,
            initial_amount,
            lock_funds: payload.lock_funds,
        })
        .await
    {
        Ok(goal) => {
            info!(
                goal_id = %goal.id,
                user_id = %goal.user_id,
                account_id = %goal.account_id,
                "Goal created"
            );
            (StatusCode::CREATED, Json(json!({ "goal": goal_body(&goal) }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/goals?user_id=` - List a user's goals.
async fn list_goals(
    State(state): State<AppState>,
    Query(query): Query<GoalListQuery>,
) -> impl IntoResponse {
    let Some(raw) = query.user_id.as_deref() else {
        return error_response(&AppError::Validation(
            "user_id query parameter is required".to_string(),
        ));
    };
    let user_id: UserId = match parse_id(raw, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.goals.list(user_id).await {
        Ok(goals) => {
            let body: Vec<Value> = goals.iter().map(goal_body).collect();
            (StatusCode::OK, Json(json!({ "goals": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/goals/{id}` - Fetch one goal.
async fn get_goal(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: GoalId = match parse_id(&id, "goal") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.goals.get(id).await {
        Ok(goal) => (StatusCode::OK, Json(json!({ "goal": goal_body(&goal) }))).into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/goals/{id}` - Rename or retarget a goal.
async fn update_goal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateGoalRequest>,
) -> impl IntoResponse {
    let id: GoalId = match parse_id(&id, "goal") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Some(name) = &payload.name
        && let Err(response) = require_text(name, "name")
    {
        return response;
    }
    let target_amount = match payload.target_amount.as_deref() {
        Some(raw) => match parse_amount(raw, "target_amount") {
            Ok(amount) if amount > Decimal::ZERO => Some(amount),
            Ok(_) => {
                return error_response(&AppError::Validation(
                    "target_amount must be positive".to_string(),
                ));
            }
            Err(response) => return response,
        },
        None => None,
    };

    let patch = GoalPatch {
        name: payload.name,
        target_amount,
    };

    match state.goals.update(id, patch).await {
        Ok(goal) => {
            info!(goal_id = %goal.id, "Goal updated");
            (StatusCode::OK, Json(json!({ "goal": goal_body(&goal) }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/goals/{id}` - Delete a goal, releasing any reservation.
async fn delete_goal(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: GoalId = match parse_id(&id, "goal") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.goals.delete(id).await {
        Ok(()) => {
            info!(goal_id = %id, "Goal deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// POST `/goals/{id}/contributions` - Contribute directly to a goal.
///
/// Runs the same engine as goal-bound transaction postings, without
/// recording a transaction.
async fn contribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ContributionRequest>,
) -> impl IntoResponse {
    let id: GoalId = match parse_id(&id, "goal") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let amount = match parse_amount(&payload.amount, "amount") {
        Ok(amount) => amount,
        Err(response) => return response,
    };

    match state.goals.apply_contribution(id, amount).await {
        Ok(goal) => {
            info!(goal_id = %goal.id, amount = %amount, status = ?goal.status, "Contribution recorded");
            (StatusCode::OK, Json(json!({ "goal": goal_body(&goal) }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}
