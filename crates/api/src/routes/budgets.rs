//! Budget management routes.

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

use finbook_core::budget::{Budget, BudgetPatch, BudgetSummary, NewBudget};
use finbook_shared::AppError;
use finbook_shared::types::{BudgetId, UserId};

use crate::AppState;
use crate::error::{error_response, parse_amount, parse_day, parse_id, require_text};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", post(create_budget))
        .route("/budgets", get(list_budgets))
        .route("/budgets/summary", get(budget_summary))
        .route("/budgets/{id}", get(get_budget))
        .route("/budgets/{id}", put(update_budget))
        .route("/budgets/{id}", delete(delete_budget))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
pub struct CreateBudgetRequest {
    /// Owning user id.
    pub user_id: String,
    /// Spending category the budget caps.
    pub category: String,
    /// First day of the period, `YYYY-MM-DD`.
    pub period_start: String,
    /// Last day of the period, `YYYY-MM-DD`.
    pub period_end: String,
    /// Spending limit as a decimal string.
    pub limit_amount: String,
}

/// Request body for updating a budget.
#[derive(Debug, Deserialize)]
pub struct UpdateBudgetRequest {
    /// New category.
    pub category: Option<String>,
    /// New period start, `YYYY-MM-DD`.
    pub period_start: Option<String>,
    /// New period end, `YYYY-MM-DD`.
    pub period_end: Option<String>,
    /// New spending limit as a decimal string.
    pub limit_amount: Option<String>,
}

/// Query parameters scoping budgets to a user.
#[derive(Debug, Deserialize)]
pub struct BudgetListQuery {
    /// Owning user id.
    pub user_id: Option<String>,
}

fn budget_body(budget: &Budget) -> Value {
    json!({
        "id": budget.id.to_string(),
        "user_id": budget.user_id.to_string(),
        "category": budget.category,
        "period_start": budget.period_start,
        "period_end": budget.period_end,
        "limit_amount": budget.limit_amount.to_string(),
        "amount_spent": budget.amount_spent.to_string(),
        "remaining": budget.remaining().to_string(),
        "status": budget.status(),
        "created_at": budget.created_at.to_rfc3339(),
        "updated_at": budget.updated_at.to_rfc3339(),
    })
}

fn summary_body(summary: &BudgetSummary) -> Value {
    json!({
        "budget_id": summary.budget_id.to_string(),
        "category": summary.category,
        "period_start": summary.period_start,
        "period_end": summary.period_end,
        "limit_amount": summary.limit_amount.to_string(),
        "amount_spent": summary.amount_spent.to_string(),
        "remaining": summary.remaining.to_string(),
        "status": summary.status,
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

/// POST `/budgets` - Create a budget.
async fn create_budget(
    State(state): State<AppState>,
    Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
    let user_id: UserId = match parse_id(&payload.user_id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };
    if let Err(response) = require_text(&payload.category, "category") {
        return response;
    }
    let period_start = match parse_day(&payload.period_start, "period_start") {
        Ok(day) => day,
        Err(response) => return response,
    };
    let period_end = match parse_day(&payload.period_end, "period_end") {
        Ok(day) => day,
        Err(response) => return response,
    };
    let limit_amount = match parse_amount(&payload.limit_amount, "limit_amount") {
        Ok(amount) => amount,
        Err(response) => return response,
    };
    if limit_amount <= Decimal::ZERO {
        return error_response(&AppError::Validation(
            "limit_amount must be positive".to_string(),
        ));
    }

    match state
        .budgets
        .create(NewBudget {
            user_id,
            category: payload.category,
            period_start,
            period_end,
            limit_amount,
        })
        .await
    {
        Ok(budget) => {
            info!(
                budget_id = %budget.id,
                user_id = %budget.user_id,
                category = %budget.category,
                "Budget created"
            );
            (
                StatusCode::CREATED,
                Json(json!({ "budget": budget_body(&budget) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/budgets?user_id=` - List a user's budgets.
async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<BudgetListQuery>,
) -> impl IntoResponse {
    let user_id = match required_user_id(query.user_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.budgets.list(user_id).await {
        Ok(budgets) => {
            let body: Vec<Value> = budgets.iter().map(budget_body).collect();
            (StatusCode::OK, Json(json!({ "budgets": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/budgets/summary?user_id=` - Per-budget spending overview.
async fn budget_summary(
    State(state): State<AppState>,
    Query(query): Query<BudgetListQuery>,
) -> impl IntoResponse {
    let user_id = match required_user_id(query.user_id.as_deref()) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.budgets.summarize(user_id).await {
        Ok(summaries) => {
            let body: Vec<Value> = summaries.iter().map(summary_body).collect();
            (StatusCode::OK, Json(json!({ "summaries": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/budgets/{id}` - Fetch one budget.
async fn get_budget(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: BudgetId = match parse_id(&id, "budget") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.budgets.get(id).await {
        Ok(budget) => (
            StatusCode::OK,
            Json(json!({ "budget": budget_body(&budget) })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/budgets/{id}` - Update a budget.
///
/// Changes are merged as-is; the period-collision check runs at
/// creation only.
async fn update_budget(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
    let id: BudgetId = match parse_id(&id, "budget") {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Some(category) = &payload.category
        && let Err(response) = require_text(category, "category")
    {
        return response;
    }
    let period_start = match payload.period_start.as_deref() {
        Some(raw) => match parse_day(raw, "period_start") {
            Ok(day) => Some(day),
            Err(response) => return response,
        },
        None => None,
    };
    let period_end = match payload.period_end.as_deref() {
        Some(raw) => match parse_day(raw, "period_end") {
            Ok(day) => Some(day),
            Err(response) => return response,
        },
        None => None,
    };
    let limit_amount = match payload.limit_amount.as_deref() {
        Some(raw) => match parse_amount(raw, "limit_amount") {
            Ok(amount) if amount > Decimal::ZERO => Some(amount),
            Ok(_) => {
                return error_response(&AppError::Validation(
                    "limit_amount must be positive".to_string(),
                ));
            }
            Err(response) => return response,
        },
        None => None,
    };

    let patch = BudgetPatch {
        category: payload.category,
        period_start,
        period_end,
        limit_amount,
    };

    match state.budgets.update(id, patch).await {
        Ok(budget) => {
            info!(budget_id = %budget.id, "Budget updated");
            (
                StatusCode::OK,
                Json(json!({ "budget": budget_body(&budget) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/budgets/{id}` - Delete a budget.
async fn delete_budget(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let id: BudgetId = match parse_id(&id, "budget") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.budgets.delete(id).await {
        Ok(()) => {
            info!(budget_id = %id, "Budget deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}
