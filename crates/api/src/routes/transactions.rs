//! Transaction routes: posting, search, and totals.

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

use finbook_core::transaction::{
    NewTransaction, SortField, SortOrder, Transaction, TransactionKind, TransactionPatch,
    TransactionQuery,
};
use finbook_shared::AppError;
use finbook_shared::types::{AccountId, GoalId, TransactionId, UserId};

use crate::AppState;
use crate::error::{error_response, parse_amount, parse_id, parse_timestamp, require_text};

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction))
        .route("/transactions", get(list_transactions))
        .route("/transactions/search", get(search_transactions))
        .route("/transactions/totals", get(transaction_totals))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}", put(update_transaction))
        .route("/transactions/{id}", delete(delete_transaction))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for posting a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Posting user id.
    pub user_id: String,
    /// Affected account id.
    pub account_id: String,
    /// Amount as a decimal string.
    pub amount: String,
    /// Kind: "income", "expense" or "transfer".
    pub kind: String,
    /// Spending category.
    pub category: Option<String>,
    /// Goal this posting contributes to.
    pub goal_id: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Event timestamp (RFC 3339); defaults to now.
    pub date: Option<String>,
}

/// Request body for editing a transaction record.
///
/// `category` distinguishes "leave unchanged" (field absent) from
/// "clear" (explicit null).
#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    /// New amount as a decimal string.
    pub amount: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New category; null clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
    /// Replacement tag set.
    pub tags: Option<Vec<String>>,
    /// New event timestamp (RFC 3339).
    pub date: Option<String>,
}

/// Query parameters scoping transactions to a user.
#[derive(Debug, Deserialize)]
pub struct TransactionListQuery {
    /// Posting user id.
    pub user_id: Option<String>,
}

/// Query parameters for transaction search.
///
/// Everything arrives as strings so malformed values produce a 422
/// instead of a rejected extraction.
#[derive(Debug, Deserialize)]
pub struct SearchTransactionsQuery {
    /// Posting user id.
    pub user_id: Option<String>,
    /// Earliest event timestamp (RFC 3339), inclusive.
    pub from: Option<String>,
    /// Latest event timestamp (RFC 3339), inclusive.
    pub to: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Smallest amount, inclusive.
    pub min_amount: Option<String>,
    /// Largest amount, inclusive.
    pub max_amount: Option<String>,
    /// Comma-separated tags the transaction must all carry.
    pub tags: Option<String>,
    /// Sort field: "date" (default) or "amount".
    pub sort_by: Option<String>,
    /// Sort direction: "asc" or "desc" (default).
    pub order: Option<String>,
}

fn tx_body(tx: &Transaction) -> Value {
    json!({
        "id": tx.id.to_string(),
        "user_id": tx.user_id.to_string(),
        "account_id": tx.account_id.to_string(),
        "amount": tx.amount.to_string(),
        "kind": tx.kind,
        "category": tx.category,
        "goal_id": tx.goal_id.map(|id| id.to_string()),
        "description": tx.description,
        "tags": tx.tags,
        "date": tx.date.to_rfc3339(),
        "created_at": tx.created_at.to_rfc3339(),
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/transactions` - Post a transaction.
///
/// Runs the full posting pipeline: balance effect, budget tracking and
/// goal contribution in one request.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let user_id: UserId = match parse_id(&payload.user_id, "user") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let account_id: AccountId = match parse_id(&payload.account_id, "account") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let amount = match parse_amount(&payload.amount, "amount") {
        Ok(amount) => amount,
        Err(response) => return response,
    };
    let Some(kind) = string_to_kind(&payload.kind) else {
        return error_response(&AppError::Validation(
            "kind must be one of income, expense, transfer".to_string(),
        ));
    };
    if let Some(category) = &payload.category
        && let Err(response) = require_text(category, "category")
    {
        return response;
    }
    let goal_id: Option<GoalId> = match payload.goal_id.as_deref() {
        Some(raw) => match parse_id(raw, "goal") {
            Ok(id) => Some(id),
            Err(response) => return response,
        },
        None => None,
    };
    if let Some(description) = &payload.description
        && let Err(response) = require_text(description, "description")
    {
        return response;
    }
    let date = match payload.date.as_deref() {
        Some(raw) => match parse_timestamp(raw, "date") {
            Ok(date) => Some(date),
            Err(response) => return response,
        },
        None => None,
    };

    match state
        .transactions
        .create(NewTransaction {
            user_id,
            account_id,
            amount,
            kind,
            category: payload.category,
            goal_id,
            description: payload.description.unwrap_or_default(),
            tags: payload.tags,
            date,
        })
        .await
    {
        Ok(tx) => {
            info!(
                transaction_id = %tx.id,
                account_id = %tx.account_id,
                amount = %tx.amount,
                kind = ?tx.kind,
                "Transaction posted"
            );
            (
                StatusCode::CREATED,
                Json(json!({ "transaction": tx_body(&tx) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/transactions?user_id=` - List a user's transactions, newest first.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
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

    match state.transactions.list(user_id).await {
        Ok(transactions) => {
            let body: Vec<Value> = transactions.iter().map(tx_body).collect();
            (StatusCode::OK, Json(json!({ "transactions": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/transactions/search` - Search a user's transactions.
///
/// Criteria combine conjunctively; ranges are inclusive on both ends
/// and tag matching requires every queried tag to be present.
async fn search_transactions(
    State(state): State<AppState>,
    Query(query): Query<SearchTransactionsQuery>,
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

    let mut criteria = TransactionQuery::default();
    if let Some(raw) = query.from.as_deref() {
        match parse_timestamp(raw, "from") {
            Ok(from) => criteria.from = Some(from),
            Err(response) => return response,
        }
    }
    if let Some(raw) = query.to.as_deref() {
        match parse_timestamp(raw, "to") {
            Ok(to) => criteria.to = Some(to),
            Err(response) => return response,
        }
    }
    criteria.category = query.category;
    if let Some(raw) = query.min_amount.as_deref() {
        match parse_amount(raw, "min_amount") {
            Ok(amount) => criteria.min_amount = Some(amount),
            Err(response) => return response,
        }
    }
    if let Some(raw) = query.max_amount.as_deref() {
        match parse_amount(raw, "max_amount") {
            Ok(amount) => criteria.max_amount = Some(amount),
            Err(response) => return response,
        }
    }
    if let Some(raw) = query.tags.as_deref() {
        criteria.tags = raw
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToOwned::to_owned)
            .collect();
    }
    if let Some(raw) = query.sort_by.as_deref() {
        let Some(field) = string_to_sort_field(raw) else {
            return error_response(&AppError::Validation(
                "sort_by must be one of date, amount".to_string(),
            ));
        };
        criteria.sort_by = field;
    }
    if let Some(raw) = query.order.as_deref() {
        let Some(order) = string_to_order(raw) else {
            return error_response(&AppError::Validation(
                "order must be one of asc, desc".to_string(),
            ));
        };
        criteria.order = order;
    }

    match state.transactions.search(user_id, &criteria).await {
        Ok(transactions) => {
            let body: Vec<Value> = transactions.iter().map(tx_body).collect();
            (StatusCode::OK, Json(json!({ "transactions": body }))).into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// GET `/transactions/totals?user_id=` - Income and expense totals.
///
/// Transfers count into the expense bucket.
async fn transaction_totals(
    State(state): State<AppState>,
    Query(query): Query<TransactionListQuery>,
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

    match state.transactions.totals(user_id).await {
        Ok(totals) => (
            StatusCode::OK,
            Json(json!({
                "totals": {
                    "income": totals.income.to_string(),
                    "expense": totals.expense.to_string(),
                }
            })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// GET `/transactions/{id}` - Fetch one transaction.
async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id: TransactionId = match parse_id(&id, "transaction") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.transactions.get(id).await {
        Ok(tx) => (
            StatusCode::OK,
            Json(json!({ "transaction": tx_body(&tx) })),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// PUT `/transactions/{id}` - Edit a transaction record.
///
/// Changes the record only; posting side effects are not replayed.
async fn update_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTransactionRequest>,
) -> impl IntoResponse {
    let id: TransactionId = match parse_id(&id, "transaction") {
        Ok(id) => id,
        Err(response) => return response,
    };
    let amount = match payload.amount.as_deref() {
        Some(raw) => match parse_amount(raw, "amount") {
            Ok(amount) => Some(amount),
            Err(response) => return response,
        },
        None => None,
    };
    if let Some(Some(category)) = &payload.category
        && let Err(response) = require_text(category, "category")
    {
        return response;
    }
    let date = match payload.date.as_deref() {
        Some(raw) => match parse_timestamp(raw, "date") {
            Ok(date) => Some(date),
            Err(response) => return response,
        },
        None => None,
    };

    let patch = TransactionPatch {
        amount,
        description: payload.description,
        category: payload.category,
        tags: payload.tags,
        date,
    };

    match state.transactions.update(id, patch).await {
        Ok(tx) => {
            info!(transaction_id = %tx.id, "Transaction updated");
            (
                StatusCode::OK,
                Json(json!({ "transaction": tx_body(&tx) })),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

/// DELETE `/transactions/{id}` - Delete a transaction record.
///
/// The record disappears; balances, budgets and goals keep the effects
/// it applied at posting time.
async fn delete_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id: TransactionId = match parse_id(&id, "transaction") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.transactions.delete(id).await {
        Ok(()) => {
            info!(transaction_id = %id, "Transaction deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => error_response(&e),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Deserializer for doubly-optional fields. A missing field stays
/// `None` via `#[serde(default)]`; a present field (including an
/// explicit null) lands in `Some`, so null maps to `Some(None)`.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn string_to_kind(s: &str) -> Option<TransactionKind> {
    match s.to_lowercase().as_str() {
        "income" => Some(TransactionKind::Income),
        "expense" => Some(TransactionKind::Expense),
        "transfer" => Some(TransactionKind::Transfer),
        _ => None,
    }
}

fn string_to_sort_field(s: &str) -> Option<SortField> {
    match s.to_lowercase().as_str() {
        "date" => Some(SortField::Date),
        "amount" => Some(SortField::Amount),
        _ => None,
    }
}

fn string_to_order(s: &str) -> Option<SortOrder> {
    match s.to_lowercase().as_str() {
        "asc" => Some(SortOrder::Asc),
        "desc" => Some(SortOrder::Desc),
        _ => None,
    }
}
