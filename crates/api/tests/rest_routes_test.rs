//! HTTP tests for user, account, budget and goal routes.
//!
//! Each test builds the full router over in-memory repositories and
//! drives it with `tower::ServiceExt::oneshot`, asserting on status
//! codes and JSON bodies the way a client would see them.

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

use finbook_api::{AppState, create_router};
use finbook_core::account::AccountService;
use finbook_core::budget::BudgetService;
use finbook_core::goal::GoalService;
use finbook_core::transaction::TransactionService;
use finbook_core::user::UserService;
use finbook_db::{
    MemoryAccountRepository, MemoryBudgetRepository, MemoryGoalRepository,
    MemoryTransactionRepository, MemoryUserRepository,
};

/// A 24-hex-char id that parses fine but matches nothing.
const MISSING_ID: &str = "ffffffffffffffffffffffff";

fn app() -> Router {
    let user_repo = Arc::new(MemoryUserRepository::new());
    let account_repo = Arc::new(MemoryAccountRepository::new());
    let budgets = Arc::new(BudgetService::new(Arc::new(MemoryBudgetRepository::new())));
    let goals = Arc::new(GoalService::new(
        Arc::new(MemoryGoalRepository::new()),
        account_repo.clone(),
    ));
    let transactions = Arc::new(TransactionService::new(
        Arc::new(MemoryTransactionRepository::new()),
        user_repo.clone(),
        account_repo.clone(),
        budgets.clone(),
        goals.clone(),
    ));
    let state = AppState {
        users: Arc::new(UserService::new(user_repo.clone())),
        accounts: Arc::new(AccountService::new(account_repo, user_repo)),
        budgets,
        goals,
        transactions,
    };
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("Failed to build request"),
        None => builder.body(Body::empty()).expect("Failed to build request"),
    };
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to drive router");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn del(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, None).await
}

/// Reads a decimal-string field, tolerant of trailing-zero differences.
fn amount(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("expected a decimal string"))
        .expect("expected a parseable decimal")
}

async fn seed_user(app: &Router, email: &str) -> String {
    let (status, body) = post(app, "/api/v1/users", json!({ "email": email, "name": "Dana" })).await;
    assert_eq!(status, StatusCode::CREATED);
    body["user"]["id"].as_str().expect("user id").to_string()
}

async fn seed_account(app: &Router, user_id: &str, balance: &str) -> String {
    let (status, body) = post(
        app,
        "/api/v1/accounts",
        json!({ "user_id": user_id, "name": "Checking", "initial_balance": balance }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["account"]["id"].as_str().expect("account id").to_string()
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_register_and_fetch_user() {
    let app = app();

    let (status, body) = post(
        &app,
        "/api/v1/users",
        json!({ "email": "dana@example.com", "name": "Dana" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "dana@example.com");
    assert_eq!(body["user"]["name"], "Dana");
    let id = body["user"]["id"].as_str().expect("user id").to_string();

    let (status, body) = get(&app, &format!("/api/v1/users/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "dana@example.com");

    let (status, body) = get(&app, "/api/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"].as_array().expect("users array").len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = app();
    seed_user(&app, "dana@example.com").await;

    let (status, body) = post(
        &app,
        "/api/v1/users",
        json!({ "email": "dana@example.com", "name": "Other" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_user_lookup_errors() {
    let app = app();

    let (status, body) = get(&app, "/api/v1/users/not-a-hex-id").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = get(&app, &format!("/api/v1/users/{MISSING_ID}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_and_delete_user() {
    let app = app();
    let id = seed_user(&app, "dana@example.com").await;

    let (status, body) = put(
        &app,
        &format!("/api/v1/users/{id}"),
        json!({ "name": "Dana Q." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Dana Q.");
    assert_eq!(body["user"]["email"], "dana@example.com");

    let (status, body) = put(&app, &format!("/api/v1/users/{id}"), json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = del(&app, &format!("/api/v1/users/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/api/v1/users/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_open_account_with_opening_balance() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    let (status, body) = post(
        &app,
        "/api/v1/accounts",
        json!({ "user_id": user_id, "name": "Savings", "initial_balance": "250.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["account"]["name"], "Savings");
    assert_eq!(amount(&body["account"]["balance"]), dec!(250));
    assert_eq!(amount(&body["account"]["goal_locked_amount"]), dec!(0));
    assert_eq!(amount(&body["account"]["available"]), dec!(250));

    let (status, body) = get(&app, &format!("/api/v1/accounts?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"].as_array().expect("accounts array").len(), 1);
}

#[tokio::test]
async fn test_account_requires_existing_user() {
    let app = app();

    let (status, body) = post(
        &app,
        "/api/v1/accounts",
        json!({ "user_id": MISSING_ID, "name": "Orphan" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_account_listing_requires_user_id() {
    let app = app();

    let (status, body) = get(&app, "/api/v1/accounts").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_rename_and_close_account() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "100.00").await;

    let (status, body) = put(
        &app,
        &format!("/api/v1/accounts/{account_id}"),
        json!({ "name": "Everyday" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["name"], "Everyday");

    let (status, _) = del(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Budgets
// ============================================================================

#[tokio::test]
async fn test_budget_lifecycle() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    let (status, body) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "2025-06-01",
            "period_end": "2025-06-30",
            "limit_amount": "400.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["budget"]["category"], "food");
    assert_eq!(body["budget"]["period_start"], "2025-06-01");
    assert_eq!(body["budget"]["period_end"], "2025-06-30");
    assert_eq!(amount(&body["budget"]["amount_spent"]), dec!(0));
    assert_eq!(amount(&body["budget"]["remaining"]), dec!(400));
    assert_eq!(body["budget"]["status"], "healthy");
    let id = body["budget"]["id"].as_str().expect("budget id").to_string();

    let (status, body) = get(&app, &format!("/api/v1/budgets?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["budgets"].as_array().expect("budgets array").len(), 1);

    let (status, body) = put(
        &app,
        &format!("/api/v1/budgets/{id}"),
        json!({ "limit_amount": "500.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["budget"]["limit_amount"]), dec!(500));

    let (status, _) = del(&app, &format!("/api/v1/budgets/{id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = get(&app, &format!("/api/v1/budgets/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_overlapping_budget_is_conflict() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    let june = json!({
        "user_id": user_id,
        "category": "food",
        "period_start": "2025-06-01",
        "period_end": "2025-06-30",
        "limit_amount": "400.00",
    });
    let (status, _) = post(&app, "/api/v1/budgets", june).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "2025-06-15",
            "period_end": "2025-07-15",
            "limit_amount": "300.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");

    // A different category may share the window.
    let (status, _) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "transport",
            "period_start": "2025-06-15",
            "period_end": "2025-07-15",
            "limit_amount": "300.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_inverted_budget_period_is_conflict() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    let (status, body) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "2025-07-01",
            "period_end": "2025-06-01",
            "limit_amount": "400.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_malformed_budget_input_rejected() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    let (status, body) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "June 1st",
            "period_end": "2025-06-30",
            "limit_amount": "400.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "2025-06-01",
            "period_end": "2025-06-30",
            "limit_amount": "400.005",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post(
        &app,
        "/api/v1/budgets",
        json!({
            "user_id": user_id,
            "category": "food",
            "period_start": "2025-06-01",
            "period_end": "2025-06-30",
            "limit_amount": "0",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_budget_summary_lists_per_category() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;

    for (category, limit) in [("food", "400.00"), ("transport", "150.00")] {
        let (status, _) = post(
            &app,
            "/api/v1/budgets",
            json!({
                "user_id": user_id,
                "category": category,
                "period_start": "2025-06-01",
                "period_end": "2025-06-30",
                "limit_amount": limit,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, &format!("/api/v1/budgets/summary?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    let summaries = body["summaries"].as_array().expect("summaries array");
    assert_eq!(summaries.len(), 2);
    for summary in summaries {
        assert_eq!(summary["status"], "healthy");
        assert_eq!(
            amount(&summary["remaining"]),
            amount(&summary["limit_amount"])
        );
    }
}

// ============================================================================
// Goals
// ============================================================================

#[tokio::test]
async fn test_goal_created_active_and_unfunded() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;

    let (status, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
            "lock_funds": true,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["goal"]["name"], "Vacation");
    assert_eq!(body["goal"]["status"], "active");
    assert_eq!(body["goal"]["lock_funds"], true);
    assert_eq!(amount(&body["goal"]["current_amount"]), dec!(0));
    assert_eq!(amount(&body["goal"]["reserved_amount"]), dec!(0));

    let (status, body) = get(&app, &format!("/api/v1/goals?user_id={user_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goals"].as_array().expect("goals array").len(), 1);
}

#[tokio::test]
async fn test_goal_input_validation() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;

    let (status, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "0",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "",
            "target_amount": "600.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": "not-an-id",
            "name": "Vacation",
            "target_amount": "600.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_goal_requires_owned_account() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    seed_account(&app, &user_id, "1000.00").await;
    let other_user = seed_user(&app, "rival@example.com").await;
    let other_account = seed_account(&app, &other_user, "500.00").await;

    let (status, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": MISSING_ID,
            "name": "Vacation",
            "target_amount": "600.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": other_account,
            "name": "Vacation",
            "target_amount": "600.00",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");
}

#[tokio::test]
async fn test_locked_contribution_reserves_account_funds() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;
    let (_, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
            "lock_funds": true,
        }),
    )
    .await;
    let goal_id = body["goal"]["id"].as_str().expect("goal id").to_string();

    let (status, body) = post(
        &app,
        &format!("/api/v1/goals/{goal_id}/contributions"),
        json!({ "amount": "250.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(amount(&body["goal"]["current_amount"]), dec!(250));
    assert_eq!(amount(&body["goal"]["reserved_amount"]), dec!(250));
    assert_eq!(body["goal"]["status"], "active");

    // The balance is untouched; only availability shrinks.
    let (_, body) = get(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(amount(&body["account"]["balance"]), dec!(1000));
    assert_eq!(amount(&body["account"]["goal_locked_amount"]), dec!(250));
    assert_eq!(amount(&body["account"]["available"]), dec!(750));
}

#[tokio::test]
async fn test_contribution_overdraw_is_conflict() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "100.00").await;
    let (_, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
            "lock_funds": true,
        }),
    )
    .await;
    let goal_id = body["goal"]["id"].as_str().expect("goal id").to_string();

    let (status, body) = post(
        &app,
        &format!("/api/v1/goals/{goal_id}/contributions"),
        json!({ "amount": "150.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BUSINESS_RULE_VIOLATION");

    let (_, body) = get(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(amount(&body["account"]["goal_locked_amount"]), dec!(0));
    let (_, body) = get(&app, &format!("/api/v1/goals/{goal_id}")).await;
    assert_eq!(amount(&body["goal"]["current_amount"]), dec!(0));
}

#[tokio::test]
async fn test_completed_goal_releases_reservation() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;
    let (_, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
            "lock_funds": true,
        }),
    )
    .await;
    let goal_id = body["goal"]["id"].as_str().expect("goal id").to_string();

    for amount_str in ["250.00", "350.00"] {
        let (status, _) = post(
            &app,
            &format!("/api/v1/goals/{goal_id}/contributions"),
            json!({ "amount": amount_str }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = get(&app, &format!("/api/v1/goals/{goal_id}")).await;
    assert_eq!(body["goal"]["status"], "completed");
    assert_eq!(amount(&body["goal"]["current_amount"]), dec!(600));
    assert_eq!(amount(&body["goal"]["reserved_amount"]), dec!(0));

    let (_, body) = get(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(amount(&body["account"]["goal_locked_amount"]), dec!(0));
    assert_eq!(amount(&body["account"]["available"]), dec!(1000));
}

#[tokio::test]
async fn test_deleting_locked_goal_releases_reservation() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;
    let (_, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
            "lock_funds": true,
        }),
    )
    .await;
    let goal_id = body["goal"]["id"].as_str().expect("goal id").to_string();

    let (status, _) = post(
        &app,
        &format!("/api/v1/goals/{goal_id}/contributions"),
        json!({ "amount": "300.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = del(&app, &format!("/api/v1/goals/{goal_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = get(&app, &format!("/api/v1/accounts/{account_id}")).await;
    assert_eq!(amount(&body["account"]["goal_locked_amount"]), dec!(0));
    assert_eq!(amount(&body["account"]["available"]), dec!(1000));
}

#[tokio::test]
async fn test_goal_rename_and_retarget() {
    let app = app();
    let user_id = seed_user(&app, "dana@example.com").await;
    let account_id = seed_account(&app, &user_id, "1000.00").await;
    let (_, body) = post(
        &app,
        "/api/v1/goals",
        json!({
            "user_id": user_id,
            "account_id": account_id,
            "name": "Vacation",
            "target_amount": "600.00",
        }),
    )
    .await;
    let goal_id = body["goal"]["id"].as_str().expect("goal id").to_string();

    let (status, body) = put(
        &app,
        &format!("/api/v1/goals/{goal_id}"),
        json!({ "name": "Sabbatical", "target_amount": "900.00" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["goal"]["name"], "Sabbatical");
    assert_eq!(amount(&body["goal"]["target_amount"]), dec!(900));
}
