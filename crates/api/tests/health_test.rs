//! HTTP tests for the health endpoint.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::Request;
use serde_json::Value;
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

#[tokio::test]
async fn test_health_reports_service_identity() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to drive router");

    assert_eq!(response.status(), 200);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes).expect("Response body is not JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "finbook-api");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/nonexistent")
                .body(Body::empty())
                .expect("Failed to build request"),
        )
        .await
        .expect("Failed to drive router");

    assert_eq!(response.status(), 404);
}
