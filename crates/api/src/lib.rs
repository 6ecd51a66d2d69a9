//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The shared application state wiring services into handlers
//! - Uniform error-to-response mapping

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use mongodb::Database;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use finbook_core::account::AccountService;
use finbook_core::budget::BudgetService;
use finbook_core::goal::GoalService;
use finbook_core::transaction::TransactionService;
use finbook_core::user::UserService;
use finbook_db::{
    MongoAccountRepository, MongoBudgetRepository, MongoGoalRepository,
    MongoTransactionRepository, MongoUserRepository,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User management.
    pub users: Arc<UserService>,
    /// Account management.
    pub accounts: Arc<AccountService>,
    /// Budget rules.
    pub budgets: Arc<BudgetService>,
    /// Savings-goal engine.
    pub goals: Arc<GoalService>,
    /// Transaction-posting pipeline.
    pub transactions: Arc<TransactionService>,
}

impl AppState {
    /// Wires the full service stack over MongoDB repositories.
    #[must_use]
    pub fn with_mongo(db: &Database) -> Self {
        let user_repo = Arc::new(MongoUserRepository::new(db));
        let account_repo = Arc::new(MongoAccountRepository::new(db));
        let budget_repo = Arc::new(MongoBudgetRepository::new(db));
        let goal_repo = Arc::new(MongoGoalRepository::new(db));
        let tx_repo = Arc::new(MongoTransactionRepository::new(db));

        let budgets = Arc::new(BudgetService::new(budget_repo));
        let goals = Arc::new(GoalService::new(goal_repo, account_repo.clone()));
        let transactions = Arc::new(TransactionService::new(
            tx_repo,
            user_repo.clone(),
            account_repo.clone(),
            budgets.clone(),
            goals.clone(),
        ));

        Self {
            users: Arc::new(UserService::new(user_repo.clone())),
            accounts: Arc::new(AccountService::new(account_repo, user_repo)),
            budgets,
            goals,
            transactions,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
