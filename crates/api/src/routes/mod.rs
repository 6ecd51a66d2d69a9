//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod budgets;
pub mod goals;
pub mod health;
pub mod transactions;
pub mod users;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(accounts::routes())
        .merge(budgets::routes())
        .merge(goals::routes())
        .merge(transactions::routes())
}
