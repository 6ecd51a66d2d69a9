//! Category budgets: period overlap and spending limits.

pub mod repository;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use repository::BudgetRepository;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetPatch, BudgetStatus, BudgetSummary, NewBudget, periods_conflict, spend_status,
};
