//! Savings goals: fund locking, contributions, completion.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::GoalRepository;
pub use service::GoalService;
pub use types::{Goal, GoalPatch, GoalStatus, NewGoal};
