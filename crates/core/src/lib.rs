//! Core business logic for Finbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, business rules, and service orchestration live here;
//! persistence is reached only through the repository traits each module defines.
//!
//! # Modules
//!
//! - `user` - Registered users and creation-time email uniqueness
//! - `account` - Money accounts: balances and goal-locked funds
//! - `budget` - Category budgets: period overlap and spending limits
//! - `goal` - Savings goals: fund locking, contributions, completion
//! - `transaction` - The transaction-posting pipeline and search

pub mod account;
pub mod budget;
pub mod goal;
pub mod transaction;
pub mod user;
