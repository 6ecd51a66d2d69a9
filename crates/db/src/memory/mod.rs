//! In-memory repositories backed by [`dashmap::DashMap`].
//!
//! Each map entry is locked individually while mutated, which mirrors
//! the single-document atomicity the MongoDB backend gets from `$inc`:
//! concurrent balance adjustments compose without lost updates. Used by
//! the service-level tests and available as a zero-setup backend.

pub mod account;
pub mod budget;
pub mod goal;
pub mod transaction;
pub mod user;

pub use account::MemoryAccountRepository;
pub use budget::MemoryBudgetRepository;
pub use goal::MemoryGoalRepository;
pub use transaction::MemoryTransactionRepository;
pub use user::MemoryUserRepository;
