//! MongoDB-backed repository implementations.
//!
//! Every balance, spend, reservation, and progress mutation is a
//! `find_one_and_update` with `$inc` on one document: the storage-side
//! half of the single-document atomicity model.

pub mod account;
pub mod budget;
pub mod goal;
pub mod transaction;
pub mod user;

pub use account::MongoAccountRepository;
pub use budget::MongoBudgetRepository;
pub use goal::MongoGoalRepository;
pub use transaction::MongoTransactionRepository;
pub use user::MongoUserRepository;

use finbook_shared::AppError;

pub(crate) fn db_err(err: mongodb::error::Error) -> AppError {
    AppError::Database(err.to_string())
}
