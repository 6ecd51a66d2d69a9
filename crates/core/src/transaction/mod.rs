//! The transaction-posting pipeline and search.

pub mod repository;
pub mod service;
pub mod types;


pub use repository::TransactionRepository;
pub use service::TransactionService;
pub use types::{
    NewTransaction, SortField, SortOrder, Transaction, TransactionKind, TransactionPatch,
    TransactionQuery, TransactionTotals,
};
