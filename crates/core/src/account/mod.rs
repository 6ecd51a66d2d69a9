//! Money accounts: balances and goal-locked funds.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::AccountRepository;
pub use service::AccountService;
pub use types::{Account, AccountPatch, NewAccount};
