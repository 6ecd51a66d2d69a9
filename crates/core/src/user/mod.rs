//! Registered users and creation-time email uniqueness.

pub mod repository;
pub mod service;
pub mod types;

pub use repository::UserRepository;
pub use service::UserService;
pub use types::{NewUser, User, UserPatch};
