//! Database layer with MongoDB and in-memory repositories.
//!
//! This crate provides:
//! - BSON document mappings for the core domain types
//! - MongoDB repository implementations
//! - In-memory repository implementations for tests and local runs
//! - Connection and index bootstrap helpers

pub mod documents;
pub mod memory;
pub mod mongo;

pub use memory::{
    MemoryAccountRepository, MemoryBudgetRepository, MemoryGoalRepository,
    MemoryTransactionRepository, MemoryUserRepository,
};
pub use mongo::{
    MongoAccountRepository, MongoBudgetRepository, MongoGoalRepository,
    MongoTransactionRepository, MongoUserRepository,
};

use bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};
use tracing::info;

use finbook_shared::config::MongoConfig;
use finbook_shared::{AppError, AppResult};

/// Establishes a connection to the database and verifies it with a ping.
///
/// # Errors
///
/// Returns an error if the URI does not parse or the server does not
/// answer the ping.
pub async fn connect(config: &MongoConfig) -> AppResult<Database> {
    let mut options = ClientOptions::parse(&config.uri)
        .await
        .map_err(|err| AppError::Database(err.to_string()))?;
    options.max_pool_size = Some(config.max_pool_size);

    let client =
        Client::with_options(options).map_err(|err| AppError::Database(err.to_string()))?;
    let db = client.database(&config.database);

    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| AppError::Database(err.to_string()))?;
    info!(database = %config.database, "connected to MongoDB");

    Ok(db)
}

/// Creates the indexes the query paths rely on. Safe to run on every
/// startup; existing indexes are left untouched.
///
/// # Errors
///
/// Returns an error if an index cannot be created.
pub async fn ensure_indexes(db: &Database) -> AppResult<()> {
    let map_err = |err: mongodb::error::Error| AppError::Database(err.to_string());

    // Email uniqueness is enforced here, not in application code.
    db.collection::<bson::Document>(documents::USERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await
        .map_err(map_err)?;

    db.collection::<bson::Document>(documents::ACCOUNTS)
        .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
        .await
        .map_err(map_err)?;

    db.collection::<bson::Document>(documents::BUDGETS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "category": 1, "period_start": 1 })
                .build(),
        )
        .await
        .map_err(map_err)?;

    db.collection::<bson::Document>(documents::GOALS)
        .create_index(IndexModel::builder().keys(doc! { "user_id": 1 }).build())
        .await
        .map_err(map_err)?;

    db.collection::<bson::Document>(documents::TRANSACTIONS)
        .create_index(
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "date": -1 })
                .build(),
        )
        .await
        .map_err(map_err)?;

    info!("database indexes ensured");
    Ok(())
}
