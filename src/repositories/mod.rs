//! Repository layer for data access operations.

mod user_repo;

pub use user_repo::{InMemoryUserRepository, UserRepository, sample_users};

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::AppResult;

/// Aggregates all repositories for convenient access.
///
/// Cloning is cheap; every repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// In-memory repositories, seeded when the store configuration asks for it.
    pub fn in_memory(config: &StoreConfig) -> AppResult<Self> {
        let users = if config.seed_sample_data {
            InMemoryUserRepository::with_sample_data()?
        } else {
            InMemoryUserRepository::new()
        };
        Ok(Self::new(Arc::new(users)))
    }
}
