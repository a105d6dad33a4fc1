//! User service for business logic operations.
//!
//! Typed user operations over a `UserRepository`. Absence is returned as
//! `None`; callers decide whether that is a NotFound.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;

/// User service for handling user-related operations.
///
/// Cloning is cheap; the repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Gets a user by their ID.
    pub async fn get(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>> {
        self.repo.find_by_id(id, cancel).await
    }

    /// Users matching either criterion; see `UserRepository::find_by_names`.
    pub async fn find(
        &self,
        given_names: Option<&str>,
        last_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>> {
        self.repo.find_by_names(given_names, last_name, cancel).await
    }

    /// Gets one page of users.
    ///
    /// # Arguments
    /// * `page` - 1-based page index; 0 is treated as 1
    /// * `page_size` - Maximum number of users on the page
    pub async fn get_paginated(
        &self,
        page: u32,
        page_size: u32,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>> {
        let page_size = page_size as usize;
        let offset = (page.saturating_sub(1) as usize).saturating_mul(page_size);
        self.repo.list_page(offset, page_size, cancel).await
    }

    pub async fn count(&self, cancel: &CancellationToken) -> AppResult<usize> {
        self.repo.count(cancel).await
    }

    /// Read-only existence check
    pub async fn exists(&self, id: i32, cancel: &CancellationToken) -> AppResult<bool> {
        self.repo.exists(id, cancel).await
    }

    pub async fn add(&self, new_user: NewUser, cancel: &CancellationToken) -> AppResult<User> {
        self.repo.create(new_user, cancel).await
    }

    /// Overwrites the stored user with `user.id`; `None` if it is gone.
    pub async fn update(&self, user: User, cancel: &CancellationToken) -> AppResult<Option<User>> {
        self.repo.update(user, cancel).await
    }

    /// Removes a user, returning the removed entity.
    pub async fn delete(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>> {
        self.repo.delete(id, cancel).await
    }
}
