//! User repository: the data-access trait and its in-memory implementation.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};
use crate::models::{ContactDetail, NewUser, User};
use crate::utils::ensure_active;

/// Data access for users.
///
/// Absence is reported as `None`, never as an error. Every operation fails
/// with `Cancelled` once the token fires.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>>;

    /// Users whose given names equal `given_names` OR whose last name equals
    /// `last_name`. Exact, case sensitive; a `None` criterion matches nothing.
    async fn find_by_names(
        &self,
        given_names: Option<&str>,
        last_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>>;

    /// Up to `limit` users after skipping `offset`, in ascending id order
    async fn list_page(
        &self,
        offset: usize,
        limit: usize,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>>;

    async fn count(&self, cancel: &CancellationToken) -> AppResult<usize>;

    async fn exists(&self, id: i32, cancel: &CancellationToken) -> AppResult<bool>;

    /// Stores a new user under the next free id
    async fn create(&self, new_user: NewUser, cancel: &CancellationToken) -> AppResult<User>;

    /// Replaces names and contact detail of the stored user with `user.id`
    async fn update(&self, user: User, cancel: &CancellationToken) -> AppResult<Option<User>>;

    async fn delete(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>>;
}

#[derive(Debug)]
struct UserTable {
    rows: BTreeMap<i32, User>,
    next_id: i32,
}

impl Default for UserTable {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl UserTable {
    fn insert(&mut self, new_user: NewUser) -> AppResult<User> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or_else(|| AppError::persistence("create user: id space exhausted"))?;

        let user = new_user.into_user(id);
        self.rows.insert(id, user.clone());
        Ok(user)
    }
}

/// Process-wide in-memory user store.
///
/// Cloning shares the same table. Each operation holds the lock for its whole
/// duration, so operations are atomic with respect to each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `users`, ids assigned in order.
    pub fn with_users(users: impl IntoIterator<Item = NewUser>) -> AppResult<Self> {
        let mut table = UserTable::default();
        for user in users {
            table.insert(user)?;
        }
        Ok(Self {
            table: Arc::new(RwLock::new(table)),
        })
    }

    /// Creates a repository holding the bundled sample users.
    pub fn with_sample_data() -> AppResult<Self> {
        Self::with_users(sample_users())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>> {
        ensure_active(cancel)?;
        let table = self.table.read().await;
        ensure_active(cancel)?;
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_names(
        &self,
        given_names: Option<&str>,
        last_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>> {
        ensure_active(cancel)?;
        let table = self.table.read().await;
        ensure_active(cancel)?;

        let matches = table
            .rows
            .values()
            .filter(|user| {
                given_names == Some(user.given_names.as_str())
                    || last_name == Some(user.last_name.as_str())
            })
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn list_page(
        &self,
        offset: usize,
        limit: usize,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<User>> {
        ensure_active(cancel)?;
        let table = self.table.read().await;
        ensure_active(cancel)?;

        Ok(table
            .rows
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, cancel: &CancellationToken) -> AppResult<usize> {
        ensure_active(cancel)?;
        let table = self.table.read().await;
        ensure_active(cancel)?;
        Ok(table.rows.len())
    }

    async fn exists(&self, id: i32, cancel: &CancellationToken) -> AppResult<bool> {
        ensure_active(cancel)?;
        let table = self.table.read().await;
        ensure_active(cancel)?;
        Ok(table.rows.contains_key(&id))
    }

    async fn create(&self, new_user: NewUser, cancel: &CancellationToken) -> AppResult<User> {
        ensure_active(cancel)?;
        let mut table = self.table.write().await;
        ensure_active(cancel)?;

        let user = table.insert(new_user)?;
        tracing::debug!(user_id = user.id, "Created user");
        Ok(user)
    }

    async fn update(&self, user: User, cancel: &CancellationToken) -> AppResult<Option<User>> {
        ensure_active(cancel)?;
        let mut table = self.table.write().await;
        ensure_active(cancel)?;

        let Some(stored) = table.rows.get_mut(&user.id) else {
            return Ok(None);
        };
        stored.given_names = user.given_names;
        stored.last_name = user.last_name;
        stored.contact_detail = user.contact_detail;

        tracing::debug!(user_id = stored.id, "Updated user");
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i32, cancel: &CancellationToken) -> AppResult<Option<User>> {
        ensure_active(cancel)?;
        let mut table = self.table.write().await;
        ensure_active(cancel)?;

        let removed = table.rows.remove(&id);
        if removed.is_some() {
            tracing::debug!(user_id = id, "Deleted user");
        }
        Ok(removed)
    }
}

/// Sample users loaded when `store.seed_sample_data` is enabled
pub fn sample_users() -> Vec<NewUser> {
    [
        ("Ada", "Lovelace", "ada@example.com", "+44 7700 900001"),
        ("Alan", "Turing", "alan@example.com", "+44 7700 900002"),
        ("Grace", "Hopper", "grace@example.com", "+1 202 555 0103"),
        ("Edsger", "Dijkstra", "edsger@example.com", "+31 6 1234 5604"),
        ("Barbara", "Liskov", "barbara@example.com", "+1 617 555 0105"),
    ]
    .into_iter()
    .map(|(given, last, email, mobile)| NewUser {
        given_names: given.to_string(),
        last_name: last.to_string(),
        contact_detail: ContactDetail {
            email_address: email.to_string(),
            mobile_number: mobile.to_string(),
        },
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(given: &str, last: &str) -> NewUser {
        NewUser {
            given_names: given.to_string(),
            last_name: last.to_string(),
            contact_detail: ContactDetail {
                email_address: format!("{}@example.com", given.to_lowercase()),
                mobile_number: "0400 000 000".to_string(),
            },
        }
    }

    fn numbered(count: usize) -> Vec<NewUser> {
        (0..count)
            .map(|i| new_user(&format!("Given{i}"), &format!("Last{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();

        let first = repo.create(new_user("Ada", "Lovelace"), &cancel).await.unwrap();
        let second = repo.create(new_user("Alan", "Turing"), &cancel).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(repo.count(&cancel).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryUserRepository::with_users(numbered(2)).unwrap();
        let cancel = CancellationToken::new();

        repo.delete(2, &cancel).await.unwrap();
        let created = repo.create(new_user("Grace", "Hopper"), &cancel).await.unwrap();
        assert_eq!(created.id, 3);
    }

    #[tokio::test]
    async fn test_missing_ids_report_none() {
        let repo = InMemoryUserRepository::with_users(numbered(3)).unwrap();
        let cancel = CancellationToken::new();

        assert_eq!(repo.find_by_id(99, &cancel).await.unwrap(), None);
        assert_eq!(repo.delete(99, &cancel).await.unwrap(), None);
        assert!(!repo.exists(99, &cancel).await.unwrap());

        let ghost = new_user("Nobody", "Here").into_user(99);
        assert_eq!(repo.update(ghost, &cancel).await.unwrap(), None);
        assert_eq!(repo.count(&cancel).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_by_names_is_logical_or() {
        let repo = InMemoryUserRepository::with_users(vec![
            new_user("Alice", "Smith"),
            new_user("Alice", "Jones"),
            new_user("Bob", "Smith"),
            new_user("Carol", "Brown"),
        ])
        .unwrap();
        let cancel = CancellationToken::new();

        let alices = repo.find_by_names(Some("Alice"), None, &cancel).await.unwrap();
        assert_eq!(alices.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);

        let smiths = repo.find_by_names(None, Some("Smith"), &cancel).await.unwrap();
        assert_eq!(smiths.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 3]);

        let either = repo
            .find_by_names(Some("Carol"), Some("Jones"), &cancel)
            .await
            .unwrap();
        assert_eq!(either.iter().map(|u| u.id).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[tokio::test]
    async fn test_find_by_names_is_exact_and_case_sensitive() {
        let repo = InMemoryUserRepository::with_users(vec![new_user("Alice", "Smith")]).unwrap();
        let cancel = CancellationToken::new();

        assert!(repo.find_by_names(Some("alice"), None, &cancel).await.unwrap().is_empty());
        assert!(repo.find_by_names(Some("Ali"), None, &cancel).await.unwrap().is_empty());
        assert!(repo.find_by_names(None, None, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_page_ascending_ids() {
        let repo = InMemoryUserRepository::with_users(numbered(15)).unwrap();
        let cancel = CancellationToken::new();

        let page = repo.list_page(10, 10, &cancel).await.unwrap();
        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), (11..=15).collect::<Vec<_>>());

        assert!(repo.list_page(20, 10, &cancel).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_replaces_fields() {
        let repo = InMemoryUserRepository::with_users(numbered(1)).unwrap();
        let cancel = CancellationToken::new();

        let replacement = new_user("Grace", "Hopper").into_user(1);
        let updated = repo.update(replacement.clone(), &cancel).await.unwrap();
        assert_eq!(updated, Some(replacement.clone()));
        assert_eq!(repo.find_by_id(1, &cancel).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let repo = InMemoryUserRepository::with_users(numbered(1)).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert!(matches!(repo.find_by_id(1, &cancel).await, Err(AppError::Cancelled)));
        assert!(matches!(
            repo.create(new_user("Ada", "Lovelace"), &cancel).await,
            Err(AppError::Cancelled)
        ));
        assert!(matches!(repo.delete(1, &cancel).await, Err(AppError::Cancelled)));

        // Nothing was mutated
        let fresh = CancellationToken::new();
        assert_eq!(repo.count(&fresh).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sample_data() {
        let repo = InMemoryUserRepository::with_sample_data().unwrap();
        let cancel = CancellationToken::new();
        assert_eq!(repo.count(&cancel).await.unwrap(), sample_users().len());
    }
}
