//! Rules shared by several user requests.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use validator::ValidationError;

use crate::error::{AppResult, user_not_found_message};
use crate::pipeline::{ValidationFailure, Validator};
use crate::services::UserService;

/// Rejects empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Requests that act on one stored user.
pub trait TargetsUser {
    fn user_id(&self) -> i32;
}

/// Fails with `NotFound` when the targeted user is not stored.
///
/// Non-positive ids are skipped; the id range rule reports those.
#[derive(Clone)]
pub struct UserExistsRule {
    users: UserService,
}

impl UserExistsRule {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<R: TargetsUser + Send + Sync> Validator<R> for UserExistsRule {
    async fn validate(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ValidationFailure>> {
        let id = request.user_id();
        if id <= 0 || self.users.exists(id, cancel).await? {
            return Ok(Vec::new());
        }
        Ok(vec![ValidationFailure::not_found("id", user_not_found_message(id))])
    }
}
