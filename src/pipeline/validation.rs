use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use super::{Behaviour, Next, Request};
use crate::error::{AppError, AppResult, ValidationFieldError, field_errors};

/// What a failed rule means for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A field constraint was not met
    Field,
    /// The request refers to data that does not exist
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: String,
    pub message: String,
    pub kind: FailureKind,
}

impl ValidationFailure {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: FailureKind::Field,
        }
    }

    pub fn not_found(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            kind: FailureKind::NotFound,
        }
    }
}

/// One rule set for a request type.
///
/// Rules only read; an `Err` means the rule itself could not run.
#[async_trait]
pub trait Validator<R>: Send + Sync {
    async fn validate(
        &self,
        request: &R,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<ValidationFailure>>;
}

/// Runs the request's `validator::Validate` derive as a rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldRules;

#[async_trait]
impl<R: Validate + Send + Sync> Validator<R> for FieldRules {
    async fn validate(
        &self,
        request: &R,
        _cancel: &CancellationToken,
    ) -> AppResult<Vec<ValidationFailure>> {
        let failures = match request.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => field_errors(&errors)
                .into_iter()
                .map(|e| ValidationFailure::field(e.field, e.message))
                .collect(),
        };
        Ok(failures)
    }
}

/// Runs every registered rule set before the handler.
///
/// Any `NotFound` failure wins over field failures. With no rule sets the
/// request passes straight through.
pub struct ValidationBehaviour<R> {
    validators: Vec<Arc<dyn Validator<R>>>,
}

impl<R> ValidationBehaviour<R> {
    pub fn new() -> Self {
        Self {
            validators: Vec::new(),
        }
    }

    pub fn with(mut self, validator: impl Validator<R> + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }
}

impl<R> Default for ValidationBehaviour<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Request> Behaviour<R> for ValidationBehaviour<R> {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> AppResult<R::Response> {
        if self.validators.is_empty() {
            return next.run(request, cancel).await;
        }

        let outcomes = join_all(
            self.validators
                .iter()
                .map(|validator| validator.validate(&request, cancel)),
        )
        .await;

        let mut failures = Vec::new();
        for outcome in outcomes {
            failures.extend(outcome?);
        }

        if let Some(error) = into_error(failures) {
            tracing::debug!(request = R::NAME, error = %error, "Request rejected by validation");
            return Err(error);
        }

        next.run(request, cancel).await
    }
}

fn into_error(failures: Vec<ValidationFailure>) -> Option<AppError> {
    if let Some(missing) = failures.iter().find(|f| f.kind == FailureKind::NotFound) {
        return Some(AppError::not_found(missing.message.clone()));
    }
    if failures.is_empty() {
        return None;
    }
    Some(AppError::Validation {
        errors: failures
            .into_iter()
            .map(|f| ValidationFieldError::new(f.field, f.message))
            .collect(),
    })
}
