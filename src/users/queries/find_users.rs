use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};
use crate::pipeline::{
    LoggingBehaviour, Pipeline, Request, RequestHandler, ValidationBehaviour, ValidationFailure,
    Validator,
};
use crate::services::UserService;
use crate::users::dto::UserDto;

/// Find users by exact given names OR last name.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FindUsers {
    /// Exact, case sensitive given names
    #[param(example = "Ada")]
    pub given_names: Option<String>,
    /// Exact, case sensitive last name
    #[param(example = "Lovelace")]
    pub last_name: Option<String>,
}

impl FindUsers {
    /// Blank criteria count as absent.
    fn criteria(&self) -> (Option<&str>, Option<&str>) {
        (present(&self.given_names), present(&self.last_name))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl Request for FindUsers {
    type Response = Vec<UserDto>;
    const NAME: &'static str = "FindUsers";
}

/// At least one of the two criteria must be supplied.
pub struct FindCriteriaRule;

#[async_trait]
impl Validator<FindUsers> for FindCriteriaRule {
    async fn validate(
        &self,
        request: &FindUsers,
        _cancel: &CancellationToken,
    ) -> AppResult<Vec<ValidationFailure>> {
        match request.criteria() {
            (None, None) => Ok(vec![
                ValidationFailure::field("givenNames", "'Given Names' must not be empty."),
                ValidationFailure::field("lastName", "'Last Name' must not be empty."),
            ]),
            _ => Ok(Vec::new()),
        }
    }
}

pub struct FindUsersHandler {
    users: UserService,
}

impl FindUsersHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<FindUsers> for FindUsersHandler {
    async fn handle(
        &self,
        request: FindUsers,
        cancel: &CancellationToken,
    ) -> AppResult<Vec<UserDto>> {
        let (given_names, last_name) = request.criteria();
        let users = self.users.find(given_names, last_name, cancel).await?;

        if users.is_empty() {
            return Err(AppError::not_found(format!(
                "The user '{}' could not be found",
                missing_label(given_names, last_name)
            )));
        }

        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

/// The name shown in the NotFound message for a search that matched nothing.
fn missing_label(given_names: Option<&str>, last_name: Option<&str>) -> String {
    match (given_names, last_name) {
        (Some(given), None) => given.to_string(),
        (None, Some(last)) => last.to_string(),
        (given, last) => format!("'{} {}'", given.unwrap_or_default(), last.unwrap_or_default()),
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<FindUsers> {
    Pipeline::new(FindUsersHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(ValidationBehaviour::new().with(FindCriteriaRule))
}
