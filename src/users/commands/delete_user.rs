use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use utoipa::IntoParams;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::pipeline::{
    FieldRules, LoggingBehaviour, Pipeline, Request, RequestHandler, ValidationBehaviour,
};
use crate::services::UserService;
use crate::users::dto::UserDto;
use crate::users::rules::{TargetsUser, UserExistsRule};

/// Remove a stored user.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DeleteUser {
    /// User id
    #[serde(default)]
    #[validate(range(min = 1, message = "'Id' must be greater than '0'."))]
    #[param(minimum = 1, example = 1)]
    pub id: i32,
}

impl TargetsUser for DeleteUser {
    fn user_id(&self) -> i32 {
        self.id
    }
}

impl Request for DeleteUser {
    type Response = UserDto;
    const NAME: &'static str = "DeleteUser";
}

pub struct DeleteUserHandler {
    users: UserService,
}

impl DeleteUserHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<DeleteUser> for DeleteUserHandler {
    async fn handle(&self, request: DeleteUser, cancel: &CancellationToken) -> AppResult<UserDto> {
        let removed = self
            .users
            .delete(request.id, cancel)
            .await?
            .ok_or_else(|| AppError::user_not_found(request.id))?;

        tracing::info!(user_id = request.id, "User deleted");
        Ok(removed.into())
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<DeleteUser> {
    Pipeline::new(DeleteUserHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(
            ValidationBehaviour::new()
                .with(FieldRules)
                .with(UserExistsRule::new(users.clone())),
        )
}
