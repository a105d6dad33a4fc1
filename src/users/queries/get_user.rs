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

/// Fetch a single user by id.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct GetUser {
    /// User id
    #[serde(default)]
    #[validate(range(min = 1, message = "'Id' must be greater than '0'."))]
    #[param(minimum = 1, example = 1)]
    pub id: i32,
}

impl Request for GetUser {
    type Response = UserDto;
    const NAME: &'static str = "GetUser";
}

pub struct GetUserHandler {
    users: UserService,
}

impl GetUserHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUser> for GetUserHandler {
    async fn handle(&self, request: GetUser, cancel: &CancellationToken) -> AppResult<UserDto> {
        self.users
            .get(request.id, cancel)
            .await?
            .map(UserDto::from)
            .ok_or_else(|| AppError::user_not_found(request.id))
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<GetUser> {
    Pipeline::new(GetUserHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(ValidationBehaviour::new().with(FieldRules))
}
