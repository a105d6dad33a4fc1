use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{ContactDetail, User};
use crate::pipeline::{
    FieldRules, LoggingBehaviour, Pipeline, Request, RequestHandler, ValidationBehaviour,
};
use crate::services::UserService;
use crate::users::dto::UserDto;
use crate::users::rules::{TargetsUser, UserExistsRule, not_blank};

/// Replace a stored user's names and contact detail.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(default)]
    #[validate(range(min = 1, message = "'Id' must be greater than '0'."))]
    #[schema(example = 1)]
    pub id: i32,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Given Names' must not be empty."))]
    #[schema(example = "Ada")]
    pub given_names: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Last Name' must not be empty."))]
    #[schema(example = "King")]
    pub last_name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Email Address' must not be empty."))]
    #[schema(example = "ada.king@example.com")]
    pub email_address: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Mobile Number' must not be empty."))]
    #[schema(example = "+44 7700 900009")]
    pub mobile_number: String,
}

impl UpdateUser {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            given_names: self.given_names,
            last_name: self.last_name,
            contact_detail: ContactDetail {
                email_address: self.email_address,
                mobile_number: self.mobile_number,
            },
        }
    }
}

impl TargetsUser for UpdateUser {
    fn user_id(&self) -> i32 {
        self.id
    }
}

impl Request for UpdateUser {
    type Response = UserDto;
    const NAME: &'static str = "UpdateUser";
}

pub struct UpdateUserHandler {
    users: UserService,
}

impl UpdateUserHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<UpdateUser> for UpdateUserHandler {
    async fn handle(&self, request: UpdateUser, cancel: &CancellationToken) -> AppResult<UserDto> {
        let id = request.id;
        // The user may have been deleted since validation ran.
        let updated = self
            .users
            .update(request.into_user(), cancel)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))?;

        tracing::info!(user_id = id, "User updated");
        Ok(updated.into())
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<UpdateUser> {
    Pipeline::new(UpdateUserHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(
            ValidationBehaviour::new()
                .with(FieldRules)
                .with(UserExistsRule::new(users.clone())),
        )
}
