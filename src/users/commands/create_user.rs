use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppResult;
use crate::models::{ContactDetail, NewUser};
use crate::pipeline::{
    FieldRules, LoggingBehaviour, Pipeline, Request, RequestHandler, ValidationBehaviour,
};
use crate::services::UserService;
use crate::users::dto::UserDto;
use crate::users::rules::not_blank;

/// Create a user with its contact detail.
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Given Names' must not be empty."))]
    #[schema(example = "Ada")]
    pub given_names: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Last Name' must not be empty."))]
    #[schema(example = "Lovelace")]
    pub last_name: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Email Address' must not be empty."))]
    #[schema(example = "ada@example.com")]
    pub email_address: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "'Mobile Number' must not be empty."))]
    #[schema(example = "+44 7700 900001")]
    pub mobile_number: String,
}

impl CreateUser {
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            given_names: self.given_names,
            last_name: self.last_name,
            contact_detail: ContactDetail {
                email_address: self.email_address,
                mobile_number: self.mobile_number,
            },
        }
    }
}

impl Request for CreateUser {
    type Response = UserDto;
    const NAME: &'static str = "CreateUser";
}

pub struct CreateUserHandler {
    users: UserService,
}

impl CreateUserHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, request: CreateUser, cancel: &CancellationToken) -> AppResult<UserDto> {
        let user = self.users.add(request.into_new_user(), cancel).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user.into())
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<CreateUser> {
    Pipeline::new(CreateUserHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(ValidationBehaviour::new().with(FieldRules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::users::test_support::service_with;

    fn create_request() -> CreateUser {
        CreateUser {
            given_names: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email_address: "ada@example.com".to_string(),
            mobile_number: "+44 7700 900001".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_returns_same_fields() {
        let users = service_with(2);
        let cancel = CancellationToken::new();

        let created = pipeline(&users).send(create_request(), &cancel).await.unwrap();
        assert_eq!(created.user_id, 3);

        let stored = users.get(created.user_id, &cancel).await.unwrap().unwrap();
        assert_eq!(UserDto::from(stored), created);
        assert_eq!(created.given_names, "Ada");
        assert_eq!(created.mobile_number, "+44 7700 900001");
    }

    #[tokio::test]
    async fn test_each_empty_field_is_named_and_nothing_persisted() {
        type Blank = fn(&mut CreateUser);
        let cases: [(&str, Blank); 4] = [
            ("givenNames", |r| r.given_names.clear()),
            ("lastName", |r| r.last_name = "   ".to_string()),
            ("emailAddress", |r| r.email_address.clear()),
            ("mobileNumber", |r| r.mobile_number.clear()),
        ];

        for (field, blank) in cases {
            let users = service_with(0);
            let cancel = CancellationToken::new();
            let mut request = create_request();
            blank(&mut request);

            match pipeline(&users).send(request, &cancel).await.unwrap_err() {
                AppError::Validation { errors } => {
                    assert_eq!(errors.len(), 1, "field {field}");
                    assert_eq!(errors[0].field, field);
                }
                other => panic!("Expected Validation for {field}, got {:?}", other),
            }
            assert_eq!(users.count(&cancel).await.unwrap(), 0);
        }
    }

    #[test]
    fn test_deserialize_camel_case_body() {
        let request: CreateUser = serde_json::from_str(
            r#"{"givenNames":"Ada","lastName":"Lovelace","emailAddress":"a@b.c","mobileNumber":"1"}"#,
        )
        .unwrap();
        assert_eq!(request.into_new_user().contact_detail.email_address, "a@b.c");
    }

    #[tokio::test]
    async fn test_omitted_field_reaches_validation() {
        let request: CreateUser = serde_json::from_str(
            r#"{"givenNames":"Ada","lastName":"Lovelace","mobileNumber":"1"}"#,
        )
        .unwrap();
        assert!(request.email_address.is_empty());

        let users = service_with(0);
        match pipeline(&users).send(request, &CancellationToken::new()).await.unwrap_err() {
            AppError::Validation { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "emailAddress");
                assert_eq!(errors[0].message, "'Email Address' must not be empty.");
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }
}
