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
use crate::users::dto::{PaginatedDto, UserDto};

pub const DEFAULT_ITEMS_PER_PAGE: i32 = 10;

fn default_items_per_page() -> i32 {
    DEFAULT_ITEMS_PER_PAGE
}

/// One page of users in ascending id order.
#[derive(Debug, Clone, Deserialize, IntoParams, Validate)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListUsers {
    /// 1-based page index
    #[serde(default)]
    #[validate(range(min = 1, message = "'Page Number' must be greater than '0'."))]
    #[param(minimum = 1, example = 1)]
    pub page_number: i32,

    /// Page size
    #[serde(default = "default_items_per_page")]
    #[validate(range(min = 1, message = "'Items Per Page' must be greater than '0'."))]
    #[param(minimum = 1, default = 10)]
    pub items_per_page: i32,
}

impl ListUsers {
    pub fn new(page_number: i32) -> Self {
        Self {
            page_number,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl Request for ListUsers {
    type Response = PaginatedDto<UserDto>;
    const NAME: &'static str = "ListUsers";
}

/// `page < ceil(total / per_page)`; `per_page` must be positive.
pub fn has_next_page(total: usize, page: u32, per_page: u32) -> bool {
    (page as u64) < (total as u64).div_ceil(per_page as u64)
}

pub struct ListUsersHandler {
    users: UserService,
}

impl ListUsersHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<ListUsers> for ListUsersHandler {
    async fn handle(
        &self,
        request: ListUsers,
        cancel: &CancellationToken,
    ) -> AppResult<PaginatedDto<UserDto>> {
        // FieldRules has already rejected values below 1
        let page = u32::try_from(request.page_number).map_err(anyhow::Error::new)?;
        let per_page = u32::try_from(request.items_per_page).map_err(anyhow::Error::new)?;

        let total = self.users.count(cancel).await?;
        if total == 0 {
            return Err(AppError::not_found("No users could be found"));
        }

        let users = self.users.get_paginated(page, per_page, cancel).await?;

        Ok(PaginatedDto {
            data: users.into_iter().map(UserDto::from).collect(),
            has_next_page: has_next_page(total, page, per_page),
        })
    }
}

pub(crate) fn pipeline(users: &UserService) -> Pipeline<ListUsers> {
    Pipeline::new(ListUsersHandler::new(users.clone()))
        .with_behaviour(LoggingBehaviour)
        .with_behaviour(ValidationBehaviour::new().with(FieldRules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::service_with;
    use proptest::prelude::*;

    async fn list(stored: usize, page_number: i32, items_per_page: i32) -> AppResult<PaginatedDto<UserDto>> {
        pipeline(&service_with(stored))
            .send(
                ListUsers {
                    page_number,
                    items_per_page,
                },
                &CancellationToken::new(),
            )
            .await
    }

    #[tokio::test]
    async fn test_second_page_of_fifteen() {
        let page = list(15, 2, 10).await.unwrap();
        assert_eq!(page.data.len(), 5);
        assert_eq!(page.data[0].user_id, 11);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_second_page_of_twenty_five() {
        let page = list(25, 2, 10).await.unwrap();
        assert_eq!(page.data.len(), 10);
        assert!(page.has_next_page);
    }

    #[tokio::test]
    async fn test_empty_store_is_not_found() {
        match list(0, 1, 10).await.unwrap_err() {
            AppError::NotFound { message } => assert_eq!(message, "No users could be found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let page = list(5, 3, 10).await.unwrap();
        assert!(page.data.is_empty());
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_rejects_non_positive_paging() {
        match list(5, 0, 0).await.unwrap_err() {
            AppError::Validation { errors } => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["itemsPerPage", "pageNumber"]);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handler_without_validation_rejects_negative_page_as_internal() {
        let handler = ListUsersHandler::new(service_with(3));
        let request = ListUsers {
            page_number: -1,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        };

        let result = handler.handle(request, &CancellationToken::new()).await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_items_per_page_defaults_to_ten() {
        let request: ListUsers = serde_json::from_str(r#"{"pageNumber": 1}"#).unwrap();
        assert_eq!(request.items_per_page, 10);
        assert_eq!(ListUsers::new(4).items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }

    proptest! {
        #[test]
        fn prop_has_next_page_matches_remaining_items(
            total in 0usize..10_000,
            page in 1u32..500,
            per_page in 1u32..200,
        ) {
            let shown_so_far = page as u64 * per_page as u64;
            prop_assert_eq!(has_next_page(total, page, per_page), shown_so_far < total as u64);
        }
    }
}
