//! Output shapes returned by the user use cases.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// Flattened, read-only view of a user and its contact detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "Ada")]
    pub given_names: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@example.com")]
    pub email_address: String,
    #[schema(example = "+44 7700 900001")]
    pub mobile_number: String,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            given_names: user.given_names,
            last_name: user.last_name,
            email_address: user.contact_detail.email_address,
            mobile_number: user.contact_detail.mobile_number,
        }
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDto<T> {
    pub data: Vec<T>,
    /// True when a later page holds more items
    pub has_next_page: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactDetail;

    #[test]
    fn test_user_dto_wire_shape() {
        let user = User {
            id: 3,
            given_names: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            contact_detail: ContactDetail {
                email_address: "grace@example.com".to_string(),
                mobile_number: "555-0103".to_string(),
            },
        };

        let json = serde_json::to_value(UserDto::from(user)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": 3,
                "givenNames": "Grace",
                "lastName": "Hopper",
                "emailAddress": "grace@example.com",
                "mobileNumber": "555-0103"
            })
        );
    }

    #[test]
    fn test_paginated_dto_wire_shape() {
        let page = PaginatedDto::<i32> {
            data: vec![1, 2],
            has_next_page: true,
        };
        assert_eq!(
            serde_json::to_value(page).unwrap(),
            serde_json::json!({ "data": [1, 2], "hasNextPage": true })
        );
    }
}
