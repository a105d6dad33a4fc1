//! User request handlers.
//!
//! Each handler turns the HTTP request into a typed use-case request and
//! sends it through the mediator. Validation, existence checks and logging
//! happen in the pipeline, not here.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header},
};
use tokio_util::sync::CancellationToken;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::ErrorResponse;
use crate::error::AppResult;
use crate::state::AppState;
use crate::users::{
    CreateUser, DeleteUser, FindUsers, GetUser, ListUsers, PaginatedDto, UpdateUser, UserDto,
};
use crate::utils::{JsonBody, QueryParams};

/// Base path of the user resource.
pub const USERS_PATH: &str = "/Users";

/// Creates user-related routes.
///
/// Routes:
/// - GET /Users?id=        - Get user by id
/// - POST /Users           - Create user
/// - PUT /Users            - Update user
/// - DELETE /Users?id=     - Delete user
/// - GET /Users/Find       - Find users by name
/// - GET /Users/List       - Page through users
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_user, create_user, update_user, delete_user))
        .routes(routes!(find_users))
        .routes(routes!(list_users))
}

/// `Location` value for a stored user.
pub fn user_location(id: i32) -> String {
    format!("{USERS_PATH}?id={id}")
}

/// Get a user by id.
#[utoipa::path(
    get,
    path = "/Users",
    tag = USER_TAG,
    params(GetUser),
    responses(
        (status = 200, description = "The user", body = UserDto),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse)
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    QueryParams(request): QueryParams<GetUser>,
) -> AppResult<Json<UserDto>> {
    let user = state.mediator.send(request, &cancel).await?;
    Ok(Json(user))
}

/// Find users by given names and/or last name.
///
/// Both criteria combine with OR; at least one must be supplied.
#[utoipa::path(
    get,
    path = "/Users/Find",
    tag = USER_TAG,
    params(FindUsers),
    responses(
        (status = 200, description = "Matching users", body = Vec<UserDto>),
        (status = 400, description = "No criteria supplied", body = ErrorResponse),
        (status = 404, description = "No user matches", body = ErrorResponse)
    )
)]
async fn find_users(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    QueryParams(request): QueryParams<FindUsers>,
) -> AppResult<Json<Vec<UserDto>>> {
    let users = state.mediator.send(request, &cancel).await?;
    Ok(Json(users))
}

/// List one page of users in ascending id order.
#[utoipa::path(
    get,
    path = "/Users/List",
    tag = USER_TAG,
    params(ListUsers),
    responses(
        (status = 200, description = "One page of users", body = PaginatedDto<UserDto>),
        (status = 400, description = "Invalid paging", body = ErrorResponse),
        (status = 404, description = "The store is empty", body = ErrorResponse)
    )
)]
async fn list_users(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    QueryParams(request): QueryParams<ListUsers>,
) -> AppResult<Json<PaginatedDto<UserDto>>> {
    let page = state.mediator.send(request, &cancel).await?;
    Ok(Json(page))
}

/// Create a user.
#[utoipa::path(
    post,
    path = "/Users",
    tag = USER_TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserDto,
            headers(("Location" = String, description = "Where the new user can be fetched"))),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    JsonBody(request): JsonBody<CreateUser>,
) -> AppResult<(StatusCode, [(header::HeaderName, String); 1], Json<UserDto>)> {
    let user = state.mediator.send(request, &cancel).await?;
    let location = user_location(user.user_id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(user)))
}

/// Replace a user's names and contact detail.
#[utoipa::path(
    put,
    path = "/Users",
    tag = USER_TAG,
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    JsonBody(request): JsonBody<UpdateUser>,
) -> AppResult<Json<UserDto>> {
    let user = state.mediator.send(request, &cancel).await?;
    Ok(Json(user))
}

/// Delete a user by id and return what was removed.
#[utoipa::path(
    delete,
    path = "/Users",
    tag = USER_TAG,
    params(DeleteUser),
    responses(
        (status = 200, description = "User deleted", body = UserDto),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "No user with this id", body = ErrorResponse)
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
    QueryParams(request): QueryParams<DeleteUser>,
) -> AppResult<Json<UserDto>> {
    let user = state.mediator.send(request, &cancel).await?;
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_location() {
        assert_eq!(user_location(12), "/Users?id=12");
    }

    #[test]
    fn test_routes_are_documented() {
        let (_, api) = user_routes().split_for_parts();
        let paths: Vec<&str> = api.paths.paths.keys().map(String::as_str).collect();
        assert_eq!(paths, vec!["/Users", "/Users/Find", "/Users/List"]);

        let users = &api.paths.paths["/Users"];
        assert!(users.get.is_some());
        assert!(users.post.is_some());
        assert!(users.put.is_some());
        assert!(users.delete.is_some());
    }
}
