//! Router configuration for the API.
//!
//! This module provides centralized route registration, OpenAPI document
//! assembly and middleware configuration for the application.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    cancellation_middleware, error_response_middleware, logging_middleware,
    request_id_middleware,
};
use crate::config::ServerConfig;
use crate::state::AppState;

/// Location of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";
/// Swagger UI mount point.
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. Compression and CORS
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
/// 4. Error responses - stamps request IDs onto error bodies
/// 5. Cancellation - one token per request, cancelled when the request ends
///
/// # Routes
/// - `/Users`, `/Users/Find`, `/Users/List` - user use cases
/// - `/health` - health check
/// - `/swagger-ui`, `/api-docs/openapi.json` - when `openapi_enabled`
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::users::user_routes())
        .merge(handlers::health::health_routes())
        .split_for_parts();

    let router = if server.openapi_enabled {
        router.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_PATH, api))
    } else {
        router
    };

    router
        .layer(middleware::from_fn(cancellation_middleware))
        .layer(middleware::from_fn(error_response_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::repositories::{Repositories, sample_users};
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use axum::response::Response;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app(seed_sample_data: bool) -> Router {
        let repos = Repositories::in_memory(&StoreConfig { seed_sample_data }).unwrap();
        create_router(AppState::new(repos), &ServerConfig::default())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn send_json(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn new_user_body() -> Value {
        json!({
            "givenNames": "Katherine",
            "lastName": "Johnson",
            "emailAddress": "katherine@example.com",
            "mobileNumber": "555-0142"
        })
    }

    #[tokio::test]
    async fn test_get_user_by_id() {
        let response = app(true).oneshot(get("/Users?id=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));

        let json = body_json(response).await;
        assert_eq!(json["userId"], 1);
        assert_eq!(json["givenNames"], sample_users()[0].given_names);
    }

    #[tokio::test]
    async fn test_get_missing_user_is_404_with_request_id() {
        let request = Request::builder()
            .uri("/Users?id=999")
            .header("x-request-id", "trace-me")
            .body(Body::empty())
            .unwrap();

        let response = app(true).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = body_json(response).await;
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "The user '999' could not be found");
        assert_eq!(json["request_id"], "trace-me");
    }

    #[tokio::test]
    async fn test_zero_id_is_validation_error() {
        let response = app(true).oneshot(get("/Users?id=0")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0]["field"], "id");
        assert_eq!(
            json["details"]["errors"][0]["message"],
            "'Id' must be greater than '0'."
        );
    }

    #[tokio::test]
    async fn test_malformed_query_is_bad_request() {
        let response = app(true).oneshot(get("/Users?id=abc")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_create_returns_201_with_location() {
        let app = app(true);
        let response = app
            .clone()
            .oneshot(send_json(Method::POST, "/Users", new_user_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let expected_id = sample_users().len() + 1;
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, format!("/Users?id={expected_id}"));

        let created = body_json(response).await;
        assert_eq!(created["lastName"], "Johnson");

        let fetched = app.oneshot(get(&location)).await.unwrap();
        assert_eq!(fetched.status(), StatusCode::OK);
        assert_eq!(body_json(fetched).await, created);
    }

    #[tokio::test]
    async fn test_create_with_blank_field_names_it() {
        let mut body = new_user_body();
        body["emailAddress"] = json!("");

        let response = app(false)
            .oneshot(send_json(Method::POST, "/Users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        let errors = json["details"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "emailAddress");
    }

    #[tokio::test]
    async fn test_create_with_missing_field_names_it() {
        let mut body = new_user_body();
        body.as_object_mut().unwrap().remove("emailAddress");

        let response = app(false)
            .oneshot(send_json(Method::POST, "/Users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        let errors = json["details"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "emailAddress");
        assert_eq!(errors[0]["message"], "'Email Address' must not be empty.");
    }

    #[tokio::test]
    async fn test_get_without_id_is_validation_error() {
        let response = app(true).oneshot(get("/Users")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["details"]["errors"][0]["field"], "id");
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let app = app(true);
        let mut body = new_user_body();
        body["id"] = json!(2);

        let response = app
            .clone()
            .oneshot(send_json(Method::PUT, "/Users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["givenNames"], "Katherine");

        let delete = Request::builder()
            .method(Method::DELETE)
            .uri("/Users?id=2")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["userId"], 2);

        let response = app.oneshot(get("/Users?id=2")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_404() {
        let mut body = new_user_body();
        body["id"] = json!(404);
        body["givenNames"] = json!("");

        let response = app(true)
            .oneshot(send_json(Method::PUT, "/Users", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_find_by_last_name() {
        let last_name = &sample_users()[1].last_name;
        let response = app(true)
            .oneshot(get(&format!("/Users/Find?lastName={last_name}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let users = json.as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0]["lastName"], last_name.as_str());
    }

    #[tokio::test]
    async fn test_find_without_criteria_is_validation_error() {
        let response = app(true).oneshot(get("/Users/Find")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_list_first_page() {
        let response = app(true)
            .oneshot(get("/Users/List?pageNumber=1&itemsPerPage=2"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"][0]["userId"], 1);
        assert_eq!(json["hasNextPage"], true);
    }

    #[tokio::test]
    async fn test_list_without_page_number_is_validation_error() {
        let response = app(true).oneshot(get("/Users/List")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
        let errors = json["details"]["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0]["field"], "pageNumber");
        assert_eq!(errors[0]["message"], "'Page Number' must be greater than '0'.");
    }

    #[tokio::test]
    async fn test_list_empty_store_is_404() {
        let response = app(false)
            .oneshot(get("/Users/List?pageNumber=1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "No users could be found");
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(true).oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["userCount"], sample_users().len());
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = app(true).oneshot(get("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_toggle() {
        let response = app(false).oneshot(get(OPENAPI_PATH)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["paths"]["/Users"].is_object());
        assert!(json["paths"]["/Users/List"].is_object());
        assert!(json["paths"]["/health"].is_object());

        let repos = Repositories::in_memory(&StoreConfig::default()).unwrap();
        let server = ServerConfig {
            openapi_enabled: false,
            ..ServerConfig::default()
        };
        let response = create_router(AppState::new(repos), &server)
            .oneshot(get(OPENAPI_PATH))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
