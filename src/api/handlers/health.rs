//! Health check endpoint handlers.
//!
//! The check asks the user store for its size, so a wedged store shows up
//! as `unhealthy` rather than a hung check.

use axum::{Extension, Json, extract::State, http::StatusCode};
use tokio_util::sync::CancellationToken;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Basic health check
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

/// Basic health check endpoint.
///
/// # Responses
/// - `200 OK` - Store answered
/// - `503 Service Unavailable` - Store failed to answer
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(
    State(state): State<AppState>,
    Extension(cancel): Extension<CancellationToken>,
) -> (StatusCode, Json<HealthResponse>) {
    let (status, code, user_count) = match state.services.users.count(&cancel).await {
        Ok(count) => (HealthStatus::Healthy, StatusCode::OK, Some(count)),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not count users");
            (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE, None)
        }
    };

    let response = HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        user_count,
    };
    (code, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::repositories::{Repositories, sample_users};

    fn state(seed_sample_data: bool) -> AppState {
        AppState::new(Repositories::in_memory(&StoreConfig { seed_sample_data }).unwrap())
    }

    #[tokio::test]
    async fn test_healthy_reports_user_count() {
        let (code, Json(response)) =
            health_check(State(state(true)), Extension(CancellationToken::new())).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.user_count, Some(sample_users().len()));
        assert_eq!(response.version, crate::pkg_version());
        assert!(response.timestamp.parse::<jiff::Timestamp>().is_ok());
    }

    #[tokio::test]
    async fn test_cancelled_health_check_is_unhealthy() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let (code, Json(response)) = health_check(State(state(false)), Extension(cancel)).await;
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.status, HealthStatus::Unhealthy);
        assert_eq!(response.user_count, None);
    }
}
