//! Per-request cancellation.
//!
//! Each request gets a fresh [`CancellationToken`] in its extensions. The
//! token is cancelled when the request future completes or is dropped, e.g.
//! because the client went away, so in-flight pipelines stop early.

use axum::{extract::Request, middleware::Next, response::Response};
use tokio_util::sync::CancellationToken;

/// Inserts a request-scoped [`CancellationToken`] for handlers to extract
/// with `Extension<CancellationToken>`.
pub async fn cancellation_middleware(mut request: Request, next: Next) -> Response {
    let token = CancellationToken::new();
    let _guard = token.clone().drop_guard();
    request.extensions_mut().insert(token);
    next.run(request).await
}
