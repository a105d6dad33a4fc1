use std::time::Instant;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio_util::sync::CancellationToken;

use super::{Behaviour, Next, Request};
use crate::error::AppResult;

/// Logs start, completion and failure of every request with its elapsed time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehaviour;

#[async_trait]
impl<R: Request> Behaviour<R> for LoggingBehaviour {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> AppResult<R::Response> {
        tracing::info!(
            request = R::NAME,
            started_at = %Timestamp::now(),
            "Starting request"
        );
        let start = Instant::now();

        let result = next.run(request, cancel).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(
                request = R::NAME,
                completed_at = %Timestamp::now(),
                elapsed_ms,
                "Completed request"
            ),
            Err(error) => tracing::warn!(
                request = R::NAME,
                failed_at = %Timestamp::now(),
                elapsed_ms,
                error = %error,
                "Request failed"
            ),
        }

        result
    }
}
