use tokio_util::sync::CancellationToken;

use crate::error::{AppError, AppResult};

/// Returns `Cancelled` once the token has fired.
pub fn ensure_active(cancel: &CancellationToken) -> AppResult<()> {
    if cancel.is_cancelled() {
        Err(AppError::Cancelled)
    } else {
        Ok(())
    }
}
