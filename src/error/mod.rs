mod app_error;

pub use app_error::{AppError, AppResult, ValidationFieldError, field_errors, user_not_found_message};
