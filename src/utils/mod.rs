pub mod cancel;
pub mod extract;

pub use cancel::ensure_active;
pub use extract::{JsonBody, QueryParams};
