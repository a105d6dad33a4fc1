//! Application state for Axum web framework.
//!
//! Contains the shared services and the request mediator that every
//! handler reaches through the `State` extractor.

use std::sync::Arc;

use crate::mediator::Mediator;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state shared by all request handlers.
///
/// Cloning is cheap: services hold `Arc`ed repositories and the mediator is
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Business logic services, used directly by non-pipeline endpoints
    pub services: Services,
    /// Dispatches typed requests through their behaviour pipelines
    pub mediator: Arc<Mediator>,
}

impl AppState {
    /// Builds services and the mediator over the given repositories.
    ///
    /// # Example
    /// ```ignore
    /// let repos = Repositories::in_memory(&settings.store)?;
    /// let state = AppState::new(repos);
    /// ```
    pub fn new(repos: Repositories) -> Self {
        let services = Services::new(repos);
        let mediator = Arc::new(Mediator::new(&services));
        Self { services, mediator }
    }
}
