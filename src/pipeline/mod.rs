//! Request dispatch pipeline.
//!
//! Every request type `R` has exactly one [`RequestHandler`] and an ordered
//! list of [`Behaviour`]s wrapped around it. The first behaviour added is the
//! outermost; each one decides whether and when to call [`Next::run`].
//!
//! ```text
//! send(request) -> Logging -> Validation -> handler
//! ```

mod logging;
mod validation;

pub use logging::LoggingBehaviour;
pub use validation::{FailureKind, FieldRules, ValidationBehaviour, ValidationFailure, Validator};

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::utils::ensure_active;

/// A typed command or query.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;

    /// Name used in logs
    const NAME: &'static str;
}

/// Business logic for one request type.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(&self, request: R, cancel: &CancellationToken) -> AppResult<R::Response>;
}

/// A cross-cutting step wrapped around a handler.
#[async_trait]
pub trait Behaviour<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
        next: Next<'_, R>,
    ) -> AppResult<R::Response>;
}

/// The remainder of the chain after the current behaviour.
pub struct Next<'a, R: Request> {
    behaviours: &'a [Arc<dyn Behaviour<R>>],
    handler: &'a dyn RequestHandler<R>,
}

impl<R: Request> Next<'_, R> {
    /// Invokes the next behaviour, or the handler once none remain.
    pub async fn run(self, request: R, cancel: &CancellationToken) -> AppResult<R::Response> {
        match self.behaviours.split_first() {
            Some((behaviour, rest)) => {
                let next = Next {
                    behaviours: rest,
                    handler: self.handler,
                };
                behaviour.handle(request, cancel, next).await
            }
            None => self.handler.handle(request, cancel).await,
        }
    }
}

/// A handler together with its behaviours.
pub struct Pipeline<R: Request> {
    behaviours: Vec<Arc<dyn Behaviour<R>>>,
    handler: Arc<dyn RequestHandler<R>>,
}

impl<R: Request> Pipeline<R> {
    pub fn new(handler: impl RequestHandler<R> + 'static) -> Self {
        Self {
            behaviours: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Appends a behaviour inside the ones already added.
    pub fn with_behaviour(mut self, behaviour: impl Behaviour<R> + 'static) -> Self {
        self.behaviours.push(Arc::new(behaviour));
        self
    }

    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len()
    }

    /// Runs the request through every behaviour and the handler.
    pub async fn send(&self, request: R, cancel: &CancellationToken) -> AppResult<R::Response> {
        ensure_active(cancel)?;
        Next {
            behaviours: &self.behaviours,
            handler: self.handler.as_ref(),
        }
        .run(request, cancel)
        .await
    }
}
