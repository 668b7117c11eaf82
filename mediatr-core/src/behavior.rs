//! # Pipeline Behaviors
//!
//! Cross-cutting middleware wrapped around every request dispatch.
//!
//! Behaviors compose as an onion: each receives the request and a [`Next`]
//! that runs everything inside it (the remaining behaviors and finally the
//! handler). A behavior may:
//!
//! - run logic before and/or after calling `next`
//! - pass a derived [`Context`] downward
//! - skip `next` entirely and answer on the handler's behalf
//!
//! Behaviors see requests through the erased [`AnyRequest`] view, so one
//! behavior instance serves every request type.
//!
//! # Example
//!
//! ```rust
//! use mediatr_core::{AnyRequest, BoxError, BoxResponse, Context, Next, PipelineBehavior};
//!
//! struct Audit;
//!
//! impl PipelineBehavior for Audit {
//!     async fn handle<'a>(
//!         &'a self,
//!         ctx: Context,
//!         request: &'a dyn AnyRequest,
//!         next: Next<'a>,
//!     ) -> Result<BoxResponse, BoxError> {
//!         let _ = request.type_name();
//!         next.run(ctx).await
//!     }
//! }
//! ```

use crate::{
    context::Context,
    error::BoxError,
    handler::BoxFuture,
    message::{AnyRequest, BoxResponse, TypeKey},
};
use std::{fmt, future::Future, sync::Arc};

/// The rest of the pipeline, as seen from one behavior.
///
/// Consumed on call: the inner chain runs at most once per behavior.
pub struct Next<'a> {
    run: Box<dyn FnOnce(Context) -> BoxFuture<'a, Result<BoxResponse, BoxError>> + Send + 'a>,
}

impl<'a> Next<'a> {
    /// Wrap a continuation.
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(Context) -> BoxFuture<'a, Result<BoxResponse, BoxError>> + Send + 'a,
    {
        Self { run: Box::new(run) }
    }

    /// Invoke the inner chain with `ctx`.
    pub fn run(self, ctx: Context) -> BoxFuture<'a, Result<BoxResponse, BoxError>> {
        (self.run)(ctx)
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

/// Middleware wrapping request handling.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a pipeline behavior",
    label = "missing `PipelineBehavior` implementation",
    note = "Pipeline behaviors must implement `handle` and decide whether to call `next`."
)]
pub trait PipelineBehavior: Send + Sync + 'static {
    /// Wrap the inner chain.
    fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> impl Future<Output = Result<BoxResponse, BoxError>> + Send + 'a;
}

/// Object-safe version of [`PipelineBehavior`].
pub trait DynPipelineBehavior: Send + Sync + 'static {
    /// Wrap the inner chain (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<BoxResponse, BoxError>>;
}

impl<T: PipelineBehavior> DynPipelineBehavior for T {
    fn handle_dyn<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, Result<BoxResponse, BoxError>> {
        Box::pin(self.handle(ctx, request, next))
    }
}

/// A type-erased behavior remembering its concrete type.
///
/// The key is what makes a behavior unique in the mediator: two instances of
/// the same behavior type conflict, whatever their configuration.
#[derive(Clone)]
pub struct BoxedBehavior {
    key: TypeKey,
    behavior: Arc<dyn DynPipelineBehavior>,
}

impl BoxedBehavior {
    /// Erase `behavior`, keyed by its concrete type.
    pub fn new<B: PipelineBehavior>(behavior: B) -> Self {
        Self {
            key: TypeKey::of::<B>(),
            behavior: Arc::new(behavior),
        }
    }

    /// Key of the concrete behavior type.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The shared behavior object.
    pub fn behavior(&self) -> &Arc<dyn DynPipelineBehavior> {
        &self.behavior
    }

    /// Split into key and behavior.
    pub fn into_parts(self) -> (TypeKey, Arc<dyn DynPipelineBehavior>) {
        (self.key, self.behavior)
    }
}

impl fmt::Debug for BoxedBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoxedBehavior").field(&self.key).finish()
    }
}
