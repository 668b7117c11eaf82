//! # Request Handlers
//!
//! A request is handled by exactly one [`RequestHandler`]. The handler can be
//! bound directly, or lazily through a [`RequestHandlerFactory`] that builds a
//! fresh handler from the call [`Context`] on every dispatch.
//!
//! # Static vs Dynamic Dispatch
//!
//! [`RequestHandler`] uses native `async fn` for implementors. The mediator
//! stores handlers as trait objects through the object-safe
//! [`DynRequestHandler`], which every `RequestHandler` implements
//! automatically.
//!
//! # Example
//!
//! ```rust
//! use mediatr_core::{BoxError, Context, Request, RequestHandler};
//!
//! #[derive(Debug)]
//! struct Add(i64, i64);
//!
//! impl Request for Add {
//!     type Response = i64;
//! }
//!
//! struct Adder;
//!
//! impl RequestHandler<Add> for Adder {
//!     async fn handle(&self, _ctx: &Context, request: &Add) -> Result<i64, BoxError> {
//!         Ok(request.0 + request.1)
//!     }
//! }
//! ```

use crate::{context::Context, error::BoxError, message::Request};
use std::{future::Future, pin::Pin, sync::Arc};

/// A boxed, `Send` future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handles one request type, producing its response.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle requests of type `{R}`",
    label = "missing `RequestHandler<{R}>` implementation",
    note = "Request handlers must implement `handle` for the request type `{R}`."
)]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    /// Handle the request.
    fn handle(
        &self,
        ctx: &Context,
        request: &R,
    ) -> impl Future<Output = Result<R::Response, BoxError>> + Send;
}

/// Object-safe version of [`RequestHandler`].
pub trait DynRequestHandler<R: Request>: Send + Sync + 'static {
    /// Handle the request (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        request: &'a R,
    ) -> BoxFuture<'a, Result<R::Response, BoxError>>;
}

impl<R: Request, T: RequestHandler<R>> DynRequestHandler<R> for T {
    fn handle_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        request: &'a R,
    ) -> BoxFuture<'a, Result<R::Response, BoxError>> {
        Box::pin(self.handle(ctx, request))
    }
}

/// Builds a request handler from the call context.
///
/// Implemented for any `Fn(Context) -> Result<H, BoxError>` where `H` is a
/// [`RequestHandler`]; the closure receives its own clone of the context.
pub trait RequestHandlerFactory<R: Request>: Send + Sync + 'static {
    /// Create a handler for a single dispatch.
    fn create(&self, ctx: &Context) -> Result<Box<dyn DynRequestHandler<R>>, BoxError>;
}

impl<R, F, H> RequestHandlerFactory<R> for F
where
    R: Request,
    F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
    H: RequestHandler<R>,
{
    fn create(&self, ctx: &Context) -> Result<Box<dyn DynRequestHandler<R>>, BoxError> {
        Ok(Box::new((self)(ctx.clone())?))
    }
}

/// What a request type is bound to: a ready handler or a factory.
pub enum HandlerBinding<R: Request> {
    /// A shared handler instance, reused for every dispatch.
    Handler(Arc<dyn DynRequestHandler<R>>),
    /// A factory invoked with the call context on every dispatch.
    Factory(Arc<dyn RequestHandlerFactory<R>>),
}

impl<R: Request> HandlerBinding<R> {
    /// Bind a handler instance.
    pub fn handler<H: RequestHandler<R>>(handler: H) -> Self {
        HandlerBinding::Handler(Arc::new(handler))
    }

    /// Bind a handler factory.
    pub fn factory<F, H>(factory: F) -> Self
    where
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: RequestHandler<R>,
    {
        HandlerBinding::Factory(Arc::new(factory))
    }

    /// Produce the handler to run for this call.
    ///
    /// Factory errors are returned unchanged.
    pub fn resolve(&self, ctx: &Context) -> Result<Arc<dyn DynRequestHandler<R>>, BoxError> {
        match self {
            HandlerBinding::Handler(handler) => Ok(Arc::clone(handler)),
            HandlerBinding::Factory(factory) => factory.create(ctx).map(Arc::from),
        }
    }
}

impl<R: Request> Clone for HandlerBinding<R> {
    fn clone(&self) -> Self {
        match self {
            HandlerBinding::Handler(h) => HandlerBinding::Handler(Arc::clone(h)),
            HandlerBinding::Factory(f) => HandlerBinding::Factory(Arc::clone(f)),
        }
    }
}

impl<R: Request> std::fmt::Debug for HandlerBinding<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = match self {
            HandlerBinding::Handler(_) => "Handler",
            HandlerBinding::Factory(_) => "Factory",
        };
        write!(f, "HandlerBinding::{}<{}>", shape, std::any::type_name::<R>())
    }
}
