//! The process-wide mediator.
//!
//! Free functions forwarding to one lazily created [`Mediator`]. Prefer an
//! owned `Mediator` where it can be passed around; the shared instance is
//! for code that expects a single mediator per process.
//!
//! Tests touching the shared instance should reset it with the `clear_*`
//! functions.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediatr::global;
//!
//! global::register_request_handler::<Ping, _>(PingHandler)?;
//! let pong = global::send_with_response(&Context::background(), Ping).await?;
//! ```

use crate::orchestrator::Mediator;
use lazy_static::lazy_static;
use mediatr_core::{
    BoxError, BoxedBehavior, Context, MediatorError, Message, NotificationBinding,
    NotificationHandler, PipelineBehavior, Request, RequestHandler,
};

lazy_static! {
    static ref INSTANCE: Mediator = Mediator::new();
}

/// The shared mediator.
pub fn instance() -> &'static Mediator {
    &INSTANCE
}

/// See [`Mediator::register_request_handler`].
pub fn register_request_handler<R, H>(handler: H) -> Result<(), MediatorError>
where
    R: Request,
    H: RequestHandler<R>,
{
    INSTANCE.register_request_handler::<R, H>(handler)
}

/// See [`Mediator::register_request_handler_factory`].
pub fn register_request_handler_factory<R, F, H>(factory: F) -> Result<(), MediatorError>
where
    R: Request,
    F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
    H: RequestHandler<R>,
{
    INSTANCE.register_request_handler_factory::<R, F, H>(factory)
}

/// See [`Mediator::register_pipeline_behavior`].
pub fn register_pipeline_behavior<B: PipelineBehavior>(behavior: B) -> Result<(), MediatorError> {
    INSTANCE.register_pipeline_behavior(behavior)
}

/// See [`Mediator::register_pipeline_behaviors`].
pub fn register_pipeline_behaviors<I>(behaviors: I) -> Result<(), MediatorError>
where
    I: IntoIterator<Item = BoxedBehavior>,
{
    INSTANCE.register_pipeline_behaviors(behaviors)
}

/// See [`Mediator::send`].
pub async fn send<R>(ctx: &Context, request: R) -> Result<(), MediatorError>
where
    R: Request<Response = ()>,
{
    INSTANCE.send(ctx, request).await
}

/// See [`Mediator::send_with_response`].
pub async fn send_with_response<R: Request>(
    ctx: &Context,
    request: R,
) -> Result<R::Response, MediatorError> {
    INSTANCE.send_with_response(ctx, request).await
}

/// See [`Mediator::register_notification_handler`].
pub fn register_notification_handler<N, H>(handler: H)
where
    N: Message,
    H: NotificationHandler<N>,
{
    INSTANCE.register_notification_handler::<N, H>(handler);
}

/// See [`Mediator::register_notification_handlers`].
pub fn register_notification_handlers<N, I>(bindings: I)
where
    N: Message,
    I: IntoIterator<Item = NotificationBinding<N>>,
{
    INSTANCE.register_notification_handlers(bindings);
}

/// See [`Mediator::register_notification_handler_factory`].
pub fn register_notification_handler_factory<N, F, H>(factory: F)
where
    N: Message,
    F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
    H: NotificationHandler<N>,
{
    INSTANCE.register_notification_handler_factory::<N, F, H>(factory);
}

/// See [`Mediator::register_notification_handler_factories`].
pub fn register_notification_handler_factories<N, I, F, H>(factories: I)
where
    N: Message,
    I: IntoIterator<Item = F>,
    F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
    H: NotificationHandler<N>,
{
    INSTANCE.register_notification_handler_factories::<N, I, F, H>(factories);
}

/// See [`Mediator::publish`].
pub async fn publish<N: Message>(ctx: &Context, notification: N) -> Result<(), MediatorError> {
    INSTANCE.publish(ctx, notification).await
}

/// See [`Mediator::publish_with`].
pub async fn publish_with<N, I>(
    ctx: &Context,
    notification: N,
    one_off: I,
) -> Result<(), MediatorError>
where
    N: Message,
    I: IntoIterator<Item = NotificationBinding<N>>,
{
    INSTANCE.publish_with(ctx, notification, one_off).await
}

/// Remove every request handler from the shared mediator.
pub fn clear_request_handlers() {
    INSTANCE.clear_request_handlers();
}

/// Remove every pipeline behavior from the shared mediator.
pub fn clear_pipeline_behaviors() {
    INSTANCE.clear_pipeline_behaviors();
}

/// Remove every notification subscriber from the shared mediator.
pub fn clear_notification_handlers() {
    INSTANCE.clear_notification_handlers();
}
