//! # Notification Handlers
//!
//! A notification is fanned out to zero or more subscribers, one after the
//! other. Each subscriber decides whether propagation continues by returning
//! a [`Propagation`].
//!
//! Like request handlers, subscribers can be bound as instances or as
//! factories; see [`NotificationBinding`].

use crate::{context::Context, error::BoxError, handler::BoxFuture, message::Message};
use std::{future::Future, sync::Arc};

/// Whether a notification keeps travelling to the next subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    /// The notification was observed; deliver it to the next subscriber.
    #[default]
    Continue,
    /// End propagation here. This is not a failure: the publish still
    /// reports success.
    Stop,
}

impl From<()> for Propagation {
    fn from(_: ()) -> Self {
        Propagation::Continue
    }
}

impl From<bool> for Propagation {
    /// `true` stops propagation.
    fn from(stop: bool) -> Self {
        if stop {
            Propagation::Stop
        } else {
            Propagation::Continue
        }
    }
}

/// Observes one notification type.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle notifications of type `{N}`",
    label = "missing `NotificationHandler<{N}>` implementation",
    note = "Notification handlers must implement `handle` for the notification type `{N}`."
)]
pub trait NotificationHandler<N: Message>: Send + Sync + 'static {
    /// Handle the notification.
    fn handle(
        &self,
        ctx: &Context,
        notification: &N,
    ) -> impl Future<Output = Result<Propagation, BoxError>> + Send;
}

/// Object-safe version of [`NotificationHandler`].
pub trait DynNotificationHandler<N: Message>: Send + Sync + 'static {
    /// Handle the notification (dynamic dispatch version).
    fn handle_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        notification: &'a N,
    ) -> BoxFuture<'a, Result<Propagation, BoxError>>;
}

impl<N: Message, T: NotificationHandler<N>> DynNotificationHandler<N> for T {
    fn handle_dyn<'a>(
        &'a self,
        ctx: &'a Context,
        notification: &'a N,
    ) -> BoxFuture<'a, Result<Propagation, BoxError>> {
        Box::pin(self.handle(ctx, notification))
    }
}

/// Builds a notification handler from the call context.
pub trait NotificationHandlerFactory<N: Message>: Send + Sync + 'static {
    /// Create a handler for a single publish.
    fn create(&self, ctx: &Context) -> Result<Box<dyn DynNotificationHandler<N>>, BoxError>;
}

impl<N, F, H> NotificationHandlerFactory<N> for F
where
    N: Message,
    F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
    H: NotificationHandler<N>,
{
    fn create(&self, ctx: &Context) -> Result<Box<dyn DynNotificationHandler<N>>, BoxError> {
        Ok(Box::new((self)(ctx.clone())?))
    }
}

/// A subscriber: a ready handler or a factory.
pub enum NotificationBinding<N: Message> {
    /// A shared handler instance.
    Handler(Arc<dyn DynNotificationHandler<N>>),
    /// A factory invoked with the call context on every publish.
    Factory(Arc<dyn NotificationHandlerFactory<N>>),
}

impl<N: Message> NotificationBinding<N> {
    /// Bind a handler instance.
    pub fn handler<H: NotificationHandler<N>>(handler: H) -> Self {
        NotificationBinding::Handler(Arc::new(handler))
    }

    /// Bind a handler factory.
    pub fn factory<F, H>(factory: F) -> Self
    where
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        NotificationBinding::Factory(Arc::new(factory))
    }

    /// Produce the handler to run for this call.
    pub fn resolve(
        &self,
        ctx: &Context,
    ) -> Result<Arc<dyn DynNotificationHandler<N>>, BoxError> {
        match self {
            NotificationBinding::Handler(handler) => Ok(Arc::clone(handler)),
            NotificationBinding::Factory(factory) => factory.create(ctx).map(Arc::from),
        }
    }
}

impl<N: Message> Clone for NotificationBinding<N> {
    fn clone(&self) -> Self {
        match self {
            NotificationBinding::Handler(h) => NotificationBinding::Handler(Arc::clone(h)),
            NotificationBinding::Factory(f) => NotificationBinding::Factory(Arc::clone(f)),
        }
    }
}

impl<N: Message> std::fmt::Debug for NotificationBinding<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shape = match self {
            NotificationBinding::Handler(_) => "Handler",
            NotificationBinding::Factory(_) => "Factory",
        };
        write!(f, "NotificationBinding::{}<{}>", shape, std::any::type_name::<N>())
    }
}
