//! Request dispatch.
//!
//! A [`Sender`] binds each request type to exactly one handler and wraps
//! every dispatch in the registered pipeline behaviors.

use mediatr_core::{
    AnyRequest, AnyResponse, BoxError, BoxResponse, BoxedBehavior, Context, DynPipelineBehavior,
    HandlerBinding, MediatorError, Next, PipelineBehavior, Request, RequestHandler, TypeKey,
};
use mediatr_std::collections::Registry;
use std::{any::Any, sync::Arc};

/// Dispatches requests to their single handler through the behavior chain.
///
/// Behaviors are layered by registration order: the behavior registered
/// last is the outermost layer and runs first.
///
/// # Example
///
/// ```rust,ignore
/// let sender = Sender::new();
/// sender.register_handler::<CreateUser, _>(CreateUserHandler)?;
/// sender.register_pipeline_behavior(LoggingBehavior::new())?;
///
/// let id = sender.send_with_response(&ctx, CreateUser { name }).await?;
/// ```
#[derive(Default, Debug)]
pub struct Sender {
    handlers: Registry<TypeKey, Arc<dyn Any + Send + Sync>>,
    behaviors: Registry<TypeKey, Arc<dyn DynPipelineBehavior>>,
}

impl Sender {
    /// Create a sender with no handlers and no behaviors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` to the request type `R`.
    ///
    /// Fails with [`MediatorError::HandlerConflict`] if `R` is already bound;
    /// the existing binding is kept.
    pub fn register_handler<R, H>(&self, handler: H) -> Result<(), MediatorError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.register_binding(HandlerBinding::<R>::handler(handler))
    }

    /// Bind a factory building the handler for `R` on every dispatch.
    pub fn register_handler_factory<R, F, H>(&self, factory: F) -> Result<(), MediatorError>
    where
        R: Request,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: RequestHandler<R>,
    {
        self.register_binding(HandlerBinding::<R>::factory(factory))
    }

    /// Bind an already built [`HandlerBinding`].
    pub fn register_binding<R: Request>(
        &self,
        binding: HandlerBinding<R>,
    ) -> Result<(), MediatorError> {
        let key = TypeKey::of::<R>();
        match self.handlers.try_insert(key, Arc::new(binding)) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(request = %key, "request handler registered");
                Ok(())
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(request = %key, "request handler already registered");
                Err(MediatorError::HandlerConflict(key))
            }
        }
    }

    /// Add a pipeline behavior, keyed by its concrete type.
    ///
    /// A second behavior of the same type conflicts whatever its
    /// configuration.
    pub fn register_pipeline_behavior<B: PipelineBehavior>(
        &self,
        behavior: B,
    ) -> Result<(), MediatorError> {
        self.register_boxed_behavior(BoxedBehavior::new(behavior))
    }

    /// Add several behaviors in order.
    ///
    /// Stops at the first conflict; behaviors before it stay registered.
    pub fn register_pipeline_behaviors<I>(&self, behaviors: I) -> Result<(), MediatorError>
    where
        I: IntoIterator<Item = BoxedBehavior>,
    {
        behaviors
            .into_iter()
            .try_for_each(|behavior| self.register_boxed_behavior(behavior))
    }

    fn register_boxed_behavior(&self, behavior: BoxedBehavior) -> Result<(), MediatorError> {
        let (key, behavior) = behavior.into_parts();
        match self.behaviors.try_insert(key, behavior) {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(behavior = %key, "pipeline behavior registered");
                Ok(())
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(behavior = %key, "pipeline behavior already registered");
                Err(MediatorError::BehaviorConflict(key))
            }
        }
    }

    /// Dispatch a request whose response is `()`.
    pub async fn send<R>(&self, ctx: &Context, request: R) -> Result<(), MediatorError>
    where
        R: Request<Response = ()>,
    {
        self.send_with_response(ctx, request).await
    }

    /// Dispatch a request and return its typed response.
    ///
    /// # Errors
    ///
    /// - [`MediatorError::HandlerNotFound`] if nothing is bound to `R`;
    ///   no behavior runs in that case.
    /// - [`MediatorError::Handler`] wrapping whatever a factory, behavior or
    ///   the handler returned.
    ///
    /// # Panics
    ///
    /// If a behavior short-circuits with a response that is not
    /// `R::Response`.
    pub async fn send_with_response<R: Request>(
        &self,
        ctx: &Context,
        request: R,
    ) -> Result<R::Response, MediatorError> {
        let key = TypeKey::of::<R>();
        let Some(binding) = self.handlers.get(&key) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(request = %key, "no request handler");
            return Err(MediatorError::HandlerNotFound(key));
        };
        let binding = match Arc::downcast::<HandlerBinding<R>>(binding) {
            Ok(binding) => binding,
            Err(_) => panic!("binding for request `{key}` is not a request handler"),
        };
        let handler = binding.resolve(ctx).map_err(MediatorError::Handler)?;
        let behaviors = self.behaviors.values();

        #[cfg(feature = "tracing")]
        tracing::trace!(request = %key, behaviors = behaviors.len(), "dispatching request");

        let request = &request;
        let handler = &*handler;
        let mut next = Next::new(move |ctx: Context| {
            Box::pin(async move {
                handler
                    .handle_dyn(&ctx, request)
                    .await
                    .map(|response| Box::new(response) as BoxResponse)
            })
        });
        for behavior in &behaviors {
            let behavior = &**behavior;
            let inner = next;
            next = Next::new(move |ctx: Context| {
                behavior.handle_dyn(ctx, request as &dyn AnyRequest, inner)
            });
        }

        let response = next.run(ctx.clone()).await.map_err(MediatorError::Handler)?;
        let type_name = (*response).type_name();
        match AnyResponse::into_any(response).downcast::<R::Response>() {
            Ok(response) => Ok(*response),
            Err(_) => panic!(
                "request `{key}` expects a `{}` response, got `{type_name}`",
                std::any::type_name::<R::Response>()
            ),
        }
    }

    /// Whether a handler is bound to `R`.
    pub fn has_handler<R: Request>(&self) -> bool {
        self.handlers.contains_key(&TypeKey::of::<R>())
    }

    /// Number of bound request types.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Number of registered behaviors.
    pub fn behavior_count(&self) -> usize {
        self.behaviors.len()
    }

    /// Remove every handler binding.
    pub fn clear_handlers(&self) {
        self.handlers.clear();
    }

    /// Remove every pipeline behavior.
    pub fn clear_pipeline_behaviors(&self) {
        self.behaviors.clear();
    }
}
