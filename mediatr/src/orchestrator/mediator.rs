//! The mediator facade and its builder.

use super::{publisher::Publisher, sender::Sender};
use mediatr_core::{
    BoxError, BoxedBehavior, Context, HandlerBinding, MediatorError, Message, NotificationBinding,
    NotificationHandler, PipelineBehavior, Request, RequestHandler,
};

/// One request dispatcher and one notification bus behind a single API.
///
/// A `Mediator` owns its registries, so separate instances never see each
/// other's registrations. The process-wide instance lives in
/// [`crate::global`].
#[derive(Default, Debug)]
pub struct Mediator {
    sender: Sender,
    publisher: Publisher,
}

impl Mediator {
    /// Create an empty mediator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a [`MediatorBuilder`].
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// The request dispatcher.
    pub fn sender(&self) -> &Sender {
        &self.sender
    }

    /// The notification bus.
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    // ------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------

    /// See [`Sender::register_handler`].
    pub fn register_request_handler<R, H>(&self, handler: H) -> Result<(), MediatorError>
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.sender.register_handler::<R, H>(handler)
    }

    /// See [`Sender::register_handler_factory`].
    pub fn register_request_handler_factory<R, F, H>(
        &self,
        factory: F,
    ) -> Result<(), MediatorError>
    where
        R: Request,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: RequestHandler<R>,
    {
        self.sender.register_handler_factory::<R, F, H>(factory)
    }

    /// See [`Sender::register_binding`].
    pub fn register_request_binding<R: Request>(
        &self,
        binding: HandlerBinding<R>,
    ) -> Result<(), MediatorError> {
        self.sender.register_binding(binding)
    }

    /// See [`Sender::register_pipeline_behavior`].
    pub fn register_pipeline_behavior<B: PipelineBehavior>(
        &self,
        behavior: B,
    ) -> Result<(), MediatorError> {
        self.sender.register_pipeline_behavior(behavior)
    }

    /// See [`Sender::register_pipeline_behaviors`].
    pub fn register_pipeline_behaviors<I>(&self, behaviors: I) -> Result<(), MediatorError>
    where
        I: IntoIterator<Item = BoxedBehavior>,
    {
        self.sender.register_pipeline_behaviors(behaviors)
    }

    /// See [`Sender::send`].
    pub async fn send<R>(&self, ctx: &Context, request: R) -> Result<(), MediatorError>
    where
        R: Request<Response = ()>,
    {
        self.sender.send(ctx, request).await
    }

    /// See [`Sender::send_with_response`].
    pub async fn send_with_response<R: Request>(
        &self,
        ctx: &Context,
        request: R,
    ) -> Result<R::Response, MediatorError> {
        self.sender.send_with_response(ctx, request).await
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    /// See [`Publisher::register_handler`].
    pub fn register_notification_handler<N, H>(&self, handler: H)
    where
        N: Message,
        H: NotificationHandler<N>,
    {
        self.publisher.register_handler::<N, H>(handler);
    }

    /// See [`Publisher::register_handlers`].
    pub fn register_notification_handlers<N, I>(&self, bindings: I)
    where
        N: Message,
        I: IntoIterator<Item = NotificationBinding<N>>,
    {
        self.publisher.register_handlers(bindings);
    }

    /// See [`Publisher::register_handler_factory`].
    pub fn register_notification_handler_factory<N, F, H>(&self, factory: F)
    where
        N: Message,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        self.publisher.register_handler_factory::<N, F, H>(factory);
    }

    /// See [`Publisher::register_handler_factories`].
    pub fn register_notification_handler_factories<N, I, F, H>(&self, factories: I)
    where
        N: Message,
        I: IntoIterator<Item = F>,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        self.publisher
            .register_handler_factories::<N, I, F, H>(factories);
    }

    /// See [`Publisher::publish`].
    pub async fn publish<N: Message>(
        &self,
        ctx: &Context,
        notification: N,
    ) -> Result<(), MediatorError> {
        self.publisher.publish(ctx, notification).await
    }

    /// See [`Publisher::publish_with`].
    pub async fn publish_with<N, I>(
        &self,
        ctx: &Context,
        notification: N,
        one_off: I,
    ) -> Result<(), MediatorError>
    where
        N: Message,
        I: IntoIterator<Item = NotificationBinding<N>>,
    {
        self.publisher.publish_with(ctx, notification, one_off).await
    }

    // ------------------------------------------------------------------
    // Reset
    // ------------------------------------------------------------------

    /// Remove every request handler.
    pub fn clear_request_handlers(&self) {
        self.sender.clear_handlers();
    }

    /// Remove every pipeline behavior.
    pub fn clear_pipeline_behaviors(&self) {
        self.sender.clear_pipeline_behaviors();
    }

    /// Remove every notification subscriber.
    pub fn clear_notification_handlers(&self) {
        self.publisher.clear_handlers();
    }

    /// Reset all three registries.
    pub fn clear(&self) {
        self.clear_request_handlers();
        self.clear_pipeline_behaviors();
        self.clear_notification_handlers();
    }
}

type Registration = Box<dyn FnOnce(&Mediator) -> Result<(), MediatorError> + Send>;

/// Builder for constructing a [`Mediator`].
///
/// Registrations are queued and applied in order by [`build`](Self::build),
/// which fails on the first conflict.
///
/// # Example
///
/// ```rust,ignore
/// let mediator = Mediator::builder()
///     .request_handler::<CreateUser, _>(CreateUserHandler)
///     .pipeline_behavior(LoggingBehavior::new())
///     .notification_handler::<UserCreated, _>(SendWelcomeMail)
///     .build()?;
/// ```
#[derive(Default)]
pub struct MediatorBuilder {
    registrations: Vec<Registration>,
}

impl MediatorBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn queue<F>(mut self, register: F) -> Self
    where
        F: FnOnce(&Mediator) -> Result<(), MediatorError> + Send + 'static,
    {
        self.registrations.push(Box::new(register));
        self
    }

    /// Queue a request handler.
    pub fn request_handler<R, H>(self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        self.queue(move |mediator| mediator.register_request_handler::<R, H>(handler))
    }

    /// Queue a request handler factory.
    pub fn request_handler_factory<R, F, H>(self, factory: F) -> Self
    where
        R: Request,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: RequestHandler<R>,
    {
        self.queue(move |mediator| mediator.register_request_handler_factory::<R, F, H>(factory))
    }

    /// Queue a pipeline behavior.
    pub fn pipeline_behavior<B: PipelineBehavior>(self, behavior: B) -> Self {
        self.queue(move |mediator| mediator.register_pipeline_behavior(behavior))
    }

    /// Queue a notification handler.
    pub fn notification_handler<N, H>(self, handler: H) -> Self
    where
        N: Message,
        H: NotificationHandler<N>,
    {
        self.queue(move |mediator| {
            mediator.register_notification_handler::<N, H>(handler);
            Ok(())
        })
    }

    /// Queue a notification handler factory.
    pub fn notification_handler_factory<N, F, H>(self, factory: F) -> Self
    where
        N: Message,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        self.queue(move |mediator| {
            mediator.register_notification_handler_factory::<N, F, H>(factory);
            Ok(())
        })
    }

    /// Number of queued registrations.
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Apply the queued registrations to a fresh [`Mediator`].
    pub fn build(self) -> Result<Mediator, MediatorError> {
        let mediator = Mediator::new();
        for register in self.registrations {
            register(&mediator)?;
        }
        Ok(mediator)
    }
}

impl std::fmt::Debug for MediatorBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediatorBuilder")
            .field("registrations", &self.registrations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediatr_std::testing::{CallLog, CountingHandler, RecordingBehavior, RecordingSubscriber};

    #[derive(Debug)]
    struct Tick;

    impl Request for Tick {
        type Response = ();
    }

    #[derive(Debug, Clone)]
    struct Ticked;

    #[tokio::test]
    async fn test_builder_applies_registrations() {
        let counter = CountingHandler::new();
        let log = CallLog::new();
        let builder = Mediator::builder()
            .request_handler::<Tick, _>(counter.clone())
            .pipeline_behavior(RecordingBehavior::<1>::new(log.clone()))
            .notification_handler::<Ticked, _>(RecordingSubscriber::new("s1", log.clone()));
        assert_eq!(builder.len(), 3);

        let mediator = builder.build().unwrap();
        let ctx = Context::background();
        mediator.send(&ctx, Tick).await.unwrap();
        mediator.publish(&ctx, Ticked).await.unwrap();

        assert_eq!(counter.count(), 1);
        assert_eq!(
            log.entries(),
            vec!["behavior-1:before", "behavior-1:after", "s1"]
        );
    }

    #[test]
    fn test_builder_surfaces_first_conflict() {
        let err = Mediator::builder()
            .request_handler::<Tick, _>(CountingHandler::new())
            .request_handler::<Tick, _>(CountingHandler::new())
            .build()
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mediator = Mediator::new();
        mediator
            .register_request_handler::<Tick, _>(CountingHandler::new())
            .unwrap();
        mediator
            .register_pipeline_behavior(RecordingBehavior::<1>::new(CallLog::new()))
            .unwrap();
        mediator.register_notification_handler::<Ticked, _>(RecordingSubscriber::new(
            "s1",
            CallLog::new(),
        ));

        mediator.clear();

        assert_eq!(mediator.sender().handler_count(), 0);
        assert_eq!(mediator.sender().behavior_count(), 0);
        assert_eq!(mediator.publisher().subscriber_count::<Ticked>(), 0);
    }
}
