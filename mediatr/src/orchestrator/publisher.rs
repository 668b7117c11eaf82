//! Notification fan-out.

use mediatr_core::{
    BoxError, Context, MediatorError, Message, NotificationBinding, NotificationHandler,
    Propagation, TypeKey,
};
use mediatr_std::collections::{Collection, Registry};
use std::{any::Any, sync::Arc};

/// Type-erased subscriber list of one notification type.
trait SubscriberList: Send + Sync {
    fn len(&self) -> usize;
    fn clear(&self);
    fn as_any(&self) -> &dyn Any;
}

impl<N: Message> SubscriberList for Collection<NotificationBinding<N>> {
    fn len(&self) -> usize {
        Collection::len(self)
    }

    fn clear(&self) {
        Collection::clear(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Delivers notifications to every subscriber, one at a time.
///
/// Subscribers run in registration order. Delivery stops early when a
/// subscriber returns [`Propagation::Stop`] (reported as success) or an
/// error (returned to the caller).
#[derive(Default, Debug)]
pub struct Publisher {
    subscribers: Registry<TypeKey, Arc<dyn SubscriberList>>,
}

impl Publisher {
    /// Create a publisher with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn typed<N: Message>(list: &dyn SubscriberList) -> &Collection<NotificationBinding<N>> {
        match list.as_any().downcast_ref() {
            Some(list) => list,
            None => panic!(
                "subscriber list for `{}` holds another notification type",
                std::any::type_name::<N>()
            ),
        }
    }

    /// Subscribe `handler` to `N`.
    pub fn register_handler<N, H>(&self, handler: H)
    where
        N: Message,
        H: NotificationHandler<N>,
    {
        self.register_handlers([NotificationBinding::<N>::handler(handler)]);
    }

    /// Append subscribers to `N`, keeping their order.
    ///
    /// Accepts any mix of handler and factory bindings. The list for `N` is
    /// created and extended under the registry's exclusive lock, so a
    /// concurrent [`clear_handlers`](Self::clear_handlers) either sees all
    /// of `bindings` or none.
    pub fn register_handlers<N, I>(&self, bindings: I)
    where
        N: Message,
        I: IntoIterator<Item = NotificationBinding<N>>,
    {
        let bindings: Vec<_> = bindings.into_iter().collect();
        let added = bindings.len();
        self.subscribers.update_or_insert_with(
            TypeKey::of::<N>(),
            || -> Arc<dyn SubscriberList> {
                Arc::new(Collection::<NotificationBinding<N>>::with_capacity(added))
            },
            |list| {
                let list = Self::typed::<N>(&**list);
                bindings.into_iter().for_each(|binding| list.add(binding));
            },
        );

        #[cfg(feature = "tracing")]
        tracing::debug!(
            notification = std::any::type_name::<N>(),
            added,
            "notification handlers registered"
        );
    }

    /// Subscribe a factory building a handler for `N` on every publish.
    pub fn register_handler_factory<N, F, H>(&self, factory: F)
    where
        N: Message,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        self.register_handlers([NotificationBinding::<N>::factory(factory)]);
    }

    /// Subscribe several factories of the same shape, in order.
    pub fn register_handler_factories<N, I, F, H>(&self, factories: I)
    where
        N: Message,
        I: IntoIterator<Item = F>,
        F: Fn(Context) -> Result<H, BoxError> + Send + Sync + 'static,
        H: NotificationHandler<N>,
    {
        self.register_handlers(factories.into_iter().map(NotificationBinding::<N>::factory));
    }

    /// Deliver `notification` to the durable subscribers of `N`.
    ///
    /// Succeeds without doing anything when `N` has no subscribers.
    pub async fn publish<N: Message>(
        &self,
        ctx: &Context,
        notification: N,
    ) -> Result<(), MediatorError> {
        self.publish_with(ctx, notification, std::iter::empty())
            .await
    }

    /// Deliver `notification` to the durable subscribers of `N`, then to
    /// `one_off` in the given order.
    ///
    /// One-off subscribers only see this notification; they are not kept.
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
        let key = TypeKey::of::<N>();
        let mut subscribers = match self.subscribers.get(&key) {
            Some(list) => Self::typed::<N>(&*list).items(),
            None => Vec::new(),
        };
        subscribers.extend(one_off);

        if subscribers.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::trace!(notification = %key, "no subscribers");
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            notification = %key,
            subscribers = subscribers.len(),
            "publishing notification"
        );

        for binding in &subscribers {
            let handler = binding.resolve(ctx).map_err(MediatorError::Handler)?;
            match handler.handle_dyn(ctx, &notification).await {
                Ok(Propagation::Continue) => continue,
                Ok(Propagation::Stop) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(notification = %key, "propagation stopped");
                    return Ok(());
                }
                Err(err) => return Err(MediatorError::Handler(err)),
            }
        }
        Ok(())
    }

    /// Number of durable subscribers of `N`.
    pub fn subscriber_count<N: Message>(&self) -> usize {
        self.subscribers
            .get(&TypeKey::of::<N>())
            .map_or(0, |list| list.len())
    }

    /// Forget every subscriber list and empty it.
    pub fn clear_handlers(&self) {
        for list in self.subscribers.drain() {
            list.clear();
        }
    }
}
