//! Testing utilities for mediatr.
//!
//! This module provides utilities to make testing handlers, behaviors and
//! subscribers easier.
//!
//! # Features
//!
//! - [`CallLog`]: A shared, ordered log of what ran
//! - [`RecordingBehavior`]: A behavior that logs around `next` and can short-circuit
//! - [`RecordingSubscriber`]: A subscriber that records notifications and returns a scripted outcome
//! - [`CountingHandler`]: A request handler that counts invocations

use mediatr_core::{
    AnyRequest, BoxError, BoxResponse, Context, Message, Next, NotificationHandler,
    PipelineBehavior, Propagation, Request, RequestHandler,
};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

// ============================================================================
// Call Log
// ============================================================================

/// A shared, append-only log of labels.
///
/// Clones share the same log, so one handle can be given to every
/// component under test and inspected afterwards.
#[derive(Clone, Default, Debug)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn push(&self, label: impl Into<String>) {
        self.entries.lock().push(label.into());
    }

    /// A copy of the labels, in order.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every label.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

/// Error returned by scripted test components.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TestError(pub String);

// ============================================================================
// Recording Behavior
// ============================================================================

/// A behavior that logs `behavior-{ID}:before` and `behavior-{ID}:after`
/// around the inner chain.
///
/// The const `ID` makes each numbered behavior a distinct type, so several
/// can be registered in the same mediator.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// mediator.register_pipeline_behavior(RecordingBehavior::<1>::new(log.clone()))?;
/// mediator.register_pipeline_behavior(RecordingBehavior::<2>::new(log.clone()))?;
/// ```
pub struct RecordingBehavior<const ID: usize> {
    log: CallLog,
    respond: Option<fn() -> BoxResponse>,
}

impl<const ID: usize> RecordingBehavior<ID> {
    /// A behavior that always calls `next`.
    pub fn new(log: CallLog) -> Self {
        Self { log, respond: None }
    }

    /// A behavior that never calls `next` and answers with `respond()`.
    pub fn short_circuit(log: CallLog, respond: fn() -> BoxResponse) -> Self {
        Self {
            log,
            respond: Some(respond),
        }
    }

    /// The label prefix used in the log.
    pub fn label() -> String {
        format!("behavior-{}", ID)
    }
}

impl<const ID: usize> PipelineBehavior for RecordingBehavior<ID> {
    async fn handle<'a>(
        &'a self,
        ctx: Context,
        _request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> Result<BoxResponse, BoxError> {
        self.log.push(format!("{}:before", Self::label()));
        let result = match self.respond {
            Some(respond) => Ok(respond()),
            None => next.run(ctx).await,
        };
        self.log.push(format!("{}:after", Self::label()));
        result
    }
}

// ============================================================================
// Recording Subscriber
// ============================================================================

/// What a [`RecordingSubscriber`] returns after recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Return `Propagation::Continue`.
    Continue,
    /// Return `Propagation::Stop`.
    Stop,
    /// Return a [`TestError`] with this message.
    Fail(String),
}

/// A notification handler that records what it receives.
///
/// Each call also appends `name` to the shared [`CallLog`], which makes
/// delivery order across several subscribers observable.
pub struct RecordingSubscriber<N: Clone> {
    name: String,
    log: CallLog,
    received: Arc<Mutex<Vec<N>>>,
    outcome: Outcome,
}

impl<N: Clone> RecordingSubscriber<N> {
    /// A subscriber that lets propagation continue.
    pub fn new(name: impl Into<String>, log: CallLog) -> Self {
        Self::with_outcome(name, log, Outcome::Continue)
    }

    /// A subscriber returning `outcome`.
    pub fn with_outcome(name: impl Into<String>, log: CallLog, outcome: Outcome) -> Self {
        Self {
            name: name.into(),
            log,
            received: Arc::new(Mutex::new(Vec::new())),
            outcome,
        }
    }

    /// A copy of the received notifications.
    pub fn received(&self) -> Vec<N> {
        self.received.lock().clone()
    }

    /// Number of notifications received.
    pub fn count(&self) -> usize {
        self.received.lock().len()
    }
}

impl<N: Clone> Clone for RecordingSubscriber<N> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            log: self.log.clone(),
            received: Arc::clone(&self.received),
            outcome: self.outcome.clone(),
        }
    }
}

impl<N: Message + Clone> NotificationHandler<N> for RecordingSubscriber<N> {
    async fn handle(&self, _ctx: &Context, notification: &N) -> Result<Propagation, BoxError> {
        self.received.lock().push(notification.clone());
        self.log.push(self.name.clone());
        match &self.outcome {
            Outcome::Continue => Ok(Propagation::Continue),
            Outcome::Stop => Ok(Propagation::Stop),
            Outcome::Fail(message) => Err(Box::new(TestError(message.clone()))),
        }
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A request handler that counts invocations and returns the default
/// response.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// mediator.register_request_handler::<Ping, _>(counter.clone())?;
///
/// mediator.send(&ctx, Ping).await?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default, Debug)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<R> RequestHandler<R> for CountingHandler
where
    R: Request,
    R::Response: Default,
{
    async fn handle(&self, _ctx: &Context, _request: &R) -> Result<R::Response, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(R::Response::default())
    }
}
