//! # Call Context
//!
//! The [`Context`] is threaded through every handler factory, handler and
//! pipeline behavior of a dispatch or publish call. It carries:
//!
//! - **Cancellation**: a tree of cancel flags; cancelling a context cancels
//!   every context derived from it, never its parent.
//! - **Deadline**: an optional instant after which the call is considered
//!   expired. Derived contexts can only shorten it.
//! - **Values**: a small typed bag (one value per type), copy-on-write.
//!
//! The mediator itself never inspects the context. Observing cancellation is
//! the responsibility of the handlers and behaviors that receive it.
//!
//! # Example
//!
//! ```rust
//! use mediatr_core::Context;
//! use std::time::Duration;
//!
//! #[derive(Debug, PartialEq)]
//! struct TraceId(u64);
//!
//! let (ctx, cancel) = Context::background()
//!     .with_value(TraceId(7))
//!     .with_timeout(Duration::from_secs(5))
//!     .with_cancel();
//!
//! assert_eq!(ctx.value::<TraceId>(), Some(&TraceId(7)));
//! assert!(ctx.check().is_ok());
//!
//! cancel.cancel();
//! assert!(ctx.is_cancelled());
//! ```

use crate::error::ContextError;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

type Values = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// The cancellable call context passed through the pipeline.
///
/// Cloning is cheap: all state is shared behind `Arc`s.
#[derive(Clone, Default)]
pub struct Context {
    values: Arc<Values>,
    cancel: Option<Arc<CancelNode>>,
    deadline: Option<Instant>,
}

struct CancelNode {
    cancelled: AtomicBool,
    parent: Option<Arc<CancelNode>>,
}

impl CancelNode {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.parent.as_ref().is_some_and(|p| p.is_cancelled())
    }
}

/// Cancels the context returned alongside it by [`Context::with_cancel`].
#[derive(Clone)]
pub struct CancelHandle(Arc<CancelNode>);

impl CancelHandle {
    /// Cancel the associated context and everything derived from it.
    pub fn cancel(&self) {
        self.0.cancelled.store(true, Ordering::Release);
    }

    /// Whether the associated context has been cancelled, directly or
    /// through an ancestor.
    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

impl Context {
    /// An empty root context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a context that additionally carries `value`.
    ///
    /// A value of the same type set on an ancestor is shadowed.
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let mut ctx = self.clone();
        Arc::make_mut(&mut ctx.values).insert(TypeId::of::<T>(), Arc::new(value));
        ctx
    }

    /// Look up the value of type `T`.
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref::<T>())
    }

    /// Derive a cancellable context.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let node = Arc::new(CancelNode {
            cancelled: AtomicBool::new(false),
            parent: self.cancel.clone(),
        });
        let ctx = Self {
            cancel: Some(Arc::clone(&node)),
            ..self.clone()
        };
        (ctx, CancelHandle(node))
    }

    /// Derive a context that expires at `deadline`, or at the current
    /// deadline if that is earlier.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(current) if current <= deadline => current,
            _ => deadline,
        };
        Self {
            deadline: Some(deadline),
            ..self.clone()
        }
    }

    /// Derive a context that expires `timeout` from now.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The instant at which this context expires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline. `Some(ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Whether the context was cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// `Ok(())` while the context is live, otherwise the reason it is not.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            return Err(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(ContextError::DeadlineExceeded),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("values", &self.values.len())
            .field("cancelled", &self.cancel.as_ref().is_some_and(|c| c.is_cancelled()))
            .field("deadline", &self.deadline)
            .finish()
    }
}
