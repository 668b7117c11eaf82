//! Error types for mediatr.
//!
//! Two tiers of failure exist:
//!
//! - [`MediatorError`] - expected, recoverable failures returned to callers
//!   (registration conflicts, missing handlers, downstream handler errors).
//! - Contract violations (a stored binding of the wrong shape, a pipeline
//!   response of the wrong type) are defects and `panic!` instead.

use crate::message::TypeKey;
use std::time::Duration;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by request dispatch and registration.
#[derive(Error, Debug)]
pub enum MediatorError {
    /// A handler is already bound to this request type.
    #[error("`{0}` request handler already was registered")]
    HandlerConflict(TypeKey),

    /// No handler is bound to this request type.
    #[error("`{0}` request handler not found")]
    HandlerNotFound(TypeKey),

    /// A behavior of this concrete type is already registered.
    #[error("`{0}` behavior already was registered")]
    BehaviorConflict(TypeKey),

    /// An error produced by a handler, factory or pipeline behavior.
    ///
    /// The original error is kept as-is; its message and source chain are
    /// exposed unchanged.
    #[error(transparent)]
    Handler(BoxError),
}

impl MediatorError {
    /// Returns `true` for [`HandlerConflict`](Self::HandlerConflict) and
    /// [`BehaviorConflict`](Self::BehaviorConflict).
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            MediatorError::HandlerConflict(_) | MediatorError::BehaviorConflict(_)
        )
    }

    /// Returns `true` for [`HandlerNotFound`](Self::HandlerNotFound).
    pub fn is_not_found(&self) -> bool {
        matches!(self, MediatorError::HandlerNotFound(_))
    }

    /// Unwrap into the underlying boxed error.
    ///
    /// Downstream errors are returned exactly as the handler produced them;
    /// mediator-level variants are boxed.
    pub fn into_inner(self) -> BoxError {
        match self {
            MediatorError::Handler(err) => err,
            other => Box::new(other),
        }
    }

    /// Attempt to view a downstream error as a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            MediatorError::Handler(err) => err.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<BoxError> for MediatorError {
    fn from(err: BoxError) -> Self {
        MediatorError::Handler(err)
    }
}

/// Why a [`Context`](crate::Context) is no longer live.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context (or one of its ancestors) was cancelled.
    #[error("context cancelled")]
    Cancelled,

    /// The context deadline has passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Returned when a pipeline step does not finish in time.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("request timed out after {0:?}")]
pub struct TimeoutError(pub Duration);
