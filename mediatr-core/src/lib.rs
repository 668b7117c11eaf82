//! # mediatr-core
//!
//! Core contracts for the mediatr in-process mediator.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that implements handlers or behaviors without needing the dispatch
//! engine itself.
//!
//! # Message Shapes
//!
//! - **Requests** ([`Request`]) are dispatched to exactly one
//!   [`RequestHandler`] and produce a typed response.
//! - **Notifications** (any [`Message`]) are fanned out to zero or more
//!   [`NotificationHandler`]s, which can end propagation with
//!   [`Propagation::Stop`].
//!
//! # Bindings
//!
//! Handlers are bound either as shared instances or as factories that build
//! a handler from the call [`Context`]. The two shapes are modelled as the
//! closed variants [`HandlerBinding`] and [`NotificationBinding`].
//!
//! # Pipeline
//!
//! [`PipelineBehavior`]s wrap request handling. Each receives a [`Next`]
//! continuation and decides whether, when and with which context to run it.
//!
//! # Error Types
//!
//! - [`MediatorError`] - registration conflicts, missing handlers and
//!   downstream failures
//! - [`ContextError`] - why a context is no longer live
//! - [`TimeoutError`] - a pipeline step ran out of time

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod behavior;
mod context;
mod error;
mod handler;
mod message;
mod notification;

// Re-exports
pub use behavior::{BoxedBehavior, DynPipelineBehavior, Next, PipelineBehavior};
pub use context::{CancelHandle, Context};
pub use error::{BoxError, ContextError, MediatorError, TimeoutError};
pub use handler::{
    BoxFuture, DynRequestHandler, HandlerBinding, RequestHandler, RequestHandlerFactory,
};
pub use message::{AnyRequest, AnyResponse, BoxResponse, Message, Request, TypeKey};
pub use notification::{
    DynNotificationHandler, NotificationBinding, NotificationHandler, NotificationHandlerFactory,
    Propagation,
};
