//! # mediatr - In-Process Mediator
//!
//! `mediatr` decouples the code that asks for something from the code that
//! does it. Two messaging shapes are supported:
//!
//! - **Requests** go to exactly one handler and produce a typed response,
//!   passing through a chain of [pipeline behaviors](PipelineBehavior).
//! - **Notifications** fan out to zero or more subscribers, in registration
//!   order, until one of them stops propagation or fails.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mediatr::prelude::*;
//!
//! #[derive(Debug)]
//! struct Ping(u32);
//!
//! impl Request for Ping {
//!     type Response = u32;
//! }
//!
//! struct PingHandler;
//!
//! impl RequestHandler<Ping> for PingHandler {
//!     async fn handle(&self, _ctx: &Context, ping: &Ping) -> Result<u32, BoxError> {
//!         Ok(ping.0 + 1)
//!     }
//! }
//!
//! let mediator = Mediator::builder()
//!     .request_handler::<Ping, _>(PingHandler)
//!     .pipeline_behavior(LoggingBehavior::new())
//!     .build()?;
//!
//! let pong = mediator.send_with_response(&Context::background(), Ping(1)).await?;
//! assert_eq!(pong, 2);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use mediatr_core::{
    // Message contracts
    AnyRequest,
    AnyResponse,
    // Error types
    BoxError,
    // Futures
    BoxFuture,
    BoxResponse,
    // Behaviors
    BoxedBehavior,
    // Context
    CancelHandle,
    Context,
    ContextError,
    DynNotificationHandler,
    DynPipelineBehavior,
    DynRequestHandler,
    // Bindings
    HandlerBinding,
    MediatorError,
    Message,
    Next,
    NotificationBinding,
    // Handlers
    NotificationHandler,
    NotificationHandlerFactory,
    PipelineBehavior,
    Propagation,
    Request,
    RequestHandler,
    RequestHandlerFactory,
    TimeoutError,
    TypeKey,
};

pub use mediatr_std::collections::{Collection, Registry};

mod orchestrator;
pub use orchestrator::{Mediator, MediatorBuilder, Publisher, Sender};

pub mod global;

/// Standard pipeline behaviors.
pub mod behaviors {
    #![allow(clippy::wildcard_imports)]
    pub use mediatr_std::behaviors::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use mediatr_std::testing::*;
}

/// Prelude module - common imports for mediatr.
///
/// # Usage
///
/// ```rust,ignore
/// use mediatr::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError,
        Context,
        Mediator,
        MediatorError,
        Message,
        Next,
        NotificationBinding,
        NotificationHandler,
        PipelineBehavior,
        Propagation,
        Request,
        RequestHandler,
        behaviors::{LoggingBehavior, ValidationBehavior},
    };
}
