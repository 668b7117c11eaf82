//! Standard pipeline behaviors.

pub mod logging;
#[cfg(feature = "timeout")]
pub mod timeout;
pub mod validation;

pub use logging::LoggingBehavior;
#[cfg(feature = "timeout")]
pub use timeout::TimeoutBehavior;
pub use validation::{TypedValidator, ValidationBehavior, ValidationError, Validator};
