//! Timeout behavior for time-limited request handling.
//!
//! **Note**: This module requires the `tokio` runtime and the `timeout`
//! feature.

use mediatr_core::{
    AnyRequest, BoxError, BoxResponse, Context, Next, PipelineBehavior, TimeoutError,
};
use std::time::Duration;
use tokio::time::timeout;

/// A behavior that bounds how long the inner chain may run.
///
/// The context passed downward carries the matching deadline, so handlers
/// that observe the context can stop early on their own. If the inner chain
/// is still running when the time is up, it is dropped and a
/// [`TimeoutError`] is returned.
///
/// # Example
///
/// ```rust,ignore
/// use mediatr_std::behaviors::TimeoutBehavior;
///
/// mediator.register_pipeline_behavior(TimeoutBehavior::secs(5))?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeoutBehavior {
    duration: Duration,
}

impl TimeoutBehavior {
    /// Create a new `TimeoutBehavior`.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Create a `TimeoutBehavior` with the timeout specified in seconds.
    pub fn secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }

    /// Create a `TimeoutBehavior` with the timeout specified in milliseconds.
    pub fn millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Get the configured timeout duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl PipelineBehavior for TimeoutBehavior {
    async fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> Result<BoxResponse, BoxError> {
        let ctx = ctx.with_timeout(self.duration);
        match timeout(self.duration, next.run(ctx)).await {
            Ok(result) => result,
            Err(_) => {
                #[cfg(feature = "tracing")]
                {
                    tracing::warn!(
                        request_type = %request.type_name(),
                        timeout = ?self.duration,
                        "request timed out"
                    );
                }
                #[cfg(not(feature = "tracing"))]
                {
                    let _ = request;
                }
                Err(Box::new(TimeoutError(self.duration)))
            }
        }
    }
}
