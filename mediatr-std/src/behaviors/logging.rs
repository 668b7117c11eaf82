//! Logging behavior for request observation.

use mediatr_core::{AnyRequest, BoxError, BoxResponse, Context, Next, PipelineBehavior};

/// A behavior that logs every request and its outcome.
///
/// Logs `handling request` with the request type and value before the
/// inner chain runs, then `request handled` with the response, or
/// `request failed` with the error. Uses the `tracing` crate when the
/// `tracing` feature is enabled and passes through silently otherwise.
///
/// # Example
///
/// ```rust,ignore
/// use mediatr_std::behaviors::LoggingBehavior;
///
/// mediator.register_pipeline_behavior(LoggingBehavior::named("commands"))?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LoggingBehavior {
    name: &'static str,
}

impl LoggingBehavior {
    /// Create a new `LoggingBehavior` with a default name.
    pub fn new() -> Self {
        Self { name: "mediator" }
    }

    /// Create a new `LoggingBehavior` with a custom name.
    ///
    /// The name is recorded on every log line to identify the pipeline.
    pub fn named(name: &'static str) -> Self {
        Self { name }
    }

    /// The pipeline name recorded on log lines.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Default for LoggingBehavior {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBehavior for LoggingBehavior {
    async fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> Result<BoxResponse, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(
                pipeline = %self.name,
                request_type = %request.type_name(),
                request = ?request,
                "handling request"
            );
        }

        let result = next.run(ctx).await;

        #[cfg(feature = "tracing")]
        {
            match &result {
                Ok(response) => tracing::info!(
                    pipeline = %self.name,
                    request_type = %request.type_name(),
                    response = ?response,
                    "request handled"
                ),
                Err(err) => tracing::warn!(
                    pipeline = %self.name,
                    request_type = %request.type_name(),
                    error = %err,
                    "request failed"
                ),
            }
        }

        #[cfg(not(feature = "tracing"))]
        {
            let _ = (self.name, request);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediatr_core::Request;

    #[derive(Debug)]
    struct Ping {
        data: String,
    }

    impl Request for Ping {
        type Response = String;
    }

    fn echo<'a>(ping: &'a Ping) -> Next<'a> {
        Next::new(move |_ctx| Box::pin(async move { Ok(Box::new(ping.data.clone()) as BoxResponse) }))
    }

    #[tokio::test]
    async fn test_logging_behavior_passes_response_through() {
        let behavior = LoggingBehavior::new();
        let ping = Ping {
            data: "pong".into(),
        };

        let response = behavior
            .handle(Context::background(), &ping, echo(&ping))
            .await
            .unwrap();
        let response = mediatr_core::AnyResponse::into_any(response)
            .downcast::<String>()
            .unwrap();
        assert_eq!(*response, "pong");
    }

    #[tokio::test]
    async fn test_logging_behavior_passes_error_through() {
        let behavior = LoggingBehavior::named("my_pipeline");
        assert_eq!(behavior.name(), "my_pipeline");

        let ping = Ping {
            data: "pong".into(),
        };
        let failing = Next::new(|_ctx| Box::pin(async { Err::<BoxResponse, BoxError>("nope".into()) }));

        let err = behavior
            .handle(Context::background(), &ping, failing)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
