use mediatr::{
    BoxError, Context, Mediator, MediatorError,
    behaviors::{LoggingBehavior, TypedValidator, ValidationBehavior, ValidationError, Validator},
    testing::{CallLog, RecordingBehavior},
};

mod common;
use common::{CreateUser, CreateUserHandler, Ping};

fn name_required() -> ValidationBehavior {
    ValidationBehavior::new(TypedValidator::new(|_ctx: &Context, req: &CreateUser| {
        if req.name.trim().is_empty() {
            return Err(ValidationError::new("name is required").into());
        }
        Ok(())
    }))
}

#[tokio::test]
async fn test_validation_rejects_before_inner_layers() {
    let log = CallLog::new();
    let handler = CreateUserHandler::default();
    let mediator = Mediator::builder()
        .request_handler::<CreateUser, _>(handler.clone())
        .pipeline_behavior(RecordingBehavior::<1>::new(log.clone()))
        .pipeline_behavior(name_required())
        .build()
        .unwrap();

    let err = mediator
        .send_with_response(&Context::background(), CreateUser { name: " ".into() })
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<ValidationError>().map(ValidationError::message),
        Some("name is required")
    );
    assert!(log.is_empty());
    assert_eq!(handler.calls(), 0);
}

#[tokio::test]
async fn test_validation_passes_valid_and_other_requests() {
    let mediator = Mediator::builder()
        .request_handler::<CreateUser, _>(CreateUserHandler::default())
        .request_handler::<Ping, _>(mediatr::testing::CountingHandler::new())
        .pipeline_behavior(name_required())
        .build()
        .unwrap();

    let ctx = Context::background();
    let id = mediator
        .send_with_response(&ctx, CreateUser { name: "ann".into() })
        .await
        .unwrap();
    assert_eq!(id, 1);
    mediator.send(&ctx, Ping).await.unwrap();
}

#[tokio::test]
async fn test_closure_validator() {
    let mediator = Mediator::new();
    mediator
        .register_request_handler::<Ping, _>(mediatr::testing::CountingHandler::new())
        .unwrap();
    mediator
        .register_pipeline_behavior(ValidationBehavior::new(
            |ctx: &Context, _request: &dyn mediatr::AnyRequest| -> Result<(), BoxError> {
                ctx.check()?;
                Ok(())
            },
        ))
        .unwrap();

    let (ctx, cancel) = Context::background().with_cancel();
    mediator.send(&ctx, Ping).await.unwrap();

    cancel.cancel();
    let err = mediator.send(&ctx, Ping).await.unwrap_err();
    assert_eq!(err.to_string(), "context cancelled");
}

#[tokio::test]
async fn test_second_validation_behavior_conflicts() {
    let mediator = Mediator::new();
    mediator
        .register_request_handler::<Ping, _>(mediatr::testing::CountingHandler::new())
        .unwrap();
    mediator
        .register_pipeline_behavior(ValidationBehavior::new(
            |_ctx: &Context, _request: &dyn mediatr::AnyRequest| -> Result<(), BoxError> { Ok(()) },
        ))
        .unwrap();

    let err = mediator
        .register_pipeline_behavior(ValidationBehavior::new(
            |_ctx: &Context, _request: &dyn mediatr::AnyRequest| -> Result<(), BoxError> {
                Err("rejected".into())
            },
        ))
        .unwrap_err();

    assert!(matches!(err, MediatorError::BehaviorConflict(_)));
    assert_eq!(mediator.sender().behavior_count(), 1);
    mediator.send(&Context::background(), Ping).await.unwrap();
}

#[tokio::test]
async fn test_combined_validators_in_one_behavior() {
    let validators: Vec<Box<dyn Validator>> = vec![
        Box::new(TypedValidator::new(|_ctx: &Context, req: &CreateUser| {
            if req.name.len() > 8 {
                return Err(ValidationError::new("name is too long").into());
            }
            Ok(())
        })),
        Box::new(TypedValidator::new(|_ctx: &Context, req: &CreateUser| {
            if req.name.trim().is_empty() {
                return Err(ValidationError::new("name is required").into());
            }
            Ok(())
        })),
    ];
    let mediator = Mediator::builder()
        .request_handler::<CreateUser, _>(CreateUserHandler::default())
        .pipeline_behavior(ValidationBehavior::new(validators))
        .build()
        .unwrap();

    let ctx = Context::background();
    let err = mediator
        .send_with_response(&ctx, CreateUser { name: "a-very-long-name".into() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "validation failed: name is too long");
    let err = mediator
        .send_with_response(&ctx, CreateUser { name: String::new() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "validation failed: name is required");
}

#[tokio::test]
async fn test_logging_is_transparent() {
    let mediator = Mediator::builder()
        .request_handler::<CreateUser, _>(CreateUserHandler::default())
        .pipeline_behavior(LoggingBehavior::named("users"))
        .build()
        .unwrap();

    let ctx = Context::background();
    let id = mediator
        .send_with_response(&ctx, CreateUser { name: "ann".into() })
        .await
        .unwrap();
    assert_eq!(id, 1);

    let err = mediator
        .send_with_response(&ctx, CreateUser { name: String::new() })
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "empty name");
}

#[cfg(feature = "timeout")]
mod timeout {
    use super::common::{WhoAmI, WhoAmIHandler};
    use mediatr::{
        BoxError, Context, Mediator, RequestHandler, TimeoutError, behaviors::TimeoutBehavior,
    };
    use std::time::Duration;

    #[derive(Debug)]
    struct Slow;

    impl mediatr::Request for Slow {
        type Response = Option<Duration>;
    }

    struct SlowHandler(Duration);

    impl RequestHandler<Slow> for SlowHandler {
        async fn handle(&self, ctx: &Context, _request: &Slow) -> Result<Option<Duration>, BoxError> {
            let remaining = ctx.remaining();
            tokio::time::sleep(self.0).await;
            Ok(remaining)
        }
    }

    #[tokio::test]
    async fn test_slow_handler_times_out() {
        let mediator = Mediator::builder()
            .request_handler::<Slow, _>(SlowHandler(Duration::from_millis(200)))
            .pipeline_behavior(TimeoutBehavior::millis(20))
            .build()
            .unwrap();

        let err = mediator
            .send_with_response(&Context::background(), Slow)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<TimeoutError>(),
            Some(&TimeoutError(Duration::from_millis(20)))
        );
    }

    #[tokio::test]
    async fn test_handler_sees_deadline() {
        let mediator = Mediator::builder()
            .request_handler::<Slow, _>(SlowHandler(Duration::ZERO))
            .request_handler::<WhoAmI, _>(WhoAmIHandler)
            .pipeline_behavior(TimeoutBehavior::secs(5))
            .build()
            .unwrap();

        let remaining = mediator
            .send_with_response(&Context::background(), Slow)
            .await
            .unwrap()
            .expect("deadline set by the behavior");
        assert!(remaining <= Duration::from_secs(5));
        assert!(remaining > Duration::from_secs(4));
    }
}
