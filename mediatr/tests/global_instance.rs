//! The shared instance is process-wide and tests in a binary run in
//! parallel, so every check against it lives in one sequential test.

use mediatr::{
    BoxError, BoxedBehavior, Context, NotificationBinding, global,
    testing::{CallLog, CountingHandler, RecordingBehavior, RecordingSubscriber},
};

mod common;
use common::{CreateUser, CreateUserHandler, Numbered, NumberedHandler, Ping, UserCreated};

#[derive(Debug, Clone)]
struct Heartbeat;

async fn dispatch(ctx: &Context) {
    global::register_request_handler::<Numbered<100>, _>(NumberedHandler).unwrap();
    global::register_request_handler_factory::<Numbered<101>, _, _>(|_ctx| Ok(NumberedHandler))
        .unwrap();

    assert_eq!(
        global::send_with_response(ctx, Numbered::<100>(2)).await.unwrap(),
        2100
    );
    assert_eq!(
        global::send_with_response(ctx, Numbered::<101>(3)).await.unwrap(),
        3101
    );
    assert!(global::instance().sender().has_handler::<Numbered<100>>());
}

async fn publish(ctx: &Context) {
    let log = CallLog::new();
    let factory_log = log.clone();
    global::register_notification_handler(RecordingSubscriber::<Heartbeat>::new("h1", log.clone()));
    global::register_notification_handlers([NotificationBinding::handler(
        RecordingSubscriber::<Heartbeat>::new("h2", log.clone()),
    )]);
    global::register_notification_handler_factory(move |_ctx| {
        Ok(RecordingSubscriber::<Heartbeat>::new("h3", factory_log.clone()))
    });
    global::register_notification_handler_factories(["h4", "h5"].map(|name| {
        let log = log.clone();
        move |_ctx: Context| -> Result<RecordingSubscriber<Heartbeat>, BoxError> {
            Ok(RecordingSubscriber::new(name, log.clone()))
        }
    }));

    global::publish(ctx, Heartbeat).await.unwrap();
    assert_eq!(log.entries(), vec!["h1", "h2", "h3", "h4", "h5"]);

    log.clear();
    global::publish_with(
        ctx,
        Heartbeat,
        [NotificationBinding::handler(RecordingSubscriber::<Heartbeat>::new(
            "once",
            log.clone(),
        ))],
    )
    .await
    .unwrap();
    assert_eq!(log.entries(), vec!["h1", "h2", "h3", "h4", "h5", "once"]);
}

async fn reset(ctx: &Context) {
    let log = CallLog::new();
    let handler = CreateUserHandler::default();

    global::register_request_handler::<CreateUser, _>(handler.clone()).unwrap();
    global::register_pipeline_behaviors([BoxedBehavior::new(RecordingBehavior::<9>::new(
        log.clone(),
    ))])
    .unwrap();
    global::register_notification_handler(RecordingSubscriber::<UserCreated>::new(
        "subscriber",
        log.clone(),
    ));

    global::clear_request_handlers();
    global::clear_pipeline_behaviors();
    global::clear_notification_handlers();

    let err = global::send_with_response(ctx, CreateUser { name: "ann".into() })
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    global::publish(ctx, UserCreated { id: 1 }).await.unwrap();
    global::publish(ctx, Heartbeat).await.unwrap();
    assert!(log.is_empty());

    global::register_request_handler::<CreateUser, _>(handler).unwrap();
    global::register_pipeline_behavior(RecordingBehavior::<9>::new(log.clone())).unwrap();
    global::register_request_handler::<Ping, _>(CountingHandler::new()).unwrap();
    global::send(ctx, Ping).await.unwrap();
    assert_eq!(log.entries(), vec!["behavior-9:before", "behavior-9:after"]);
}

#[tokio::test]
async fn test_global_instance() {
    let ctx = Context::background();
    dispatch(&ctx).await;
    publish(&ctx).await;
    reset(&ctx).await;
}
