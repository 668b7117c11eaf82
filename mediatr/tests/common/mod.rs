#![allow(dead_code)]

use mediatr::{
    AnyRequest, BoxError, BoxResponse, Context, Next, PipelineBehavior, Request, RequestHandler,
    testing::CallLog,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Request Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
}

impl Request for CreateUser {
    type Response = u64;
}

#[derive(Debug)]
pub struct Ping;

impl Request for Ping {
    type Response = ();
}

/// Returns the tenant found in the call context.
#[derive(Debug)]
pub struct WhoAmI;

impl Request for WhoAmI {
    type Response = Option<String>;
}

/// A family of distinct request types, one per `I`.
#[derive(Debug)]
pub struct Numbered<const I: usize>(pub usize);

impl<const I: usize> Request for Numbered<I> {
    type Response = usize;
}

// ============================================================================
// Test Notification Types
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct UserCreated {
    pub id: u64,
}

// ============================================================================
// Context Values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Tenant(pub String);

// ============================================================================
// Test Handlers
// ============================================================================

/// Counts calls and answers with the running count.
#[derive(Clone, Default)]
pub struct CreateUserHandler {
    pub calls: Arc<AtomicUsize>,
}

impl CreateUserHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RequestHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, _ctx: &Context, request: &CreateUser) -> Result<u64, BoxError> {
        if request.name.is_empty() {
            return Err("empty name".into());
        }
        Ok(self.calls.fetch_add(1, Ordering::SeqCst) as u64 + 1)
    }
}

pub struct WhoAmIHandler;

impl RequestHandler<WhoAmI> for WhoAmIHandler {
    async fn handle(&self, ctx: &Context, _request: &WhoAmI) -> Result<Option<String>, BoxError> {
        Ok(ctx.value::<Tenant>().map(|tenant| tenant.0.clone()))
    }
}

/// Records `handler` in a shared log on every call.
pub struct LoggingPingHandler {
    pub log: CallLog,
}

impl RequestHandler<Ping> for LoggingPingHandler {
    async fn handle(&self, _ctx: &Context, _request: &Ping) -> Result<(), BoxError> {
        self.log.push("handler");
        Ok(())
    }
}

/// Echoes the payload plus its own type index.
pub struct NumberedHandler;

impl<const I: usize> RequestHandler<Numbered<I>> for NumberedHandler {
    async fn handle(&self, _ctx: &Context, request: &Numbered<I>) -> Result<usize, BoxError> {
        tokio::task::yield_now().await;
        Ok(request.0 * 1000 + I)
    }
}

// ============================================================================
// Test Behaviors
// ============================================================================

/// Passes a context carrying `Tenant("override")` to the inner chain.
pub struct TenantOverride;

impl PipelineBehavior for TenantOverride {
    async fn handle<'a>(
        &'a self,
        ctx: Context,
        _request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> Result<BoxResponse, BoxError> {
        next.run(ctx.with_value(Tenant("override".into()))).await
    }
}
