//! Validation behavior: reject requests before they reach their handler.

use mediatr_core::{
    AnyRequest, BoxError, BoxResponse, Context, Next, PipelineBehavior, Request,
};
use std::marker::PhantomData;
use thiserror::Error;

/// Checks a request before it is handled.
pub trait Validator: Send + Sync + 'static {
    /// `Ok(())` if the request may proceed.
    fn validate(&self, ctx: &Context, request: &dyn AnyRequest) -> Result<(), BoxError>;
}

impl<F> Validator for F
where
    F: Fn(&Context, &dyn AnyRequest) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn validate(&self, ctx: &Context, request: &dyn AnyRequest) -> Result<(), BoxError> {
        (self)(ctx, request)
    }
}

/// Runs every validator in order and reports the first failure.
impl Validator for Vec<Box<dyn Validator>> {
    fn validate(&self, ctx: &Context, request: &dyn AnyRequest) -> Result<(), BoxError> {
        self.iter().try_for_each(|v| v.validate(ctx, request))
    }
}

/// A validator for one request type. Other request types pass unchecked.
///
/// # Example
///
/// ```rust
/// use mediatr_core::Request;
/// use mediatr_std::behaviors::{TypedValidator, ValidationError};
///
/// #[derive(Debug)]
/// struct CreateUser { name: String }
///
/// impl Request for CreateUser {
///     type Response = u64;
/// }
///
/// let validator = TypedValidator::new(|_ctx, req: &CreateUser| {
///     if req.name.is_empty() {
///         return Err(ValidationError::new("name is required").into());
///     }
///     Ok(())
/// });
/// # let _ = validator;
/// ```
pub struct TypedValidator<R, F> {
    check: F,
    _marker: PhantomData<fn(&R)>,
}

impl<R, F> TypedValidator<R, F>
where
    R: Request,
    F: Fn(&Context, &R) -> Result<(), BoxError> + Send + Sync + 'static,
{
    /// Validate requests of type `R` with `check`.
    pub fn new(check: F) -> Self {
        Self {
            check,
            _marker: PhantomData,
        }
    }
}

impl<R, F> Validator for TypedValidator<R, F>
where
    R: Request,
    F: Fn(&Context, &R) -> Result<(), BoxError> + Send + Sync + 'static,
{
    fn validate(&self, ctx: &Context, request: &dyn AnyRequest) -> Result<(), BoxError> {
        match request.downcast_ref::<R>() {
            Some(request) => (self.check)(ctx, request),
            None => Ok(()),
        }
    }
}

/// A plain validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed: {message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Create a validation error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A behavior that validates each request before calling `next`.
///
/// An invalid request never reaches deeper behaviors or its handler; the
/// validator's error is returned unchanged.
///
/// Whatever validator it wraps, every `ValidationBehavior` is the same
/// behavior type, so a mediator holds at most one. Combine several checks
/// with a `Vec<Box<dyn Validator>>`.
pub struct ValidationBehavior {
    validator: Box<dyn Validator>,
}

impl ValidationBehavior {
    /// Create a behavior running `validator`.
    pub fn new<V: Validator>(validator: V) -> Self {
        Self {
            validator: Box::new(validator),
        }
    }

    /// The wrapped validator.
    pub fn validator(&self) -> &dyn Validator {
        &*self.validator
    }
}

impl PipelineBehavior for ValidationBehavior {
    async fn handle<'a>(
        &'a self,
        ctx: Context,
        request: &'a dyn AnyRequest,
        next: Next<'a>,
    ) -> Result<BoxResponse, BoxError> {
        #[cfg(feature = "tracing")]
        {
            tracing::info!(request_type = %request.type_name(), "validating request");
        }

        if let Err(err) = self.validator.validate(&ctx, request) {
            #[cfg(feature = "tracing")]
            {
                tracing::warn!(
                    request_type = %request.type_name(),
                    request = ?request,
                    error = %err,
                    "validation error"
                );
            }
            return Err(err);
        }

        next.run(ctx).await
    }
}
