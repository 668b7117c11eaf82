//! Message traits and type identity.

use std::any::{Any, TypeId, type_name};
use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// A stable identifier for the static type used at a call site.
///
/// Every registry in mediatr is keyed by `TypeKey`, never by value identity.
/// Equality and hashing use only the [`TypeId`]; the type name is carried
/// along for diagnostics.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying [`TypeId`].
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The fully qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A marker trait for anything that can travel through the mediator.
///
/// Messages must be `Send + Sync + 'static` to be safe for async use.
/// Every such type is a `Message`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "All messages dispatched through mediatr must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Message for T {}

/// A command or query dispatched to exactly one handler.
///
/// The response type is part of the request's definition, so a handler
/// and a call site can never disagree about it.
///
/// # Example
///
/// ```rust
/// use mediatr_core::Request;
///
/// #[derive(Debug)]
/// struct CreateUser { name: String }
///
/// impl Request for CreateUser {
///     type Response = u64;
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a Request",
    label = "missing `Request` implementation",
    note = "Implement `Request` and name its `Response` type to dispatch `{Self}`."
)]
pub trait Request: Message + Debug {
    /// What the handler produces. Use `()` for fire-and-forget commands.
    type Response: Send + Debug + 'static;
}

/// Type-erased view of a request, as seen by pipeline behaviors.
pub trait AnyRequest: Any + Send + Sync + Debug + 'static {
    /// Key of the concrete request type.
    fn type_key(&self) -> TypeKey;

    /// Name of the concrete request type.
    fn type_name(&self) -> &'static str {
        self.type_key().name()
    }

    /// Upcast to [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<R: Request> AnyRequest for R {
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<R>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn AnyRequest {
    /// Returns `true` if the erased request is a `T`.
    pub fn is<T: Request>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// View the erased request as a `T`.
    pub fn downcast_ref<T: Request>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Type-erased response travelling back up the pipeline.
pub trait AnyResponse: Any + Send + Debug + 'static {
    /// Name of the concrete response type.
    fn type_name(&self) -> &'static str;

    /// Convert into a boxed [`Any`] so it can be downcast by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T: Any + Send + Debug> AnyResponse for T {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// A boxed, type-erased response.
pub type BoxResponse = Box<dyn AnyResponse>;
