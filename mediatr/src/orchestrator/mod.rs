pub(crate) mod mediator;
pub(crate) mod publisher;
pub(crate) mod sender;

pub use mediator::{Mediator, MediatorBuilder};
pub use publisher::Publisher;
pub use sender::Sender;
