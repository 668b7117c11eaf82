//! Concurrency-safe containers backing the mediator's registries.
//!
//! Both containers guard their state with a single reader/writer lock:
//! mutations take the exclusive lock, everything else the shared lock.
//! Iteration always works on a copy taken under the shared lock, so
//! callbacks run without any lock held and may call back into the container.

pub mod collection;
pub mod registry;

pub use collection::Collection;
pub use registry::Registry;
