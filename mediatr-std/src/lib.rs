//! # mediatr-std
//!
//! Standard building blocks for the mediatr request/notification mediator.
//!
//! This crate provides:
//! - **Collections**: [`Registry`] (keyed, insertion ordered) and [`Collection`] (ordered list),
//!   both safe for concurrent use
//! - **Standard behaviors**: Logging, Validation, Timeout
//! - **Testing utilities**: call logs, recording behaviors and subscribers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use mediatr_core;

pub mod behaviors;
pub mod collections;
pub mod testing;

pub use collections::{Collection, Registry};
