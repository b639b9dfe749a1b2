//! Core trait abstractions for the moderation library.
//!
//! These traits define the interfaces that applications implement
//! to provide storage and model-invocation capabilities.

pub mod model;
pub mod store;
