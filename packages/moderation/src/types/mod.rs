//! Data types for the moderation library.

pub mod config;
pub mod post;
pub mod verdict;
