//! Model client implementations.

pub mod together;

pub use together::TogetherModelClient;
