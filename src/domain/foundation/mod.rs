//! Shared domain primitives.
//!
//! # Module Organization
//!
//! - `errors` - Parse failure types
//! - `timestamp` - Immutable UTC instant value object

mod errors;
mod timestamp;

pub use errors::ParseError;
pub use timestamp::Timestamp;
