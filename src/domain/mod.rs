//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, errors)
//! - `subscription` - Subscription record, renewal status, and payload parsing

pub mod foundation;
pub mod subscription;
