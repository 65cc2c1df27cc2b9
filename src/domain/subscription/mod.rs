//! Subscription domain module.
//!
//! Models a single subscription purchase as reported by the billing
//! backend: its renewal status, identity and period fields, and the
//! derived entitlement predicate.
//!
//! # Module Structure
//!
//! - `record` - SubscriptionRecord entity and payload parsing
//! - `status` - SubscriptionStatus renewal states and wire codec
//! - `payload` - Tolerant field accessors over raw JSON payloads

mod payload;
mod record;
mod status;

pub use record::SubscriptionRecord;
pub use status::SubscriptionStatus;
