//! Subscription record entity.
//!
//! A SubscriptionRecord is the normalized form of one subscription
//! purchase as reported by the billing backend. It is built once from a
//! snapshot payload; afterwards only `status` changes, driven by the
//! external reconciliation process.
//!
//! # Design Decisions
//!
//! - **Fail-secure status**: unknown or absent status reads as Expired,
//!   never as an access-granting state
//! - **Tolerant parsing**: each field degrades to its own documented
//!   default; only a missing/invalid expiration aborts construction
//! - **Backend-asserted entitlement**: `is_active` trusts `status` and
//!   never compares `expires_at` to the device clock

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{ParseError, Timestamp};

use super::payload;
use super::SubscriptionStatus;

/// Normalized subscription purchase record.
///
/// # Invariants
///
/// - `expires_at` is always present; a payload without a parseable
///   expiration never constructs a record
/// - `status` is always one of the seven defined variants
/// - String fields are `""` rather than absent when the payload lacks them
/// - Boolean flags are `false` unless the payload carried a real `true`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Opaque subscription identifier assigned by the backend.
    pub id: String,

    /// Group key used for mutual-exclusivity reasoning across products.
    pub group_id: String,

    /// Store product identifier.
    pub product_id: String,

    /// Current renewal state. The only field mutated after construction.
    pub status: SubscriptionStatus,

    /// End of the current paid period. Always present.
    pub expires_at: Timestamp,

    /// When the subscription started. Defaults to construction time.
    pub started_at: Timestamp,

    /// When the subscription was cancelled, if it was.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<Timestamp>,

    /// True iff the purchase was made in the sandbox environment.
    pub is_sandbox: bool,

    /// True for locally granted (non-store) subscriptions.
    pub is_local: bool,

    /// True while the store retries a failed charge.
    pub is_in_retry_billing: bool,

    /// True if auto-renewal is enabled for the next period.
    pub is_autorenew_enabled: bool,

    /// True if the introductory offer has already been consumed.
    pub is_introductory_activated: bool,
}

impl SubscriptionRecord {
    /// Parses a raw backend payload into a record.
    ///
    /// Fields are resolved independently: a malformed optional field
    /// falls back to its default without affecting the others. Unknown
    /// keys are ignored for forward compatibility.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingOrInvalidExpiration` when
    /// `expires_at` is absent, not a string, or not a parseable
    /// ISO-8601 timestamp. This is the only failure.
    pub fn parse(raw: &Value) -> Result<Self, ParseError> {
        // The single hard precondition. Everything after this point
        // degrades to a default instead of failing.
        let expires_at = match raw.get("expires_at") {
            Some(Value::String(s)) => Timestamp::parse_iso8601(s).ok_or_else(|| {
                ParseError::missing_or_invalid_expiration(format!(
                    "'{}' is not a valid ISO-8601 timestamp",
                    s
                ))
            })?,
            Some(other) => {
                return Err(ParseError::missing_or_invalid_expiration(format!(
                    "expected string, got {}",
                    payload::json_kind(other)
                )))
            }
            None => {
                return Err(ParseError::missing_or_invalid_expiration(
                    "field 'expires_at' absent",
                ))
            }
        };

        let id = payload::string_or_empty(raw, "id");
        let group_id = payload::string_or_empty(raw, "group_id");
        let product_id = payload::string_or_empty(raw, "product_id");

        // Cancellation is optionally-true: absence is the normal state
        // of a non-refunded subscription, so failures stay None.
        let cancelled_at = payload::timestamp_field(raw, "cancelled_at");

        // Start is always-true: every subscription has started, so a
        // missing or malformed value synthesizes "now" instead of None.
        let started_at = payload::timestamp_field(raw, "started_at").unwrap_or_else(Timestamp::now);

        let is_in_retry_billing = payload::bool_or_false(raw, "in_retry_billing");
        let is_autorenew_enabled = payload::bool_or_false(raw, "autorenew_enabled");
        let is_introductory_activated = payload::bool_or_false(raw, "introductory_activated");
        let is_local = payload::bool_or_false(raw, "local");

        let is_sandbox = payload::str_field(raw, "environment") == Some("sandbox");

        let status = match payload::str_field(raw, "status") {
            Some(token) => SubscriptionStatus::from_token(token),
            None => SubscriptionStatus::Expired,
        };

        Ok(Self {
            id,
            group_id,
            product_id,
            status,
            expires_at,
            started_at,
            cancelled_at,
            is_sandbox,
            is_local,
            is_in_retry_billing,
            is_autorenew_enabled,
            is_introductory_activated,
        })
    }

    /// Returns true if this subscription currently grants access to
    /// premium content.
    ///
    /// Pure function of `status`. Deliberately does not compare
    /// `expires_at` against the device clock: device clocks are
    /// untrustworthy, and the backend already folds expiry into the
    /// status it reports. Callers must not bypass this predicate with
    /// their own date comparison.
    pub fn is_active(&self) -> bool {
        self.status.grants_access()
    }

    /// Applies a backend-reported status change.
    ///
    /// The backend is authoritative, so the new status is always
    /// applied. A transition outside the expected lifecycle is logged
    /// for observability.
    pub fn set_status(&mut self, status: SubscriptionStatus) {
        if status != self.status && !self.status.can_transition_to(&status) {
            tracing::warn!(
                "unexpected status transition {} -> {} for subscription '{}'",
                self.status,
                status,
                self.id
            );
        }
        self.status = status;
    }

    /// Days remaining until the paid period ends.
    ///
    /// Returns 0 if the period has ended. Informational only (renewal
    /// reminders, UI badges); entitlement decisions go through
    /// [`is_active`](Self::is_active).
    pub fn days_remaining(&self) -> u32 {
        let now = Timestamp::now();
        if now >= self.expires_at {
            return 0;
        }

        let duration = self.expires_at.duration_since(&now);
        duration.num_days().max(0) as u32
    }

    /// Checks if the paid period ends within the given number of days.
    pub fn expiring_within_days(&self, days: u32) -> bool {
        let remaining = self.days_remaining();
        remaining > 0 && remaining <= days
    }
}

/// Builder for raw test payloads.
#[cfg(test)]
pub struct PayloadBuilder {
    map: serde_json::Map<String, Value>,
}

#[cfg(test)]
impl Default for PayloadBuilder {
    fn default() -> Self {
        let mut map = serde_json::Map::new();
        map.insert(
            "expires_at".to_string(),
            Value::String("2030-01-01T00:00:00Z".to_string()),
        );
        Self { map }
    }
}

#[cfg(test)]
impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.map.insert(key.to_string(), value);
        self
    }

    pub fn without(mut self, key: &str) -> Self {
        self.map.remove(key);
        self
    }

    pub fn build(self) -> Value {
        Value::Object(self.map)
    }
}
