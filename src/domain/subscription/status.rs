//! Subscription renewal status.
//!
//! Defines the closed set of renewal states a subscription can occupy
//! and the lowercase token codec used on the wire.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Renewal state of a subscription.
///
/// The backend is the source of truth for this value; clients never
/// derive it from local data. Unknown wire tokens decode to `Expired`
/// so that corrupted or forward-incompatible data can never grant
/// access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionStatus {
    /// Free trial period before the first charge.
    Trial,

    /// Paid period purchased at an introductory price.
    IntroductoryOffer,

    /// Paid period purchased through a promotional offer.
    PromotionalOffer,

    /// Regular paid period at the standard price.
    Regular,

    /// Payment failed but the store is retrying within the grace window.
    /// Access is retained while the retry runs.
    GracePeriod,

    /// Purchase was refunded by the store. No access.
    Refunded,

    /// Subscription ended, or its state could not be determined. No access.
    Expired,
}

/// Canonical wire tokens, one entry per variant.
///
/// `from_token` resolves through this table; anything not listed here
/// maps to `Expired`. The fail-closed default is a table policy, not a
/// match fallthrough, so a new backend state shows up as a missing row
/// rather than silently granted access.
const TOKEN_TABLE: [(&str, SubscriptionStatus); 7] = [
    ("trial", SubscriptionStatus::Trial),
    ("intro", SubscriptionStatus::IntroductoryOffer),
    ("promo", SubscriptionStatus::PromotionalOffer),
    ("regular", SubscriptionStatus::Regular),
    ("grace", SubscriptionStatus::GracePeriod),
    ("refunded", SubscriptionStatus::Refunded),
    ("expired", SubscriptionStatus::Expired),
];

static TOKEN_LOOKUP: Lazy<HashMap<&'static str, SubscriptionStatus>> =
    Lazy::new(|| TOKEN_TABLE.iter().copied().collect());

impl SubscriptionStatus {
    /// All seven variants, for exhaustive iteration in callers and tests.
    pub const ALL: [SubscriptionStatus; 7] = [
        SubscriptionStatus::Trial,
        SubscriptionStatus::IntroductoryOffer,
        SubscriptionStatus::PromotionalOffer,
        SubscriptionStatus::Regular,
        SubscriptionStatus::GracePeriod,
        SubscriptionStatus::Refunded,
        SubscriptionStatus::Expired,
    ];

    /// Resolves a wire token to a status. Total; never fails.
    ///
    /// Unrecognized tokens (including the empty string) resolve to
    /// `Expired`.
    pub fn from_token(token: &str) -> Self {
        TOKEN_LOOKUP
            .get(token)
            .copied()
            .unwrap_or(SubscriptionStatus::Expired)
    }

    /// Returns the canonical wire token for this status.
    pub fn as_token(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::IntroductoryOffer => "intro",
            SubscriptionStatus::PromotionalOffer => "promo",
            SubscriptionStatus::Regular => "regular",
            SubscriptionStatus::GracePeriod => "grace",
            SubscriptionStatus::Refunded => "refunded",
            SubscriptionStatus::Expired => "expired",
        }
    }

    /// Returns true if this status grants access to premium content.
    ///
    /// Access is granted for:
    /// - Trial: free trial running
    /// - IntroductoryOffer / PromotionalOffer: discounted paid period
    /// - Regular: standard paid period
    /// - GracePeriod: billing retry window
    ///
    /// Access is denied for:
    /// - Refunded: purchase returned
    /// - Expired: subscription ended or state unknown
    pub fn grants_access(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Trial
                | SubscriptionStatus::IntroductoryOffer
                | SubscriptionStatus::PromotionalOffer
                | SubscriptionStatus::Regular
                | SubscriptionStatus::GracePeriod
        )
    }

    /// Returns true if the backend is expected to report `target` after
    /// this status.
    ///
    /// This table reflects the lifecycle the backend normally walks. It
    /// is observational only: the backend stays authoritative, so an
    /// unexpected transition is logged, never rejected.
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From TRIAL
            (Trial, IntroductoryOffer)
                | (Trial, PromotionalOffer)
                | (Trial, Regular)
                | (Trial, GracePeriod)
                | (Trial, Expired)
                | (Trial, Refunded)
            // From INTRODUCTORY_OFFER
                | (IntroductoryOffer, Regular)
                | (IntroductoryOffer, GracePeriod)
                | (IntroductoryOffer, Expired)
                | (IntroductoryOffer, Refunded)
            // From PROMOTIONAL_OFFER
                | (PromotionalOffer, Regular)
                | (PromotionalOffer, GracePeriod)
                | (PromotionalOffer, Expired)
                | (PromotionalOffer, Refunded)
            // From REGULAR
                | (Regular, Regular) // Renewal
                | (Regular, PromotionalOffer)
                | (Regular, GracePeriod)
                | (Regular, Expired)
                | (Regular, Refunded)
            // From GRACE_PERIOD
                | (GracePeriod, Regular)
                | (GracePeriod, Expired)
                | (GracePeriod, Refunded)
            // From EXPIRED (resubscribe)
                | (Expired, Regular)
                | (Expired, PromotionalOffer)
        )
    }

    /// Returns true if no further backend transition is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Refunded)
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_token())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = Infallible;

    /// Token resolution is total, so this never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl Serialize for SubscriptionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

impl<'de> Deserialize<'de> for SubscriptionStatus {
    /// Decodes through the token table, so unknown tokens deserialize
    /// to `Expired` instead of erroring.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Self::from_token(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Token codec tests

    #[test]
    fn every_variant_round_trips_through_its_token() {
        for status in SubscriptionStatus::ALL {
            assert_eq!(
                SubscriptionStatus::from_token(status.as_token()),
                status,
                "round trip failed for {:?}",
                status
            );
        }
    }

    #[test]
    fn unknown_token_resolves_to_expired() {
        assert_eq!(
            SubscriptionStatus::from_token("bogus"),
            SubscriptionStatus::Expired
        );
    }

    #[test]
    fn empty_token_resolves_to_expired() {
        assert_eq!(
            SubscriptionStatus::from_token(""),
            SubscriptionStatus::Expired
        );
    }

    #[test]
    fn token_lookup_is_case_sensitive() {
        // "TRIAL" is not a canonical token, so it must fail closed.
        assert_eq!(
            SubscriptionStatus::from_token("TRIAL"),
            SubscriptionStatus::Expired
        );
    }

    proptest! {
        #[test]
        fn arbitrary_non_canonical_tokens_fail_closed(token in "\\PC{0,24}") {
            prop_assume!(SubscriptionStatus::ALL
                .iter()
                .all(|s| s.as_token() != token));
            prop_assert_eq!(
                SubscriptionStatus::from_token(&token),
                SubscriptionStatus::Expired
            );
        }
    }

    // Access tests

    #[test]
    fn access_granted_exactly_for_live_states() {
        let granted = [
            SubscriptionStatus::Trial,
            SubscriptionStatus::IntroductoryOffer,
            SubscriptionStatus::PromotionalOffer,
            SubscriptionStatus::Regular,
            SubscriptionStatus::GracePeriod,
        ];

        for status in SubscriptionStatus::ALL {
            assert_eq!(
                status.grants_access(),
                granted.contains(&status),
                "grants_access wrong for {:?}",
                status
            );
        }
    }

    // Transition tests

    #[test]
    fn trial_can_convert_to_regular() {
        assert!(SubscriptionStatus::Trial.can_transition_to(&SubscriptionStatus::Regular));
    }

    #[test]
    fn grace_period_can_recover_to_regular() {
        assert!(SubscriptionStatus::GracePeriod.can_transition_to(&SubscriptionStatus::Regular));
    }

    #[test]
    fn regular_can_renew_to_regular() {
        assert!(SubscriptionStatus::Regular.can_transition_to(&SubscriptionStatus::Regular));
    }

    #[test]
    fn refunded_is_terminal() {
        assert!(SubscriptionStatus::Refunded.is_terminal());
        for status in SubscriptionStatus::ALL {
            assert!(!SubscriptionStatus::Refunded.can_transition_to(&status));
        }
    }

    #[test]
    fn expired_can_resubscribe() {
        assert!(!SubscriptionStatus::Expired.is_terminal());
        assert!(SubscriptionStatus::Expired.can_transition_to(&SubscriptionStatus::Regular));
    }

    // Display / FromStr / serde tests

    #[test]
    fn display_renders_wire_token() {
        assert_eq!(SubscriptionStatus::GracePeriod.to_string(), "grace");
        assert_eq!(SubscriptionStatus::IntroductoryOffer.to_string(), "intro");
    }

    #[test]
    fn from_str_never_fails() {
        let status: SubscriptionStatus = "promo".parse().unwrap();
        assert_eq!(status, SubscriptionStatus::PromotionalOffer);

        let fallback: SubscriptionStatus = "???".parse().unwrap();
        assert_eq!(fallback, SubscriptionStatus::Expired);
    }

    #[test]
    fn serializes_as_wire_token() {
        let json = serde_json::to_string(&SubscriptionStatus::Trial).unwrap();
        assert_eq!(json, "\"trial\"");
    }

    #[test]
    fn deserializes_unknown_token_as_expired() {
        let status: SubscriptionStatus = serde_json::from_str("\"paused\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Expired);
    }

    #[test]
    fn serde_round_trips_all_variants() {
        for status in SubscriptionStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            let back: SubscriptionStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(back, status);
        }
    }
}
