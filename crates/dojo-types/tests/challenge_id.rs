// crates/dojo-types/tests/challenge_id.rs
// ============================================================================
// Module: Challenge Identifier Property Tests
// Description: Round-trip and rejection properties for challenge identifiers.
// ============================================================================

//! ## Overview
//! Ensures the 24-hex wire form round-trips through parse and display, and
//! that malformed inputs are always rejected rather than coerced.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::str::FromStr;

use dojo_types::ChallengeId;
use proptest::prelude::*;

proptest! {
    #[test]
    fn lowercase_hex_round_trips(text in "[0-9a-f]{24}") {
        let id = ChallengeId::from_str(&text).unwrap();
        prop_assert_eq!(id.to_string(), text);
    }

    #[test]
    fn wrong_length_is_rejected(text in "[0-9a-f]{0,23}") {
        prop_assert!(ChallengeId::from_str(&text).is_err());
    }

    #[test]
    fn non_hex_is_rejected(text in "[g-z]{24}") {
        prop_assert!(ChallengeId::from_str(&text).is_err());
    }

    #[test]
    fn uppercase_hex_is_rejected(text in "[0-9a-f]{23}[A-F]") {
        prop_assert!(ChallengeId::from_str(&text).is_err());
    }

    #[test]
    fn json_round_trips(text in "[0-9a-f]{24}") {
        let id = ChallengeId::from_str(&text).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        let back: ChallengeId = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, id);
    }
}
