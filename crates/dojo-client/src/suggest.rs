// crates/dojo-client/src/suggest.rs
// ============================================================================
// Module: Challenge Suggestion
// Description: Next-challenge suggestion flow against the trainer queue.
// Purpose: Peek the trainer queue for the next challenge to train on.
// Dependencies: dojo-page, dojo-types, reqwest, serde, thiserror
// ============================================================================

//! ## Overview
//! The trainer keeps a per-user queue of upcoming challenges and exposes it
//! through a peek endpoint. Peeking needs a session JWT, which is embedded in
//! the dashboard page body the same way trainer pages embed theirs. A peek
//! either leaves the queue untouched or dequeues the suggestion.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use thiserror::Error;

use dojo_page::find_session_jwt;
use dojo_types::ChallengeId;
use dojo_types::KnownLang;

use crate::Client;

// ============================================================================
// SECTION: Strategy
// ============================================================================

/// Strategy the trainer uses to pick the next challenge.
///
/// # Invariants
/// - The wire form is the queue label used in peek URLs and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SuggestStrategy {
    /// Fundamentals practice queue.
    #[serde(rename = "reference_workout")]
    Fundamental,
    /// Rank-up queue, the trainer default.
    #[serde(rename = "default")]
    RankUp,
    /// Retraining queue of previously solved challenges.
    #[serde(rename = "retrain_workout")]
    Practice,
    /// Beta challenges awaiting approval.
    #[serde(rename = "beta_workout")]
    Beta,
    /// Random pick.
    #[serde(rename = "random")]
    Random,
}

impl SuggestStrategy {
    /// Returns the wire label for this strategy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fundamental => "reference_workout",
            Self::RankUp => "default",
            Self::Practice => "retrain_workout",
            Self::Beta => "beta_workout",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for SuggestStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Suggestion Payload
// ============================================================================

/// Challenge suggested by the trainer queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedChallenge {
    /// Whether the trainer produced a suggestion.
    pub success: bool,
    /// Queue the suggestion came from.
    pub strategy: SuggestStrategy,
    /// Language the suggestion targets.
    pub language: String,
    /// Suggested challenge identifier.
    pub id: ChallengeId,
    /// Challenge name.
    pub name: String,
    /// Challenge description markdown.
    pub description: String,
    /// Tags assigned by the trainer.
    pub system_tags: Vec<String>,
    /// Challenge rank, when ranked (`-8` hardest to `-1` easiest).
    pub rank: Option<i8>,
    /// Challenge page URL path.
    pub href: String,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Suggestion flow errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// A trainer request failed.
    #[error("suggestion request failed")]
    Http(
        #[from]
        #[source]
        reqwest::Error,
    ),
    /// No session JWT was found in the dashboard page body.
    #[error("session jwt not found in dashboard page")]
    JwtNotFound,
}

// ============================================================================
// SECTION: Client Operations
// ============================================================================

impl Client {
    /// Asks the trainer queue for the next challenge suggestion.
    ///
    /// Fetches the dashboard page for a session JWT, then peeks the queue for
    /// `lang` under `strategy`. `dequeue` removes the suggestion from the
    /// queue; peeking with `dequeue = false` leaves it in place.
    ///
    /// # Errors
    ///
    /// Returns [`SuggestError`] when a request fails or the dashboard page
    /// carries no session JWT.
    pub fn suggest_challenge(
        &self,
        lang: KnownLang,
        strategy: SuggestStrategy,
        dequeue: bool,
    ) -> Result<SuggestedChallenge, SuggestError> {
        let url = self.endpoint("/dashboard");
        let body = self.get(&url).send()?.error_for_status()?.text()?;
        let jwt = find_session_jwt(&body).ok_or(SuggestError::JwtNotFound)?.to_string();
        let url = self.endpoint(&format!("/trainer/peek/{lang}/{strategy}?dequeue={dequeue}"));
        log::debug!("peeking trainer queue for {lang} ({strategy})");
        Ok(self.get(&url).header(AUTHORIZATION, jwt).send()?.error_for_status()?.json()?)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use super::SuggestStrategy;
    use super::SuggestedChallenge;

    #[test]
    fn suggestion_payload_decodes() {
        let payload = r#"{
            "success": true,
            "strategy": "default",
            "language": "rust",
            "id": "5277c8a221e209d3f6000b56",
            "name": "Example Challenge",
            "description": "Do the thing.",
            "systemTags": ["algorithms"],
            "rank": -6,
            "href": "/kata/5277c8a221e209d3f6000b56"
        }"#;
        let suggested: SuggestedChallenge = serde_json::from_str(payload).unwrap();
        assert!(suggested.success);
        assert_eq!(suggested.strategy, SuggestStrategy::RankUp);
        assert_eq!(suggested.id.to_string(), "5277c8a221e209d3f6000b56");
        assert_eq!(suggested.rank, Some(-6));
    }

    #[test]
    fn unranked_suggestion_decodes_with_null_rank() {
        let payload = r#"{
            "success": true,
            "strategy": "beta_workout",
            "language": "haskell",
            "id": "5277c8a221e209d3f6000b56",
            "name": "Beta Challenge",
            "description": "Untested.",
            "systemTags": [],
            "rank": null,
            "href": "/kata/5277c8a221e209d3f6000b56"
        }"#;
        let suggested: SuggestedChallenge = serde_json::from_str(payload).unwrap();
        assert_eq!(suggested.strategy, SuggestStrategy::Beta);
        assert_eq!(suggested.rank, None);
    }

    #[test]
    fn strategy_wire_labels_are_stable() {
        assert_eq!(SuggestStrategy::Fundamental.as_str(), "reference_workout");
        assert_eq!(SuggestStrategy::RankUp.as_str(), "default");
        assert_eq!(SuggestStrategy::Practice.as_str(), "retrain_workout");
    }
}
