// crates/dojo-client/src/result.rs
// ============================================================================
// Module: Runner Results
// Description: Payloads returned by the runner service.
// Purpose: Decode runner output trees and pass/fail statistics.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The runner returns a relay token, captured process streams, and a nested
//! output tree of describe/it blocks with pass/fail statistics. Empty
//! message and stream strings are normalized to `None` at the deserialization
//! boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::de;

// ============================================================================
// SECTION: Output Tree
// ============================================================================

/// One node of the runner output tree.
///
/// # Invariants
/// - The wire form is tagged with `t` and lowercase node names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(tag = "t")]
pub enum Output {
    /// A describe block grouping nested nodes.
    Describe {
        /// Whether every nested assertion passed.
        #[serde(rename = "p")]
        pass: bool,
        /// Block label.
        v: String,
        /// Nested output nodes.
        #[serde(default)]
        items: Vec<Output>,
    },
    /// An it block grouping assertions.
    It {
        /// Whether every nested assertion passed.
        #[serde(rename = "p")]
        pass: bool,
        /// Block label.
        v: String,
        /// Nested output nodes.
        #[serde(default)]
        items: Vec<Output>,
    },
    /// A passed assertion.
    Passed {
        /// Assertion message.
        v: String,
    },
    /// A failed assertion.
    Failed {
        /// Assertion message.
        v: String,
    },
    /// A log line emitted by the solution.
    Log {
        /// Logged text.
        v: String,
    },
    /// An error reported by the runner.
    Error {
        /// Error text.
        v: String,
    },
    /// Completion timing marker.
    CompletedIn {
        /// Elapsed milliseconds as text.
        v: String,
    },
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Pass/fail counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RunStat {
    /// Number of passed checks.
    pub passed: u32,
    /// Number of failed checks.
    pub failed: u32,
}

/// Pass/fail counters with a hidden subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RunStatHidden {
    /// Number of passed checks.
    pub passed: u32,
    /// Number of failed checks.
    pub failed: u32,
    /// Counters for hidden checks.
    pub hidden: RunStat,
}

/// Aggregated result of one runner execution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Whether the runner itself errored.
    pub server_error: bool,
    /// Whether the run completed.
    pub completed: bool,
    /// Output tree in execution order.
    pub output: Vec<Output>,
    /// Passed assertion count.
    pub passed: u32,
    /// Failed assertion count.
    pub failed: u32,
    /// Error count.
    pub errors: u32,
    /// Assertion statistics.
    pub assertions: RunStatHidden,
    /// Spec statistics.
    pub specs: RunStatHidden,
    /// Unweighted statistics.
    pub unweighted: RunStat,
    /// Weighted statistics.
    pub weighted: RunStat,
    /// Whether the run timed out.
    pub timed_out: bool,
    /// Wall-clock time in milliseconds.
    pub wall_time: u32,
    /// Test time in milliseconds, when reported.
    pub test_time: Option<u32>,
}

/// Top-level runner response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Process exit code.
    pub exit_code: u32,
    /// Relay token for the follow-up notify call.
    pub token: String,
    /// Runner message; empty strings become `None`.
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub message: Option<String>,
    /// Captured stdout; empty strings become `None`.
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub stdout: Option<String>,
    /// Captured stderr; empty strings become `None`.
    #[serde(deserialize_with = "deserialize_opt_str")]
    pub stderr: Option<String>,
    /// Detailed run result; boxed to keep the struct small.
    pub result: Box<RunResult>,
}

/// Deserializes a string field, mapping empty strings to `None`.
fn deserialize_opt_str<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    /// Visitor normalizing empty strings to `None`.
    struct Visitor;

    impl de::Visitor<'_> for Visitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(if v.is_empty() {
                None
            } else {
                Some(v.to_string())
            })
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(if v.is_empty() {
                None
            } else {
                Some(v)
            })
        }
    }

    deserializer.deserialize_str(Visitor)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use super::Output;
    use super::TestResult;

    /// Runner response with one passing describe block.
    const RUNNER_RESPONSE: &str = r#"{
        "exitCode": 0,
        "token": "relay-token",
        "message": "",
        "stdout": "ok",
        "stderr": "",
        "result": {
            "serverError": false,
            "completed": true,
            "output": [
                { "t": "describe", "p": true, "v": "adds", "items": [
                    { "t": "passed", "v": "Test Passed" }
                ] }
            ],
            "passed": 1,
            "failed": 0,
            "errors": 0,
            "assertions": { "passed": 1, "failed": 0, "hidden": { "passed": 0, "failed": 0 } },
            "specs": { "passed": 1, "failed": 0, "hidden": { "passed": 0, "failed": 0 } },
            "unweighted": { "passed": 1, "failed": 0 },
            "weighted": { "passed": 1, "failed": 0 },
            "timedOut": false,
            "wallTime": 512,
            "testTime": 40
        }
    }"#;

    #[test]
    fn runner_response_decodes() {
        let result: TestResult = serde_json::from_str(RUNNER_RESPONSE).unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.token, "relay-token");
        assert_eq!(result.message, None);
        assert_eq!(result.stdout.as_deref(), Some("ok"));
        assert_eq!(result.stderr, None);
        assert!(result.result.completed);
        assert_eq!(result.result.passed, 1);
        assert!(matches!(
            result.result.output.first(),
            Some(Output::Describe {
                pass: true,
                ..
            })
        ));
    }

    #[test]
    fn missing_test_time_decodes_as_none() {
        let trimmed = RUNNER_RESPONSE.replace(",\n            \"testTime\": 40", "");
        let result: TestResult = serde_json::from_str(&trimmed).unwrap();
        assert_eq!(result.result.test_time, None);
    }
}
