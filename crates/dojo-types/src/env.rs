// crates/dojo-types/src/env.rs
// ============================================================================
// Module: Deployment Environments
// Description: Closed set of trainer deployment-mode labels.
// Purpose: Parse and serialize the bootstrap environment tag strictly.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The trainer bootstrap payload carries an environment tag drawn from a
//! small closed set of deployment-mode labels. Unknown labels are rejected
//! rather than defaulted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Deployment mode advertised by a trainer page.
///
/// # Invariants
/// - The wire form is the lowercase label; no other spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development deployment.
    Development,
    /// Test deployment.
    Test,
    /// Staging deployment.
    Staging,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Returns the wire label for this environment.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for labels outside the closed environment set.
#[derive(Debug, Error)]
#[error("unknown environment label: {0}")]
pub struct UnknownEnvironment(pub String);

impl FromStr for Environment {
    type Err = UnknownEnvironment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(UnknownEnvironment(other.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use std::str::FromStr;

    use super::Environment;

    #[test]
    fn parses_every_label() {
        for (label, expected) in [
            ("development", Environment::Development),
            ("test", Environment::Test),
            ("staging", Environment::Staging),
            ("production", Environment::Production),
        ] {
            assert_eq!(Environment::from_str(label).unwrap(), expected);
            assert_eq!(expected.as_str(), label);
        }
    }

    #[test]
    fn rejects_unknown_label() {
        let err = Environment::from_str("Production").unwrap_err();
        assert_eq!(err.0, "Production");
    }

    #[test]
    fn serde_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&Environment::Production).unwrap();
        assert_eq!(json, "\"production\"");
        let back: Environment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Environment::Production);
    }
}
