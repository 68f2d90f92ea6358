// crates/dojo-types/src/challenge_id.rs
// ============================================================================
// Module: Challenge Identifiers
// Description: Strongly typed 24-hex challenge identifiers.
// Purpose: Parse, render, and serialize challenge identifiers with strict validation.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A challenge identifier is a 12-byte value rendered as 24 lowercase hex
//! characters everywhere it crosses a boundary (URLs, page bodies, JSON).
//! Parsing is strict: wrong length or non-hex input is rejected, never
//! truncated or padded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use thiserror::Error;

// ============================================================================
// SECTION: Challenge Identifier
// ============================================================================

/// Number of raw bytes in a challenge identifier.
const ID_BYTES: usize = 12;

/// Number of hex characters in the wire form.
const ID_HEX_LEN: usize = ID_BYTES * 2;

/// Identifier of a code challenge.
///
/// # Invariants
/// - Always 12 bytes; the wire form is always 24 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChallengeId([u8; ID_BYTES]);

impl ChallengeId {
    /// Creates a challenge identifier from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Returns the raw identifier bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ID_BYTES] {
        &self.0
    }
}

/// Challenge identifier parse errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChallengeIdError {
    /// Input length differs from the 24-character wire form.
    #[error("challenge id has length {0}, expected {ID_HEX_LEN}")]
    InvalidLength(usize),
    /// Input contains a character outside lowercase hex.
    #[error("challenge id has invalid hex at byte {0}")]
    InvalidHex(usize),
}

/// Decodes one lowercase hex digit; uppercase is not accepted.
const fn hex_nibble(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

impl FromStr for ChallengeId {
    type Err = ChallengeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_HEX_LEN {
            return Err(ChallengeIdError::InvalidLength(s.len()));
        }
        let mut bytes = [0_u8; ID_BYTES];
        let digits = s.as_bytes();
        for (index, byte) in bytes.iter_mut().enumerate() {
            let high = hex_nibble(digits[index * 2]).ok_or(ChallengeIdError::InvalidHex(index * 2))?;
            let low = hex_nibble(digits[index * 2 + 1])
                .ok_or(ChallengeIdError::InvalidHex(index * 2 + 1))?;
            *byte = (high << 4) | low;
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<&str> for ChallengeId {
    type Error = ChallengeIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl fmt::Display for ChallengeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for ChallengeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChallengeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        /// Visitor decoding the 24-hex wire form.
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = ChallengeId;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 24-character hex challenge id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                ChallengeId::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(Visitor)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use std::str::FromStr;

    use super::ChallengeId;
    use super::ChallengeIdError;

    #[test]
    fn parses_canonical_form() {
        let id = ChallengeId::from_str("000000000000000000000000").unwrap();
        assert_eq!(id.as_bytes(), &[0_u8; 12]);
        assert_eq!(id.to_string(), "000000000000000000000000");
    }

    #[test]
    fn round_trips_mixed_digits() {
        let text = "5277c8a221e209d3f6000b56";
        let id = ChallengeId::from_str(text).unwrap();
        assert_eq!(id.to_string(), text);
    }

    #[test]
    fn rejects_wrong_length() {
        let err = ChallengeId::from_str("abc").unwrap_err();
        assert!(matches!(err, ChallengeIdError::InvalidLength(3)));
    }

    #[test]
    fn rejects_non_hex() {
        let err = ChallengeId::from_str("zz77c8a221e209d3f6000b56").unwrap_err();
        assert_eq!(err, ChallengeIdError::InvalidHex(0));
    }

    #[test]
    fn rejects_uppercase_hex() {
        let err = ChallengeId::from_str("5277C8A221E209D3F6000B56").unwrap_err();
        assert_eq!(err, ChallengeIdError::InvalidHex(4));
    }

    #[test]
    fn rejects_sign_prefixed_pairs() {
        let err = ChallengeId::from_str("+f77c8a221e209d3f6000b56").unwrap_err();
        assert_eq!(err, ChallengeIdError::InvalidHex(0));
    }
}
