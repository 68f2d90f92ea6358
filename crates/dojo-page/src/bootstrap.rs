// crates/dojo-page/src/bootstrap.rs
// ============================================================================
// Module: Bootstrap Payload
// Description: The App.setup configuration record and its data payload.
// Purpose: Model the bootstrap record and decode its JSON data payload strictly.
// Dependencies: dojo-types, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The bootstrap record is constructed once per page and never mutated: an
//! environment tag from a closed set, an opaque current-user reference, a
//! JSON data payload, a route table, and a page controller name. The data
//! payload is kept verbatim and decoded lazily; decoding an empty payload
//! fails with a parse error, exactly as the page's own JSON parser would
//! fail, and is never coerced to an empty object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use dojo_types::Environment;

use crate::extract;
use crate::extract::ExtractError;
use crate::routes::RouteTable;

// ============================================================================
// SECTION: Data Payload
// ============================================================================

/// Data payload decoding errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum DataPayloadError {
    /// The payload contains an invalid string escape sequence.
    #[error("invalid escape sequence at byte {0}")]
    BadEscape(usize),
    /// The unescaped payload is not a valid JSON document.
    #[error("data payload is not valid JSON")]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
}

/// Raw data payload handed to the page's JSON parse call.
///
/// # Invariants
/// - The stored string is the verbatim page-body value, escape sequences
///   included; construction never validates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPayload(String);

impl DataPayload {
    /// Creates a payload from its verbatim page-body value.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the verbatim payload string.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Returns true when the payload string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unescapes the payload and parses it as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DataPayloadError`] when an escape sequence is invalid or the
    /// payload is not a JSON document. An empty payload always fails here.
    pub fn decode(&self) -> Result<Value, DataPayloadError> {
        let text = decode_js_string(&self.0)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Decodes the JavaScript string-literal escapes found in page source.
fn decode_js_string(raw: &str) -> Result<String, DataPayloadError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices();
    while let Some((at, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let (_, escape) = chars.next().ok_or(DataPayloadError::BadEscape(at))?;
        match escape {
            '"' | '\'' | '\\' | '/' => out.push(escape),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            '0' => out.push('\0'),
            'u' => out.push(decode_unicode_escape(&mut chars, at)?),
            _ => return Err(DataPayloadError::BadEscape(at)),
        }
    }
    Ok(out)
}

/// Decodes a `\uXXXX` escape, pairing surrogates when required.
fn decode_unicode_escape(
    chars: &mut std::str::CharIndices<'_>,
    at: usize,
) -> Result<char, DataPayloadError> {
    let high = take_hex4(chars).ok_or(DataPayloadError::BadEscape(at))?;
    if (0xDC00..0xE000).contains(&high) {
        return Err(DataPayloadError::BadEscape(at));
    }
    if (0xD800..0xDC00).contains(&high) {
        let backslash = chars.next().map(|(_, ch)| ch);
        let marker = chars.next().map(|(_, ch)| ch);
        if backslash != Some('\\') || marker != Some('u') {
            return Err(DataPayloadError::BadEscape(at));
        }
        let low = take_hex4(chars).ok_or(DataPayloadError::BadEscape(at))?;
        if !(0xDC00..0xE000).contains(&low) {
            return Err(DataPayloadError::BadEscape(at));
        }
        let scalar = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
        return char::from_u32(scalar).ok_or(DataPayloadError::BadEscape(at));
    }
    char::from_u32(high).ok_or(DataPayloadError::BadEscape(at))
}

/// Reads four hex digits from the character stream.
fn take_hex4(chars: &mut std::str::CharIndices<'_>) -> Option<u32> {
    let mut value = 0_u32;
    for _ in 0..4 {
        let (_, ch) = chars.next()?;
        value = value * 16 + ch.to_digit(16)?;
    }
    Some(value)
}

// ============================================================================
// SECTION: Bootstrap Record
// ============================================================================

/// Configuration record passed to the page's bootstrap call.
///
/// # Invariants
/// - Constructed once per page; no field is mutated afterwards.
/// - `routes` values are the verbatim page-body template strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBootstrap {
    /// Deployment environment tag.
    pub env: Environment,
    /// Opaque current-user reference; absent when supplied externally.
    pub current_user: Option<String>,
    /// Raw data payload; decode lazily via [`DataPayload::decode`].
    pub data: DataPayload,
    /// Mapping of logical route names to URL path templates.
    pub routes: RouteTable,
    /// Controller name the page activates.
    pub page_controller_name: String,
}

impl PageBootstrap {
    /// Extracts the bootstrap record from a raw trainer page body.
    ///
    /// The data payload is not decoded here, so a placeholder payload does
    /// not prevent route extraction.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the setup call or any required key
    /// cannot be extracted.
    pub fn from_page(page: &str) -> Result<Self, ExtractError> {
        let setup = extract::setup_argument(page)?;
        Ok(Self {
            env: extract::environment(setup)?,
            current_user: extract::current_user(setup)?,
            data: extract::data_payload(setup)?,
            routes: extract::routes_table(setup)?,
            page_controller_name: extract::controller_name(setup)?,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
