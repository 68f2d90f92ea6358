// crates/dojo-page/src/extract.rs
// ============================================================================
// Module: Page Extraction
// Description: Scanners that pull bootstrap material out of raw page bodies.
// Purpose: Locate the App.setup argument and decode its keys without executing any script.
// Dependencies: dojo-types, thiserror
// ============================================================================

//! ## Overview
//! Trainer pages are HTML with inline script; the bootstrap payload is the
//! argument of a single `App.setup({...})` call and the session JWT and
//! project identifier are embedded elsewhere in the body. These scanners work
//! on the raw text. They skip string literals when balancing delimiters, they
//! never evaluate script, and every failure is a typed error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use dojo_types::Environment;
use dojo_types::UnknownEnvironment;
use thiserror::Error;

use crate::bootstrap::DataPayload;
use crate::routes::DuplicateRoute;
use crate::routes::RouteTable;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Page extraction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No `App.setup(` call was found in the page body.
    #[error("bootstrap call not found in page body")]
    SetupNotFound,
    /// The bootstrap call opened but its argument never closed.
    #[error("bootstrap call is unterminated")]
    UnterminatedSetup,
    /// A required bootstrap key is absent.
    #[error("bootstrap key not found: {0}")]
    MissingKey(&'static str),
    /// A bootstrap key is present but its value has an unexpected shape.
    #[error("malformed value for bootstrap key: {0}")]
    MalformedValue(&'static str),
    /// A route name appeared more than once.
    #[error(transparent)]
    DuplicateRoute(#[from] DuplicateRoute),
    /// The environment label is outside the closed set.
    #[error(transparent)]
    Environment(#[from] UnknownEnvironment),
}

// ============================================================================
// SECTION: Setup Argument
// ============================================================================

/// Marker opening the bootstrap call.
const SETUP_MARKER: &str = "App.setup(";

/// Returns the argument text of the page's `App.setup(...)` call.
///
/// Parentheses inside string literals are ignored while balancing.
///
/// # Errors
///
/// Returns [`ExtractError`] when the call is absent or unterminated.
pub fn setup_argument(page: &str) -> Result<&str, ExtractError> {
    let start = page.find(SETUP_MARKER).ok_or(ExtractError::SetupNotFound)? + SETUP_MARKER.len();
    let body = &page[start..];
    let mut depth = 1_usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    for (at, ch) in body.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => in_string = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&body[..at]);
                }
            }
            _ => {}
        }
    }
    Err(ExtractError::UnterminatedSetup)
}

// ============================================================================
// SECTION: Body Scanners
// ============================================================================

/// Path prefix preceding the project identifier in page bodies.
const PROJECT_ID_MARKER: &str = "/api/v1/code-challenges/projects/";

/// Returns the project identifier embedded in a trainer page body.
#[must_use]
pub fn find_project_id(input: &str) -> Option<&str> {
    let after = &input[input.find(PROJECT_ID_MARKER)? + PROJECT_ID_MARKER.len()..];
    Some(after.split_once('/')?.0)
}

/// Escaped key preceding the session JWT in page bodies.
const JWT_KEY: &str = "\\\"jwt\\\"";

/// Returns the session JWT embedded in a trainer page body.
///
/// The JWT lives inside a `JSON.parse` string, so the surrounding quotes are
/// backslash-escaped in the page source.
#[must_use]
pub fn find_session_jwt(input: &str) -> Option<&str> {
    let after_key = &input[input.find(JWT_KEY)? + JWT_KEY.len()..];
    let value = after_key.trim_start().strip_prefix(':')?.trim_start().strip_prefix("\\\"")?;
    Some(value.split_once("\\\"")?.0)
}

// ============================================================================
// SECTION: Property Scanners
// ============================================================================

/// Returns true for characters that may appear in a bare property name.
fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Locates `key` used as an object property and returns the text after it.
///
/// The key may be bare or quoted. A match requires a property boundary on the
/// left and a non-identifier character on the right, so `env` never matches
/// inside `environment`.
fn after_property_key<'a>(src: &'a str, key: &str) -> Option<&'a str> {
    for (at, _) in src.match_indices(key) {
        let before = src[..at].chars().next_back();
        let quoted = matches!(before, Some('"' | '\''));
        let boundary_ok = match before {
            None => true,
            Some(ch) => quoted || ch.is_whitespace() || ch == '{' || ch == ',',
        };
        if !boundary_ok {
            continue;
        }
        let mut rest = &src[at + key.len()..];
        if quoted {
            let Some(stripped) = rest.strip_prefix(['"', '\'']) else {
                continue;
            };
            rest = stripped;
        } else if rest.chars().next().is_some_and(is_ident_char) {
            continue;
        }
        let next = rest.trim_start().chars().next();
        if matches!(next, Some(':' | ',' | '}')) {
            return Some(rest);
        }
    }
    None
}

/// Parses a leading string literal and returns `(content, remainder)`.
///
/// The content is the verbatim source text between the quotes; escape
/// sequences are retained.
fn string_literal(src: &str) -> Option<(&str, &str)> {
    let mut chars = src.chars();
    let quote = chars.next().filter(|ch| matches!(ch, '"' | '\''))?;
    let body = &src[quote.len_utf8()..];
    let mut escaped = false;
    for (at, ch) in body.char_indices() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            return Some((&body[..at], &body[at + quote.len_utf8()..]));
        }
    }
    None
}

/// Returns the string value of a required `key: "value"` property.
fn string_property<'a>(setup: &'a str, key: &'static str) -> Result<&'a str, ExtractError> {
    let rest = after_property_key(setup, key).ok_or(ExtractError::MissingKey(key))?;
    let rest =
        rest.trim_start().strip_prefix(':').ok_or(ExtractError::MalformedValue(key))?.trim_start();
    let (content, _) = string_literal(rest).ok_or(ExtractError::MalformedValue(key))?;
    Ok(content)
}

// ============================================================================
// SECTION: Bootstrap Keys
// ============================================================================

/// Extracts the environment tag from a setup argument.
///
/// # Errors
///
/// Returns [`ExtractError`] when the key is absent, malformed, or outside the
/// closed environment set.
pub fn environment(setup: &str) -> Result<Environment, ExtractError> {
    Ok(Environment::from_str(string_property(setup, "env")?)?)
}

/// Extracts the current-user reference from a setup argument.
///
/// The shorthand property form (`currentUser,`) means the value is supplied
/// externally and is modeled as absent.
///
/// # Errors
///
/// Returns [`ExtractError`] when the key is absent or malformed.
pub fn current_user(setup: &str) -> Result<Option<String>, ExtractError> {
    let key = "currentUser";
    let rest = after_property_key(setup, key).ok_or(ExtractError::MissingKey(key))?;
    let rest = rest.trim_start();
    if rest.starts_with([',', '}']) {
        return Ok(None);
    }
    let rest = rest.strip_prefix(':').ok_or(ExtractError::MalformedValue(key))?.trim_start();
    let (content, _) = string_literal(rest).ok_or(ExtractError::MalformedValue(key))?;
    Ok(Some(content.to_string()))
}

/// Prefix of the data payload parse expression.
const JSON_PARSE: &str = "JSON.parse(";

/// Extracts the raw data payload string from a setup argument.
///
/// The payload is the string handed to the page's `JSON.parse` call; it is
/// returned verbatim and decoded lazily by [`DataPayload::decode`].
///
/// # Errors
///
/// Returns [`ExtractError`] when the key is absent or the value is not a
/// `JSON.parse("...")` expression.
pub fn data_payload(setup: &str) -> Result<DataPayload, ExtractError> {
    let key = "data";
    let rest = after_property_key(setup, key).ok_or(ExtractError::MissingKey(key))?;
    let rest =
        rest.trim_start().strip_prefix(':').ok_or(ExtractError::MalformedValue(key))?.trim_start();
    let rest = rest.strip_prefix(JSON_PARSE).ok_or(ExtractError::MalformedValue(key))?;
    let (content, _) = string_literal(rest).ok_or(ExtractError::MalformedValue(key))?;
    Ok(DataPayload::new(content))
}

/// Extracts the page controller name from a setup argument.
///
/// # Errors
///
/// Returns [`ExtractError`] when the key is absent or malformed.
pub fn controller_name(setup: &str) -> Result<String, ExtractError> {
    Ok(string_property(setup, "pageControllerName")?.to_string())
}

/// Extracts the route table from a setup argument.
///
/// Keys may be bare or quoted, values are string literals stored verbatim,
/// and trailing commas are tolerated. Duplicate names fail closed.
///
/// # Errors
///
/// Returns [`ExtractError`] when the key is absent, an entry is malformed, or
/// a name is duplicated.
pub fn routes_table(setup: &str) -> Result<RouteTable, ExtractError> {
    let key = "routes";
    let rest = after_property_key(setup, key).ok_or(ExtractError::MissingKey(key))?;
    let rest =
        rest.trim_start().strip_prefix(':').ok_or(ExtractError::MalformedValue(key))?.trim_start();
    let mut rest = rest.strip_prefix('{').ok_or(ExtractError::MalformedValue(key))?;

    let mut entries: Vec<(String, String)> = Vec::new();
    loop {
        rest = rest.trim_start_matches(|ch: char| ch.is_whitespace() || ch == ',');
        if rest.starts_with('}') {
            break;
        }
        let (name, after_name) = route_name(rest).ok_or(ExtractError::MalformedValue(key))?;
        let after_colon = after_name
            .trim_start()
            .strip_prefix(':')
            .ok_or(ExtractError::MalformedValue(key))?
            .trim_start();
        let (value, after_value) =
            string_literal(after_colon).ok_or(ExtractError::MalformedValue(key))?;
        entries.push((name.to_string(), value.to_string()));
        rest = after_value;
    }
    Ok(RouteTable::from_entries(entries)?)
}

/// Parses a leading route name (bare identifier or quoted string).
fn route_name(src: &str) -> Option<(&str, &str)> {
    if src.starts_with(['"', '\'']) {
        return string_literal(src);
    }
    let end = src.find(|ch: char| !is_ident_char(ch))?;
    if end == 0 {
        return None;
    }
    Some((&src[..end], &src[end..]))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
