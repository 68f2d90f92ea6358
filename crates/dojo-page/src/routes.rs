// crates/dojo-page/src/routes.rs
// ============================================================================
// Module: Route Templates
// Description: Logical route names mapped to URL path templates.
// Purpose: Store route templates verbatim and expand placeholder tokens on demand.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A route template is a URL path string, possibly containing placeholder
//! tokens delimited by the encoded braces `%7B` and `%7D` (for example
//! `/kata/000000000000000000000000/edit/%7Blanguage%7D`). Templates are
//! stored exactly as they appear in the page body; expansion substitutes
//! placeholders into a fresh string and never mutates the stored template.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Route Template
// ============================================================================

/// Encoded opening brace delimiting a placeholder token.
const OPEN: &str = "%7B";

/// Encoded closing brace delimiting a placeholder token.
const CLOSE: &str = "%7D";

/// Route template errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    /// A placeholder opened with `%7B` but never closed with `%7D`.
    #[error("unterminated placeholder at byte {0}")]
    UnterminatedPlaceholder(usize),
    /// Expansion was asked to fill a placeholder with no matching parameter.
    #[error("missing expansion parameter: {0}")]
    MissingParameter(String),
}

/// URL path template associated with a logical route name.
///
/// # Invariants
/// - The stored string is the verbatim page-body value; no normalization or
///   decoding is applied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTemplate(String);

impl RouteTemplate {
    /// Creates a template from its verbatim page-body value.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Returns the verbatim template string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Enumerates placeholder token names in order of appearance.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnterminatedPlaceholder`] when an opening token
    /// has no closing token.
    pub fn placeholders(&self) -> Result<Vec<&str>, RouteError> {
        let mut names = Vec::new();
        let mut rest = self.0.as_str();
        let mut offset = 0;
        while let Some(start) = rest.find(OPEN) {
            let after_open = start + OPEN.len();
            let Some(len) = rest[after_open..].find(CLOSE) else {
                return Err(RouteError::UnterminatedPlaceholder(offset + start));
            };
            names.push(&rest[after_open..after_open + len]);
            let consumed = after_open + len + CLOSE.len();
            rest = &rest[consumed..];
            offset += consumed;
        }
        Ok(names)
    }

    /// Returns true when the template contains no placeholder tokens.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnterminatedPlaceholder`] when the template is
    /// malformed.
    pub fn is_concrete(&self) -> Result<bool, RouteError> {
        Ok(self.placeholders()?.is_empty())
    }

    /// Substitutes every placeholder with its parameter value.
    ///
    /// Surplus parameters are ignored; the stored template is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the template is malformed or a placeholder
    /// has no matching parameter.
    pub fn expand(&self, params: &BTreeMap<String, String>) -> Result<String, RouteError> {
        let mut out = String::with_capacity(self.0.len());
        let mut rest = self.0.as_str();
        let mut offset = 0;
        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after_open = start + OPEN.len();
            let Some(len) = rest[after_open..].find(CLOSE) else {
                return Err(RouteError::UnterminatedPlaceholder(offset + start));
            };
            let name = &rest[after_open..after_open + len];
            let value = params
                .get(name)
                .ok_or_else(|| RouteError::MissingParameter(name.to_string()))?;
            out.push_str(value);
            let consumed = after_open + len + CLOSE.len();
            rest = &rest[consumed..];
            offset += consumed;
        }
        out.push_str(rest);
        Ok(out)
    }
}

impl fmt::Display for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Route Table
// ============================================================================

/// Error returned when a route name appears more than once.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("duplicate route name: {0}")]
pub struct DuplicateRoute(pub String);

/// Mapping from unique logical route names to URL path templates.
///
/// # Invariants
/// - Names are unique; construction fails on duplicates.
/// - Iteration order is the sorted name order.
/// - Stored templates are handed out by reference and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable(BTreeMap<String, RouteTemplate>);

impl RouteTable {
    /// Builds a table from `(name, template)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateRoute`] when a name appears more than once.
    pub fn from_entries<I, N, T>(entries: I) -> Result<Self, DuplicateRoute>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (name, template) in entries {
            let name = name.into();
            if table.contains_key(&name) {
                return Err(DuplicateRoute(name));
            }
            table.insert(name, RouteTemplate::new(template));
        }
        Ok(Self(table))
    }

    /// Looks up a template by logical route name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RouteTemplate> {
        self.0.get(name)
    }

    /// Iterates `(name, template)` pairs in sorted name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, RouteTemplate> {
        self.0.iter()
    }

    /// Returns the number of routes in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the table contains no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = (&'a String, &'a RouteTemplate);
    type IntoIter = btree_map::Iter<'a, String, RouteTemplate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use std::collections::BTreeMap;

    use super::RouteError;
    use super::RouteTable;
    use super::RouteTemplate;

    #[test]
    fn placeholders_enumerate_in_order() {
        let template =
            RouteTemplate::new("/api/v1/collections/%7BcollectionId%7D/code_challenges/%7Bid%7D");
        assert_eq!(template.placeholders().unwrap(), vec!["collectionId", "id"]);
        assert!(!template.is_concrete().unwrap());
    }

    #[test]
    fn concrete_template_has_no_placeholders() {
        let template = RouteTemplate::new("/user/stars");
        assert!(template.is_concrete().unwrap());
    }

    #[test]
    fn expand_substitutes_and_preserves_template() {
        let template = RouteTemplate::new("/kata/000000000000000000000000/edit/%7Blanguage%7D");
        let mut params = BTreeMap::new();
        params.insert("language".to_string(), "rust".to_string());
        params.insert("unused".to_string(), "ignored".to_string());
        let expanded = template.expand(&params).unwrap();
        assert_eq!(expanded, "/kata/000000000000000000000000/edit/rust");
        assert_eq!(template.as_str(), "/kata/000000000000000000000000/edit/%7Blanguage%7D");
    }

    #[test]
    fn expand_reports_missing_parameter() {
        let template = RouteTemplate::new("/users/stars/%7Bid%7D");
        let err = template.expand(&BTreeMap::new()).unwrap_err();
        assert_eq!(err, RouteError::MissingParameter("id".to_string()));
    }

    #[test]
    fn unterminated_placeholder_is_rejected() {
        let template = RouteTemplate::new("/users/stars/%7Bid");
        assert_eq!(template.placeholders().unwrap_err(), RouteError::UnterminatedPlaceholder(13));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = RouteTable::from_entries([("session", "/a"), ("session", "/b")]).unwrap_err();
        assert_eq!(err.0, "session");
    }

    #[test]
    fn iteration_is_sorted_by_name() {
        let table = RouteTable::from_entries([("skip", "/skip"), ("editor", "/edit")]).unwrap();
        let names: Vec<&str> = table.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["editor", "skip"]);
    }
}
