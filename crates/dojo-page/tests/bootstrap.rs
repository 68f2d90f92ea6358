// crates/dojo-page/tests/bootstrap.rs
// ============================================================================
// Module: Bootstrap Extraction Tests
// Description: Fixture-driven checks for the bootstrap record and its laws.
// ============================================================================

//! ## Overview
//! Extracts the bootstrap record from a captured trainer page fixture and
//! verifies the three laws the record must satisfy: an empty data payload
//! fails to decode with a parse error, the route table matches the fixture's
//! literal entries exactly, and no route value is mutated by extraction or
//! expansion.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;

use dojo_page::DataPayloadError;
use dojo_page::PageBootstrap;
use dojo_page::RouteTable;
use dojo_page::find_project_id;
use dojo_types::Environment;

/// Captured trainer page bootstrap call.
const TRAINER_PAGE: &str = include_str!("fixtures/trainer_page.js");

/// Every route the fixture declares, with its exact literal value.
const FIXTURE_ROUTES: [(&str, &str); 16] = [
    ("user_profile", "/users/example"),
    ("user_stars", "/user/stars"),
    ("star_code_challenge", "/users/stars/%7Bid%7D"),
    ("mark_notifications_read", "/users/notifications/mark_read"),
    ("unread_popup_notifications", "/users/notifications/unread_popups"),
    ("collections", "/api/v1/collections"),
    ("collection_code_challenge", "/api/v1/collections/%7BcollectionId%7D/code_challenges/%7Bid%7D"),
    ("session", "/kata/projects/aaaaaaaaaaaaaaaaaaaaaaaa/%7Blanguage%7D/session"),
    (
        "notify",
        "/api/v1/code-challenges/projects/aaaaaaaaaaaaaaaaaaaaaaaa/solutions/%7BsolutionId%7D/notify",
    ),
    (
        "finalize",
        "/api/v1/code-challenges/projects/aaaaaaaaaaaaaaaaaaaaaaaa/solutions/%7BsolutionId%7D/finalize",
    ),
    ("skip", "/kata/projects/aaaaaaaaaaaaaaaaaaaaaaaa/skip"),
    ("report", "/kata/000000000000000000000000"),
    ("comments", "/kata/000000000000000000000000/discuss/rust"),
    ("solutions", "/kata/000000000000000000000000/solutions/%7Blanguage%7D"),
    ("editor", "/kata/000000000000000000000000/edit/%7Blanguage%7D"),
    ("forfeit", "/kata/000000000000000000000000/solutions?show-solutions=1"),
];

#[test]
fn fixture_record_extracts_completely() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    assert_eq!(bootstrap.env, Environment::Production);
    assert_eq!(bootstrap.current_user, None);
    assert_eq!(bootstrap.page_controller_name, "CodeChallenges.PlayController");
}

#[test]
fn empty_data_payload_fails_with_parse_error() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    assert!(bootstrap.data.is_empty());
    assert!(matches!(bootstrap.data.decode(), Err(DataPayloadError::Json(_))));
}

#[test]
fn route_table_matches_fixture_exactly() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    let expected = RouteTable::from_entries(FIXTURE_ROUTES).unwrap();
    assert_eq!(bootstrap.routes, expected);
    assert_eq!(bootstrap.routes.len(), FIXTURE_ROUTES.len());
}

#[test]
fn route_values_survive_consumers_unchanged() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    let editor = bootstrap.routes.get("editor").unwrap();

    let mut params = BTreeMap::new();
    params.insert("language".to_string(), "rust".to_string());
    let expanded = editor.expand(&params).unwrap();
    assert_eq!(expanded, "/kata/000000000000000000000000/edit/rust");

    // Expansion allocates; the stored template is untouched.
    assert_eq!(editor.as_str(), "/kata/000000000000000000000000/edit/%7Blanguage%7D");

    // A second extraction of the same page yields identical literals.
    let again = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    assert_eq!(again.routes, bootstrap.routes);
}

#[test]
fn fixture_placeholders_enumerate() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    let notify = bootstrap.routes.get("notify").unwrap();
    assert_eq!(notify.placeholders().unwrap(), vec!["solutionId"]);
    let forfeit = bootstrap.routes.get("forfeit").unwrap();
    assert!(forfeit.is_concrete().unwrap());
}

#[test]
fn project_id_is_recoverable_from_fixture() {
    assert_eq!(find_project_id(TRAINER_PAGE), Some("aaaaaaaaaaaaaaaaaaaaaaaa"));
}

#[test]
fn bootstrap_record_serializes_with_verbatim_routes() {
    let bootstrap = PageBootstrap::from_page(TRAINER_PAGE).unwrap();
    let json = serde_json::to_value(&bootstrap).unwrap();
    assert_eq!(json["env"], "production");
    assert_eq!(json["routes"]["skip"], "/kata/projects/aaaaaaaaaaaaaaaaaaaaaaaa/skip");
}
