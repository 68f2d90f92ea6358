// crates/dojo-page/src/lib.rs
// ============================================================================
// Module: Dojo Page
// Description: Trainer page bootstrap model and extraction.
// Purpose: Model the App.setup bootstrap payload and extract it from page bodies.
// Dependencies: dojo-types, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Trainer pages hand their client-side application a single bootstrap call,
//! `App.setup({...})`, carrying an environment tag, an opaque current-user
//! reference, a JSON data payload, a mapping of logical route names to URL
//! templates, and a page controller name. This crate models that record and
//! extracts it from raw page bodies. Page bodies are untrusted input: every
//! scanner failure is a typed error and nothing is defaulted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bootstrap;
pub mod extract;
pub mod routes;

pub use bootstrap::DataPayload;
pub use bootstrap::DataPayloadError;
pub use bootstrap::PageBootstrap;
pub use extract::ExtractError;
pub use extract::find_project_id;
pub use extract::find_session_jwt;
pub use routes::DuplicateRoute;
pub use routes::RouteError;
pub use routes::RouteTable;
pub use routes::RouteTemplate;
