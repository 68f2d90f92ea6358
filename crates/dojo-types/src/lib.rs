// crates/dojo-types/src/lib.rs
// ============================================================================
// Module: Dojo Types
// Description: Canonical identifiers and closed vocabularies for the trainer.
// Purpose: Provide strongly typed, serializable domain values with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Shared domain types used by every dojo crate. Challenge identifiers parse
//! strictly from their 24-hex wire form, language identifiers and deployment
//! environments are closed vocabularies, and all types serialize to the exact
//! strings the trainer backend uses on the wire.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod challenge_id;
pub mod env;
pub mod lang;

pub use challenge_id::ChallengeId;
pub use challenge_id::ChallengeIdError;
pub use env::Environment;
pub use env::UnknownEnvironment;
pub use lang::KnownLang;
pub use lang::UnknownLang;
