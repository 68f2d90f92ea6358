// crates/dojo-cli/src/config.rs
// ============================================================================
// Module: CLI Configuration
// Description: TOML configuration loading for the dojo CLI.
// Purpose: Load credentials and transport settings with strict input guards.
// Dependencies: dojo-client, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The CLI reads a TOML file with a required `[credentials]` table and an
//! optional `[http]` table overriding transport defaults. Loading is strict:
//! oversized or non-UTF-8 files and empty credential values are rejected
//! with typed errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;

use dojo_client::ClientConfig;
use dojo_client::Credentials;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default configuration file path.
pub(crate) const DEFAULT_PATH: &str = "dojo.toml";

/// Maximum size of a configuration file.
const MAX_CONFIG_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file")]
    Io(#[source] std::io::Error),
    /// The configuration file exceeds the size limit.
    #[error("config file exceeds size limit")]
    TooLarge,
    /// The configuration file is not UTF-8.
    #[error("config file must be utf-8")]
    NotUtf8,
    /// The configuration file is not valid TOML.
    #[error("config file is not valid toml")]
    Toml(
        #[from]
        #[source]
        toml::de::Error,
    ),
    /// A credential value is empty.
    #[error("credential value must not be empty: {0}")]
    EmptyCredential(&'static str),
}

// ============================================================================
// SECTION: Raw Layout
// ============================================================================

/// Raw TOML layout before defaults are applied.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Required credentials table.
    credentials: RawCredentials,
    /// Optional transport overrides.
    #[serde(default)]
    http: RawHttp,
}

/// Raw `[credentials]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCredentials {
    /// Value of the `_session_id` cookie.
    session_id: String,
    /// Value of the `remember_user_token` cookie.
    remember_user_token: String,
}

/// Raw `[http]` table; every field falls back to the client default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHttp {
    /// Trainer site base URL override.
    base_url: Option<String>,
    /// Runner service base URL override.
    runner_url: Option<String>,
    /// Request timeout override in milliseconds.
    timeout_ms: Option<u64>,
    /// User agent override.
    user_agent: Option<String>,
    /// Cleartext HTTP opt-in.
    allow_http: Option<bool>,
}

// ============================================================================
// SECTION: Loaded Configuration
// ============================================================================

/// Validated CLI configuration.
#[derive(Debug)]
pub(crate) struct DojoConfig {
    /// Session cookie pair.
    pub(crate) credentials: Credentials,
    /// Transport configuration with defaults applied.
    pub(crate) http: ClientConfig,
}

impl DojoConfig {
    /// Loads and validates the configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds limits,
    /// is not UTF-8 or TOML, or carries empty credentials.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_PATH));
        let bytes = fs::read(path).map_err(ConfigError::Io)?;
        if bytes.len() > MAX_CONFIG_BYTES {
            return Err(ConfigError::TooLarge);
        }
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        let raw: RawConfig = toml::from_str(&text)?;
        if raw.credentials.session_id.is_empty() {
            return Err(ConfigError::EmptyCredential("session_id"));
        }
        if raw.credentials.remember_user_token.is_empty() {
            return Err(ConfigError::EmptyCredential("remember_user_token"));
        }
        let defaults = ClientConfig::default();
        Ok(Self {
            credentials: Credentials {
                session_id: raw.credentials.session_id,
                remember_user_token: raw.credentials.remember_user_token,
            },
            http: ClientConfig {
                base_url: raw.http.base_url.unwrap_or(defaults.base_url),
                runner_url: raw.http.runner_url.unwrap_or(defaults.runner_url),
                timeout_ms: raw.http.timeout_ms.unwrap_or(defaults.timeout_ms),
                user_agent: raw.http.user_agent.unwrap_or(defaults.user_agent),
                allow_http: raw.http.allow_http.unwrap_or(defaults.allow_http),
            },
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Panic-based assertions are permitted in tests.")]

    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::ConfigError;
    use super::DojoConfig;

    /// Writes `content` to a temporary config file.
    fn config_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn minimal_config_applies_defaults() {
        let file = config_file(
            b"[credentials]\nsession_id = \"sid\"\nremember_user_token = \"rut\"\n",
        );
        let config = DojoConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.credentials.session_id, "sid");
        assert_eq!(config.http.base_url, "https://www.codewars.com");
        assert!(!config.http.allow_http);
    }

    #[test]
    fn http_overrides_are_applied() {
        let file = config_file(
            b"[credentials]\nsession_id = \"sid\"\nremember_user_token = \"rut\"\n\n[http]\nbase_url = \"http://127.0.0.1:8080\"\nallow_http = true\ntimeout_ms = 5000\n",
        );
        let config = DojoConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.http.base_url, "http://127.0.0.1:8080");
        assert!(config.http.allow_http);
        assert_eq!(config.http.timeout_ms, 5000);
    }

    #[test]
    fn empty_credential_is_rejected() {
        let file =
            config_file(b"[credentials]\nsession_id = \"\"\nremember_user_token = \"rut\"\n");
        let err = DojoConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCredential("session_id")));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let payload = vec![b'a'; 1024 * 1024 + 1];
        let file = config_file(&payload);
        let err = DojoConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge));
    }

    #[test]
    fn non_utf8_file_is_rejected() {
        let file = config_file(&[0xFF, 0xFE, 0xFF]);
        let err = DojoConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::NotUtf8));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = config_file(
            b"[credentials]\nsession_id = \"sid\"\nremember_user_token = \"rut\"\nextra = 1\n",
        );
        let err = DojoConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DojoConfig::load(Some(std::path::Path::new("/nonexistent/dojo.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
