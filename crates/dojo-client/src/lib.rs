// crates/dojo-client/src/lib.rs
// ============================================================================
// Module: Dojo Client
// Description: Blocking HTTP client for the trainer backend.
// Purpose: Start projects and sessions against trainer pages with strict transport policy.
// Dependencies: dojo-page, dojo-types, reqwest, reqwest_cookie_store, serde, thiserror, url
// ============================================================================

//! ## Overview
//! The client fetches trainer pages, extracts the project identifier and
//! session JWT from the page body, and drives the session lifecycle (start,
//! test, attempt, submit, skip). Transport policy is explicit: HTTPS is
//! required unless the configuration opts into cleartext for local test
//! servers, and requests carry a bounded timeout and a fixed user agent.
//! Cookies go through a shared cookie store: the session cookie pair is
//! seeded at construction, every `Set-Cookie` the trainer sends is retained,
//! and the CSRF token cookie is read back from the store before each
//! mutating request.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod result;
pub mod session;
pub mod suggest;

pub use result::RunResult;
pub use result::TestResult;
pub use session::Session;
pub use session::SessionError;
pub use suggest::SuggestError;
pub use suggest::SuggestStrategy;
pub use suggest::SuggestedChallenge;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::PoisonError;
use std::time::Duration;

use dojo_page::find_project_id;
use dojo_page::find_session_jwt;
use dojo_types::ChallengeId;
use dojo_types::KnownLang;
use percent_encoding::percent_decode_str;
use reqwest::blocking::RequestBuilder;
use reqwest::header::AUTHORIZATION;
use reqwest_cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreRwLock;
use reqwest_cookie_store::RawCookie;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the trainer client.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - URLs with embedded credentials are rejected.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Trainer site base URL.
    pub base_url: String,
    /// Runner service base URL.
    pub runner_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string for outbound requests.
    pub user_agent: String,
    /// Allow cleartext HTTP (disabled by default; local test servers only).
    pub allow_http: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.codewars.com".to_string(),
            runner_url: "https://runner.codewars.com".to_string(),
            timeout_ms: 30_000,
            user_agent: "dojo/0.1".to_string(),
            allow_http: false,
        }
    }
}

/// Session cookie pair identifying the signed-in user.
///
/// # Invariants
/// - Values are opaque; they are seeded into the cookie store at client
///   construction and sent on every trainer request from there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Value of the `_session_id` cookie.
    pub session_id: String,
    /// Value of the `remember_user_token` cookie.
    pub remember_user_token: String,
}

/// Builds a cookie store seeded with the session cookie pair.
fn seed_cookies(credentials: &Credentials, base_url: &Url) -> Result<CookieStore, ClientError> {
    let mut store = CookieStore::default();
    for (name, value) in [
        ("_session_id", &credentials.session_id),
        ("remember_user_token", &credentials.remember_user_token),
    ] {
        let mut cookie = RawCookie::new(name, value.as_str());
        cookie.set_path("/");
        cookie.set_http_only(true);
        store
            .insert_raw(&cookie, base_url)
            .map_err(|err| ClientError::CookieSeed(err.to_string()))?;
    }
    Ok(store)
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A configured URL failed to parse.
    #[error("invalid {which} url")]
    InvalidUrl {
        /// Which configured URL failed (`base` or `runner`).
        which: &'static str,
        /// Underlying parse failure.
        #[source]
        source: url::ParseError,
    },
    /// A configured URL uses cleartext HTTP without `allow_http`.
    #[error("cleartext http is not allowed for {0} url")]
    CleartextNotAllowed(&'static str),
    /// A configured URL embeds credentials.
    #[error("credentials are not allowed in {0} url")]
    CredentialsInUrl(&'static str),
    /// A session cookie could not be seeded into the cookie store.
    #[error("failed to seed session cookies: {0}")]
    CookieSeed(String),
    /// The HTTP client could not be built.
    #[error("http client build failed")]
    Build(#[source] reqwest::Error),
}

/// Errors starting a project from a trainer page.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum StartProjectError {
    /// The trainer page request failed.
    #[error("failed to fetch trainer page")]
    Http(
        #[from]
        #[source]
        reqwest::Error,
    ),
    /// No project identifier was found in the page body.
    #[error("project id not found in trainer page")]
    ProjectIdNotFound,
    /// No session JWT was found in the page body.
    #[error("session jwt not found in trainer page")]
    JwtNotFound,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Name of the CSRF token cookie set by trainer responses.
const CSRF_COOKIE: &str = "CSRF-TOKEN";

/// Blocking client for the trainer backend.
///
/// # Invariants
/// - Base and runner URLs are validated at construction.
/// - All trainer cookies live in the shared cookie store; the CSRF token is
///   read from the store before each mutating request, so a token set on any
///   response is honored by the next request.
#[derive(Debug)]
pub struct Client {
    /// Underlying blocking HTTP client.
    http: reqwest::blocking::Client,
    /// Validated trainer site base URL.
    base_url: Url,
    /// Validated runner service base URL.
    runner_url: Url,
    /// Cookie store shared with the HTTP client.
    cookies: Arc<CookieStoreRwLock>,
}

impl Client {
    /// Creates a client from configuration and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when a URL is invalid, a session cookie cannot
    /// be seeded, or the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url = validate_url("base", &config.base_url, config.allow_http)?;
        let runner_url = validate_url("runner", &config.runner_url, config.allow_http)?;
        let cookies = Arc::new(CookieStoreRwLock::new(seed_cookies(&credentials, &base_url)?));
        let http = reqwest::blocking::Client::builder()
            .cookie_provider(Arc::clone(&cookies))
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url,
            runner_url,
            cookies,
        })
    }

    /// Joins a path onto the trainer base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }

    /// Joins a path onto the runner base URL.
    pub(crate) fn runner_endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.runner_url.as_str().trim_end_matches('/'))
    }

    /// Starts a GET request against the trainer site.
    pub(crate) fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url)
    }

    /// Starts a POST request carrying the stored CSRF token.
    pub(crate) fn post_with_csrf(&self, url: &str) -> RequestBuilder {
        let request = self.http.post(url);
        let store = self.cookies.read().unwrap_or_else(PoisonError::into_inner);
        let domain = self.base_url.host_str().unwrap_or_default();
        match store.get(domain, "/", CSRF_COOKIE) {
            Some(cookie) => match percent_decode_str(cookie.value()).decode_utf8() {
                Ok(token) => {
                    log::debug!("adding csrf token to {url}");
                    request.header("X-CSRF-Token", token.as_ref())
                }
                Err(err) => {
                    log::error!("failed to decode csrf cookie: {err}");
                    request
                }
            },
            None => {
                log::warn!("no csrf token in store for {url}");
                request
            }
        }
    }

    /// Starts a bare POST request against the runner service.
    pub(crate) fn post_runner(&self, url: &str) -> RequestBuilder {
        self.http.post(url)
    }

    /// Fetches the trainer page for a challenge and extracts project material.
    ///
    /// # Errors
    ///
    /// Returns [`StartProjectError`] when the request fails or the page body
    /// carries no project identifier or session JWT.
    pub fn start_project(
        &self,
        challenge: &ChallengeId,
        lang: KnownLang,
    ) -> Result<ProjectHandle, StartProjectError> {
        let url = self.endpoint(&format!("/kata/{challenge}/train/{lang}"));
        let body = self.get(&url).send()?.error_for_status()?.text()?;
        log::trace!("trainer page body: {body}");
        let handle = ProjectHandle {
            id: find_project_id(&body).ok_or(StartProjectError::ProjectIdNotFound)?.to_string(),
            jwt: find_session_jwt(&body).ok_or(StartProjectError::JwtNotFound)?.to_string(),
            lang,
        };
        log::debug!("started project {} for challenge {challenge}", handle.id);
        Ok(handle)
    }

    /// Opens a training session for a started project.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the request fails or the response is
    /// not a session payload.
    pub fn start_session(&self, project: &ProjectHandle) -> Result<SessionInfo, reqwest::Error> {
        let url =
            self.endpoint(&format!("/kata/projects/{}/{}/session", project.id, project.lang));
        self.post_with_csrf(&url)
            .header(AUTHORIZATION, &project.jwt)
            .send()?
            .error_for_status()?
            .json()
    }
}

/// Validates a configured URL against transport policy.
fn validate_url(which: &'static str, raw: &str, allow_http: bool) -> Result<Url, ClientError> {
    let url = Url::parse(raw).map_err(|source| ClientError::InvalidUrl {
        which,
        source,
    })?;
    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        _ => return Err(ClientError::CleartextNotAllowed(which)),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ClientError::CredentialsInUrl(which));
    }
    Ok(url)
}

// ============================================================================
// SECTION: Project and Session Payloads
// ============================================================================

/// Material extracted from a trainer page for one started project.
///
/// # Invariants
/// - `id` and `jwt` are the verbatim page-body values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectHandle {
    /// Project identifier extracted from the page body.
    pub id: String,
    /// Session JWT extracted from the page body.
    pub jwt: String,
    /// Language the project was started in.
    pub lang: KnownLang,
}

/// Available language version advertised by a session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LangVersion {
    /// Version identifier.
    pub id: String,
    /// Human-readable version label.
    pub label: String,
    /// Whether the version is currently supported.
    pub supported: bool,
}

/// Session payload returned when a project session opens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// Setup code shown to the user.
    pub setup: String,
    /// Example test fixture shown to the user.
    pub example_fixture: String,
    /// Hidden submission fixture.
    pub fixture: String,
    /// Language name used in runner payloads.
    pub language_name: String,
    /// Language versions available for this session.
    pub language_versions: Vec<LangVersion>,
    /// Active language version identifier.
    pub active_version: String,
    /// Solution identifier for notify and finalize calls.
    pub solution_id: String,
    /// Package payload forwarded to the runner as setup.
    pub package: String,
    /// Test framework identifier.
    pub test_framework: String,
}
