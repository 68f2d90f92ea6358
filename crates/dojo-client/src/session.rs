// crates/dojo-client/src/session.rs
// ============================================================================
// Module: Training Session
// Description: Session lifecycle against trainer and runner services.
// Purpose: Authorize the runner, run tests, notify, finalize, and skip.
// Dependencies: reqwest, serde, thiserror
// ============================================================================

//! ## Overview
//! A session binds a client, a started project, and the session payload the
//! trainer returned. `test` runs the user's own fixture, `attempt` runs the
//! hidden submission fixture with ciphered sections, and both notify the
//! trainer with the runner's relay token before returning. `submit`
//! finalizes an attempted solution and `skip` abandons the project.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::Client;
use crate::ProjectHandle;
use crate::SessionInfo;
use crate::result::TestResult;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Session run errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling and name the failed step.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The runner authorization call failed.
    #[error("failed to authorize runner")]
    AuthorizeRunner(#[source] reqwest::Error),
    /// The runner test call failed.
    #[error("failed to run tests")]
    RunTests(#[source] reqwest::Error),
    /// The trainer notify call failed.
    #[error("failed to notify solution")]
    Notify(#[source] reqwest::Error),
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// One training session for a started project.
pub struct Session<'c, 'p, 'i> {
    /// Client used for trainer and runner requests.
    client: &'c Client,
    /// Started project the session belongs to.
    project: &'p ProjectHandle,
    /// Session payload returned by the trainer.
    pub info: &'i SessionInfo,
}

impl<'c, 'p, 'i> Session<'c, 'p, 'i> {
    /// Binds a session from its parts.
    #[must_use]
    pub const fn from_project(
        client: &'c Client,
        project: &'p ProjectHandle,
        info: &'i SessionInfo,
    ) -> Self {
        Self {
            client,
            project,
            info,
        }
    }

    /// Authorizes the runner and returns its bearer token.
    fn authorize_runner(&self) -> Result<String, reqwest::Error> {
        /// Runner authorization payload.
        #[derive(Deserialize)]
        struct Auth {
            /// Bearer token for runner requests.
            token: String,
        }
        let url = self.client.endpoint("/api/v1/runner/authorize");
        let auth: Auth = self
            .client
            .post_with_csrf(&url)
            .header(AUTHORIZATION, &self.project.jwt)
            .send()?
            .error_for_status()?
            .json()?;
        log::debug!("authorized runner");
        Ok(auth.token)
    }

    /// Runs code against the runner service.
    fn run_tests(
        &self,
        token: &str,
        code: &str,
        fixture_ciphered: bool,
        fixture: &str,
    ) -> Result<TestResult, reqwest::Error> {
        /// Runner run-request payload.
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct RunPayload<'a> {
            /// Sections the runner must decipher.
            ciphered: &'a [&'a str],
            /// User solution code.
            code: &'a str,
            /// Test fixture to run.
            fixture: &'a str,
            /// Setup package.
            setup: &'a str,
            /// Language name.
            language: &'a str,
            /// Language version identifier.
            language_version: &'a str,
            /// Relay identifier tying the run to the solution.
            relay_id: &'a str,
            /// Success mode marker (always absent).
            success_mode: Option<()>,
            /// Test framework identifier.
            test_framework: &'a str,
        }
        let url = self.client.runner_endpoint("/run");
        self.client
            .post_runner(&url)
            .bearer_auth(token)
            .json(&RunPayload {
                ciphered: if fixture_ciphered {
                    &["fixture", "setup"]
                } else {
                    &["setup"]
                },
                code,
                fixture,
                setup: &self.info.package,
                language: &self.info.language_name,
                language_version: &self.info.active_version,
                relay_id: &self.info.solution_id,
                success_mode: None,
                test_framework: &self.info.test_framework,
            })
            .send()?
            .error_for_status()?
            .json()
    }

    /// Notifies the trainer of a completed run.
    fn notify(&self, token: &str, code: &str, fixture: &str) -> Result<(), reqwest::Error> {
        /// Trainer notify payload.
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Payload<'a> {
            /// User solution code.
            code: &'a str,
            /// Fixture the trainer records.
            fixture: &'a str,
            /// Language version identifier.
            language_version: &'a str,
            /// Test framework identifier.
            test_framework: &'a str,
            /// Relay token returned by the runner.
            token: &'a str,
        }
        let url = self.client.endpoint(&format!(
            "/api/v1/code-challenges/projects/{}/solutions/{}/notify",
            self.project.id, self.info.solution_id
        ));
        self.client
            .post_with_csrf(&url)
            .header(AUTHORIZATION, &self.project.jwt)
            .json(&Payload {
                code,
                fixture,
                language_version: &self.info.active_version,
                test_framework: &self.info.test_framework,
                token,
            })
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Authorizes, runs, and notifies in order.
    fn run(
        &self,
        code: &str,
        fixture_ciphered: bool,
        fixture: &str,
        notify_fixture: &str,
    ) -> Result<TestResult, SessionError> {
        let token = self.authorize_runner().map_err(SessionError::AuthorizeRunner)?;
        let result = self
            .run_tests(&token, code, fixture_ciphered, fixture)
            .map_err(SessionError::RunTests)?;
        self.notify(&result.token, code, notify_fixture).map_err(SessionError::Notify)?;
        Ok(result)
    }

    /// Runs the user's code against their own fixture.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] naming the failed step.
    pub fn test(&self, code: &str, fixture: &str) -> Result<TestResult, SessionError> {
        self.run(code, false, fixture, fixture)
    }

    /// Runs the user's code against the hidden submission fixture.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] naming the failed step.
    pub fn attempt(&self, code: &str, fixture: &str) -> Result<TestResult, SessionError> {
        self.run(code, true, &self.info.fixture, fixture)
    }

    /// Finalizes an attempted solution.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the finalize call fails.
    pub fn submit(&self) -> Result<(), reqwest::Error> {
        let url = self.client.endpoint(&format!(
            "/api/v1/code-challenges/projects/{}/solutions/{}/finalize",
            self.project.id, self.info.solution_id
        ));
        self.client
            .post_with_csrf(&url)
            .header(AUTHORIZATION, &self.project.jwt)
            .send()?
            .error_for_status()?;
        Ok(())
    }

    /// Abandons the project.
    ///
    /// # Errors
    ///
    /// Returns the transport error when the skip call fails.
    pub fn skip(&self) -> Result<(), reqwest::Error> {
        let url = self.client.endpoint(&format!("/kata/projects/{}/skip", self.project.id));
        self.client
            .post_with_csrf(&url)
            .header(AUTHORIZATION, &self.project.jwt)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
