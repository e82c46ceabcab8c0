//! Backend client: generation and feedback endpoints.
//!
//! DESIGN
//! ======
//! [`AudienceApi`] is the seam the orchestrator and feedback submitter talk
//! through; tests substitute an in-memory implementation. [`HttpBackend`]
//! is the `reqwest` implementation.
//!
//! ERROR HANDLING
//! ==============
//! The backend reports declared failures as a JSON body on a 4xx/5xx
//! status, so bodies are decoded regardless of status. Only a body that is
//! not the expected JSON becomes an error: `ApiResponse` when the status was
//! also non-success, `Parse` otherwise.

use std::time::Duration;

use reqwest::header::SET_COOKIE;
use serde::de::DeserializeOwned;

use crate::config::ConsoleConfig;
use crate::csrf::{CSRF_COOKIE_NAME, CSRF_HEADER, set_cookie_value};
use crate::error::ConsoleError;
use crate::types::{FeedbackEvent, FeedbackReceipt, GenerationRequest, GenerationResult};

pub const GENERATE_PATH: &str = "/submit_question/";
pub const FEEDBACK_PATH: &str = "/submit_feedback/";
pub const INDEX_PATH: &str = "/";

/// Request/response surface of the audience backend.
#[async_trait::async_trait]
pub trait AudienceApi: Send + Sync {
    /// Issue one generation request.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] on transport failure or an undecodable body.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ConsoleError>;

    /// Submit one feedback event, with the CSRF token when one is known.
    ///
    /// # Errors
    ///
    /// Returns a [`ConsoleError`] on transport failure or an undecodable body.
    async fn submit_feedback(
        &self,
        event: &FeedbackEvent,
        csrf_token: Option<&str>,
    ) -> Result<FeedbackReceipt, ConsoleError>;
}

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// # Errors
    ///
    /// Returns [`ConsoleError::HttpClientBuild`] if the HTTP client cannot be
    /// constructed.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ConsoleError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.trim_end_matches('/').to_string() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Load the index page and return the `csrftoken` cookie it sets, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Request`] if the page cannot be fetched.
    pub async fn fetch_csrf_cookie(&self) -> Result<Option<String>, ConsoleError> {
        let response = self.http.get(self.url(INDEX_PATH)).send().await?;
        let token = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|value| set_cookie_value(value, CSRF_COOKIE_NAME));
        Ok(token)
    }
}

#[async_trait::async_trait]
impl AudienceApi for HttpBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, ConsoleError> {
        let response = self
            .http
            .post(self.url(GENERATE_PATH))
            .json(request)
            .send()
            .await?;
        decode_json(response).await
    }

    async fn submit_feedback(
        &self,
        event: &FeedbackEvent,
        csrf_token: Option<&str>,
    ) -> Result<FeedbackReceipt, ConsoleError> {
        let mut builder = self.http.post(self.url(FEEDBACK_PATH)).json(event);
        if let Some(token) = csrf_token {
            builder = builder.header(CSRF_HEADER, token);
        }
        let response = builder.send().await?;
        decode_json(response).await
    }
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ConsoleError> {
    let status = response.status();
    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(ConsoleError::ApiResponse { status: status.as_u16(), body: text }),
        Err(e) => Err(ConsoleError::Parse(e.to_string())),
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
