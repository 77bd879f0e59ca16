//! REST client for the public character API.
//!
//! Wraps the two endpoints the site consumes (`GET /characters`,
//! `GET /questions`) plus plain document fetches for the static source,
//! using [`reqwest`].

use std::time::Duration;

use grimoire_core::quiz::QuestionRecord;
use grimoire_core::CoreError;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// Errors from the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape we expected.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Decode(e) => CoreError::Parse(e.to_string()),
            other => CoreError::Transport(other.to_string()),
        }
    }
}

/// HTTP client for one API base URL.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    api_url: String,
}

impl ApiClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// * `api_url` - Base URL, e.g. `https://hp-api.onrender.com/api`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self { client, api_url }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// `GET {base}/characters`, returned as raw JSON so the caller can
    /// tell a missing collection apart from a malformed body.
    pub async fn get_characters(&self) -> Result<serde_json::Value, ApiError> {
        self.get_json(&format!("{}/characters", self.api_url)).await
    }

    /// `GET {base}/questions`.
    pub async fn get_questions(&self) -> Result<Vec<QuestionRecord>, ApiError> {
        self.get_json(&format!("{}/questions", self.api_url)).await
    }

    /// Fetch an arbitrary document body as text.
    pub async fn get_text(&self, url: &Url) -> Result<String, ApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.text().await?)
    }

    // ---- private helpers ----

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Pass 2xx responses through; turn anything else into
    /// [`ApiError::Status`] carrying the body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = ApiClient::with_client(reqwest::Client::new(), "https://hp-api.onrender.com/api/");
        assert_eq!(api.api_url(), "https://hp-api.onrender.com/api");
    }

    #[test]
    fn status_errors_map_to_transport() {
        let err: CoreError = ApiError::Status {
            status: 503,
            body: "down".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Transport(msg) if msg.contains("503")));
    }

    #[test]
    fn decode_errors_map_to_parse() {
        let decode = serde_json::from_str::<Vec<QuestionRecord>>("{").unwrap_err();
        let err: CoreError = ApiError::Decode(decode).into();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = api.get_characters().await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
