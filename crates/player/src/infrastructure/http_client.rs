//! HTTP client for the narration service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::config::{DEFAULT_NARRATOR_URL, DEFAULT_REQUEST_TIMEOUT_MS};
use crate::ports::outbound::{NarrationError, NarrationPort, NarrationRequest, NarrationResponse};

/// Client for the narration endpoint (JSON POST, one turn per request).
#[derive(Clone)]
pub struct HttpNarrationClient {
    client: Client,
    url: String,
}

impl HttpNarrationClient {
    pub fn new(url: &str, timeout_ms: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url: url.trim().to_string(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpNarrationClient {
    fn default() -> Self {
        Self::new(DEFAULT_NARRATOR_URL, DEFAULT_REQUEST_TIMEOUT_MS)
    }
}

#[async_trait]
impl NarrationPort for HttpNarrationClient {
    async fn narrate(
        &self,
        request: NarrationRequest,
    ) -> Result<NarrationResponse, NarrationError> {
        tracing::debug!(url = %self.url, is_start = request.is_start, "Sending narration request");

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| NarrationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| NarrationError::Network(e.to_string()))?;
            return Err(status_error(status, body));
        }

        response
            .json::<NarrationResponse>()
            .await
            .map_err(|e| NarrationError::InvalidResponse(e.to_string()))
    }
}

/// Map a non-success status to the port error. 404 means the service has
/// no session for this player.
fn status_error(status: StatusCode, body: String) -> NarrationError {
    if status == StatusCode::NOT_FOUND {
        NarrationError::NoSession
    } else {
        NarrationError::Service {
            status: status.as_u16(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_means_no_session() {
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, "missing".into()),
            NarrationError::NoSession
        );
    }

    #[test]
    fn other_failures_keep_status_and_body() {
        assert_eq!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".into()),
            NarrationError::Service {
                status: 500,
                body: "boom".into()
            }
        );
    }

    #[test]
    fn url_is_trimmed() {
        let client = HttpNarrationClient::new("  http://localhost:8888/narrate ", 1_000);
        assert_eq!(client.url(), "http://localhost:8888/narrate");
    }
}
