// src/llm/http_client.rs
// Shared HTTP client for the hosted model services.

use anyhow::{anyhow, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

/// Total attempts for transient failures
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Fixed delay between attempts
const DEFAULT_RETRY_DELAY_MS: u64 = 1500;
/// Default request timeout
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
/// Default connect timeout
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// HTTP client with a bounded retry loop for the model APIs.
///
/// Retries are limited to transport-shaped failures: connect/timeout errors
/// and 429/5xx statuses. Anything else is final on the first attempt. After
/// the last attempt the underlying `reqwest::Error` is preserved in the
/// error chain so callers can still classify it by shape.
pub struct LlmHttpClient {
    client: Client,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl LlmHttpClient {
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }

    pub fn from_config(request_timeout_secs: u64, connect_timeout_secs: u64) -> Self {
        Self::new(
            Duration::from_secs(request_timeout_secs),
            Duration::from_secs(connect_timeout_secs),
        )
    }

    /// Override the retry bounds (tests use tight values)
    pub fn with_limits(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// POST `body` with the builder returned by `build_request`, retrying
    /// transient failures. Returns the response body text on success.
    pub async fn execute_request_with_retry<F>(
        &self,
        request_id: &str,
        body: String,
        build_request: F,
    ) -> Result<String>
    where
        F: Fn(&Client, String) -> reqwest::RequestBuilder,
    {
        let mut attempt = 1;

        loop {
            let response_result = build_request(&self.client, body.clone()).send().await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if !status.is_success() {
                        let error_body = response.text().await.unwrap_or_default();

                        if attempt < self.max_attempts
                            && (status.as_u16() == 429 || status.is_server_error())
                        {
                            warn!(
                                request_id = %request_id,
                                status = %status,
                                attempt,
                                "Transient API error, retrying in {:?}",
                                self.retry_delay
                            );
                            tokio::time::sleep(self.retry_delay).await;
                            attempt += 1;
                            continue;
                        }

                        return Err(anyhow!("API error {}: {}", status, error_body));
                    }

                    return Ok(response.text().await?);
                }
                Err(e) => {
                    if attempt < self.max_attempts && (e.is_connect() || e.is_timeout()) {
                        warn!(
                            request_id = %request_id,
                            error = %e,
                            attempt,
                            "Request failed (connect/timeout), retrying in {:?}",
                            self.retry_delay
                        );
                        tokio::time::sleep(self.retry_delay).await;
                        attempt += 1;
                        continue;
                    }
                    // Keep the typed error so callers can inspect its shape.
                    return Err(
                        anyhow::Error::new(e).context(format!("Request failed after {} attempts", attempt))
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = LlmHttpClient::new(Duration::from_secs(10), Duration::from_secs(5));
        assert_eq!(client.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(client.retry_delay, Duration::from_millis(DEFAULT_RETRY_DELAY_MS));
    }

    #[test]
    fn test_with_limits_floors_attempts_at_one() {
        let client = LlmHttpClient::new(Duration::from_secs(10), Duration::from_secs(5))
            .with_limits(0, Duration::from_millis(1));
        assert_eq!(client.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_connection_refused_preserves_error_shape() {
        let client = LlmHttpClient::new(Duration::from_millis(500), Duration::from_millis(200))
            .with_limits(2, Duration::from_millis(10));

        let result = client
            .execute_request_with_retry("test", "{}".into(), |c, body| {
                c.post("http://127.0.0.1:1/v1")
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await;

        let err = result.unwrap_err();
        let req_err = err
            .downcast_ref::<reqwest::Error>()
            .expect("reqwest error should survive the retry wrapper");
        assert!(req_err.is_connect() || req_err.is_timeout());
    }
}
