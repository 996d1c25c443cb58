// src/llm/gemini.rs
// Google Gemini generateContent client (non-streaming).

use crate::config::CONFIG;
use crate::llm::http_client::LlmHttpClient;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

// ============================================================================
// API Types
// ============================================================================

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiTextPart>,
}

#[derive(Serialize)]
struct GeminiTextPart {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
    error: Option<GeminiError>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContentResponse>,
}

#[derive(Deserialize)]
struct GeminiContentResponse {
    parts: Option<Vec<GeminiPartResponse>>,
}

#[derive(Deserialize)]
struct GeminiPartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Client
// ============================================================================

/// What a successful round trip to the service produced.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateOutcome {
    /// Concatenated text of the first candidate's parts
    Text(String),
    /// The prompt was refused for the given safety reason
    Blocked(String),
    /// Structurally empty response (no candidates/parts)
    Empty,
}

/// Google Gemini API client
pub struct GeminiClient {
    api_key: String,
    model: String,
    base_url: String,
    http: LlmHttpClient,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String, base_url: String, http: LlmHttpClient) -> Self {
        Self {
            api_key,
            model,
            base_url,
            http,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            CONFIG.gemini_api_key.clone(),
            CONFIG.gemini_model.clone(),
            CONFIG.gemini_base_url.clone(),
            LlmHttpClient::from_config(CONFIG.request_timeout, CONFIG.connect_timeout),
        )
    }

    /// Send a single composed prompt and report what came back.
    ///
    /// A content-policy refusal is a successful HTTP exchange and is returned
    /// as `Blocked` without retrying; only transport-shaped failures go
    /// through the retry loop in [`LlmHttpClient`].
    pub async fn generate(&self, prompt: &str) -> Result<GenerateOutcome> {
        let request_id = Uuid::new_v4().to_string();

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiTextPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        // Gemini authenticates via query-string key, not Bearer header
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            self.api_key
        );

        let body = serde_json::to_string(&request)?;
        debug!(request_id = %request_id, model = %self.model, "Sending Gemini request");

        let response_body = self
            .http
            .execute_request_with_retry(&request_id, body, |client, body| {
                client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .body(body)
            })
            .await?;

        let data: GeminiResponse = serde_json::from_str(&response_body)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        if let Some(error) = data.error {
            return Err(anyhow!("Gemini error: {}", error.message));
        }

        if let Some(reason) = data
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .filter(|r| !r.is_empty())
        {
            info!(request_id = %request_id, reason = %reason, "Gemini blocked the prompt");
            return Ok(GenerateOutcome::Blocked(reason));
        }

        let text: String = data
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            info!(request_id = %request_id, "Gemini response had no content parts");
            return Ok(GenerateOutcome::Empty);
        }

        debug!(request_id = %request_id, chars = text.len(), "Gemini response received");
        Ok(GenerateOutcome::Text(text))
    }
}
