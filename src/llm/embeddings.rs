// src/llm/embeddings.rs
// Gemini embedContent client plus similarity helpers.

use crate::config::CONFIG;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: EmbedContent,
}

#[derive(Serialize)]
struct EmbedContent {
    parts: Vec<EmbedTextPart>,
}

#[derive(Serialize)]
struct EmbedTextPart {
    text: String,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

/// Gemini embeddings client
pub struct EmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl EmbeddingClient {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            model,
            base_url,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            CONFIG.gemini_api_key.clone(),
            CONFIG.embedding_model.clone(),
            CONFIG.gemini_base_url.clone(),
            Duration::from_secs(CONFIG.request_timeout),
        )
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/{}:{}?key={}",
            self.base_url.trim_end_matches('/'),
            self.model,
            method,
            self.api_key
        )
    }

    fn embed_request(&self, text: &str) -> EmbedRequest {
        EmbedRequest {
            model: format!("models/{}", self.model),
            content: EmbedContent {
                parts: vec![EmbedTextPart {
                    text: text.to_string(),
                }],
            },
        }
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(self.method_url("embedContent"))
            .json(&self.embed_request(text))
            .send()
            .await
            .context("Failed to reach embedding service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API error {}: {}", status, body);
        }

        let data: EmbedResponse = response
            .json()
            .await
            .context("Failed to parse embedding response")?;

        Ok(data.embedding.values)
    }

    /// Embed multiple texts in one batch request
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = BatchEmbedRequest {
            requests: texts.iter().map(|t| self.embed_request(t)).collect(),
        };

        let response = self
            .client
            .post(self.method_url("batchEmbedContents"))
            .json(&request)
            .send()
            .await
            .context("Failed to reach embedding service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Embedding API error {}: {}", status, body);
        }

        let data: BatchEmbedResponse = response
            .json()
            .await
            .context("Failed to parse batch embedding response")?;

        Ok(data.embeddings.into_iter().map(|e| e.values).collect())
    }
}

/// Helper functions for working with embeddings
pub mod utils {
    /// Calculate cosine similarity between two embeddings
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }
}
