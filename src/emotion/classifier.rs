// src/emotion/classifier.rs
// Hosted sentiment model with a keyword fallback.

use crate::config::CONFIG;
use crate::emotion::{fallback_emotion, EmotionLabel};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Class index → emotion label mapping for the pretrained sentiment model.
const CLASS_EMOTIONS: [EmotionLabel; 5] = [
    EmotionLabel::Sad,
    EmotionLabel::Neutral,
    EmotionLabel::Happy,
    EmotionLabel::Angry,
    EmotionLabel::Worried,
];

#[derive(Serialize)]
struct SentimentRequest<'a> {
    inputs: &'a str,
    parameters: SentimentParameters,
}

#[derive(Serialize)]
struct SentimentParameters {
    truncation: bool,
}

#[derive(Debug, Deserialize)]
struct SentimentScore {
    label: String,
    score: f32,
}

/// Client for the hosted multiclass sentiment model.
///
/// `classify` cannot fail: any error on the model path (unreachable service,
/// bad status, unparseable class label) drops to the keyword fallback, which
/// is pure string matching.
pub struct EmotionClassifier {
    client: Client,
    url: String,
    api_token: String,
}

impl EmotionClassifier {
    pub fn new(url: String, api_token: String, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            url,
            api_token,
        }
    }

    pub fn from_config() -> Self {
        Self::new(
            CONFIG.sentiment_url(),
            CONFIG.sentiment_api_token.clone(),
            Duration::from_secs(CONFIG.sentiment_timeout),
        )
    }

    /// Detect the emotion of `text`. Always returns a valid label.
    pub async fn classify(&self, text: &str) -> EmotionLabel {
        match self.classify_remote(text).await {
            Ok(label) => {
                info!(emotion = %label, "Detected emotion");
                label
            }
            Err(e) => {
                warn!(error = %e, "Sentiment model unavailable, using keyword fallback");
                let label = fallback_emotion(text);
                info!(emotion = %label, "Detected emotion (fallback)");
                label
            }
        }
    }

    async fn classify_remote(&self, text: &str) -> Result<EmotionLabel> {
        let request = SentimentRequest {
            inputs: text,
            parameters: SentimentParameters { truncation: true },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if !self.api_token.is_empty() {
            builder = builder.header("Authorization", format!("Bearer {}", self.api_token));
        }

        let response = builder
            .send()
            .await
            .context("Failed to reach sentiment model")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Sentiment API error {}: {}", status, body);
        }

        // The inference API wraps scores in an extra list for single inputs.
        let scores: Vec<Vec<SentimentScore>> = response
            .json()
            .await
            .context("Failed to parse sentiment response")?;

        let best = scores
            .into_iter()
            .flatten()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .context("Sentiment response contained no scores")?;

        class_emotion(&best.label)
    }
}

/// Map a reported class label (`LABEL_<index>`) through the fixed table.
fn class_emotion(label: &str) -> Result<EmotionLabel> {
    let idx: usize = label
        .strip_prefix("LABEL_")
        .with_context(|| format!("Unexpected class label: {}", label))?
        .parse()
        .with_context(|| format!("Unexpected class label: {}", label))?;

    CLASS_EMOTIONS
        .get(idx)
        .copied()
        .with_context(|| format!("Class index out of range: {}", idx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_emotion_table() {
        assert_eq!(class_emotion("LABEL_0").unwrap(), EmotionLabel::Sad);
        assert_eq!(class_emotion("LABEL_1").unwrap(), EmotionLabel::Neutral);
        assert_eq!(class_emotion("LABEL_2").unwrap(), EmotionLabel::Happy);
        assert_eq!(class_emotion("LABEL_3").unwrap(), EmotionLabel::Angry);
        assert_eq!(class_emotion("LABEL_4").unwrap(), EmotionLabel::Worried);
    }

    #[test]
    fn test_class_emotion_rejects_unknown() {
        assert!(class_emotion("LABEL_5").is_err());
        assert!(class_emotion("Very Positive").is_err());
    }

    #[tokio::test]
    async fn test_classify_falls_back_when_unreachable() {
        let classifier = EmotionClassifier::new(
            "http://127.0.0.1:1/model".to_string(),
            String::new(),
            Duration::from_millis(300),
        );

        // Unreachable model: keyword fallback decides.
        let label = classifier.classify("I'm so anxious about everything").await;
        assert_eq!(label, EmotionLabel::Worried);

        // And the fallback itself defaults to neutral.
        let label = classifier.classify("qwerty").await;
        assert_eq!(label, EmotionLabel::Neutral);
    }
}
