// src/llm/generate.rs
// Turns a prompt block into user-facing reply text. Never returns an error:
// every failure mode maps to a fixed supportive message.

use crate::llm::gemini::{GeminiClient, GenerateOutcome};
use crate::persona;
use crate::prompt::ANSWER_SENTINEL;
use tracing::{error, info, warn};

/// The prompt was refused for safety reasons
pub const BLOCKED_MESSAGE: &str =
    "I cannot respond to that request as it may violate safety guidelines. 🚫";

/// The service answered with no content parts
pub const EMPTY_RESPONSE_MESSAGE: &str =
    "I'm having trouble formulating a response right now. Could you try rephrasing? 🌀";

/// Nothing left once the echoed prompt was trimmed away
pub const EMPTY_AFTER_TRIM_MESSAGE: &str = "I'm listening. Could you elaborate a bit? 👂";

/// Transport failed with a connection-shaped error after retries
pub const CONNECTION_APOLOGY: &str =
    "I'm having trouble reaching my support systems right now. Please check your connection and try again. 📡";

/// Transport failed with a timeout-shaped error after retries
pub const TIMEOUT_APOLOGY: &str =
    "That took longer than it should have and I lost the thread. Could you send that again? ⏳";

/// Any other failure
pub const GENERIC_APOLOGY: &str = "I'm here for you, even if I'm having technical issues. 🛠️💙";

/// Wraps the Gemini client with persona prefixing and output cleanup.
pub struct ResponseGenerator {
    client: GeminiClient,
}

impl ResponseGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// Generate a reply for the given per-turn prompt block. The returned
    /// string is always non-empty and safe to show the user.
    pub async fn generate(&self, user_block: &str, username: &str) -> String {
        let system_prompt = persona::system_prompt(username);
        let full_prompt = format!("{}\n\n{}", system_prompt, user_block);

        match self.client.generate(&full_prompt).await {
            Ok(GenerateOutcome::Text(raw)) => {
                let cleaned = trim_model_output(&raw, &system_prompt);
                if cleaned.is_empty() {
                    info!("Model output empty after trimming");
                    EMPTY_AFTER_TRIM_MESSAGE.to_string()
                } else {
                    cleaned
                }
            }
            Ok(GenerateOutcome::Blocked(reason)) => {
                warn!(reason = %reason, "Generation blocked by content policy");
                BLOCKED_MESSAGE.to_string()
            }
            Ok(GenerateOutcome::Empty) => EMPTY_RESPONSE_MESSAGE.to_string(),
            Err(e) => {
                error!(error = %e, "Generation failed after retries");
                apology_for(&e).to_string()
            }
        }
    }
}

/// Strip a verbatim system-prompt echo and everything up to and including the
/// answer sentinel. A missing sentinel means "use the full output".
pub fn trim_model_output(raw: &str, system_prompt: &str) -> String {
    let mut cleaned = raw.trim().to_string();

    if cleaned.contains(system_prompt) {
        cleaned = cleaned.replace(system_prompt, "");
    }

    if let Some(idx) = cleaned.rfind(ANSWER_SENTINEL) {
        cleaned = cleaned[idx + ANSWER_SENTINEL.len()..].to_string();
    }

    cleaned.trim().to_string()
}

/// Classify a terminal transport failure into a user-facing apology.
pub fn apology_for(err: &anyhow::Error) -> &'static str {
    if let Some(req_err) = err.downcast_ref::<reqwest::Error>() {
        if req_err.is_timeout() {
            return TIMEOUT_APOLOGY;
        }
        if req_err.is_connect() {
            return CONNECTION_APOLOGY;
        }
    }

    // Shape unknown: fall back to keyword heuristics on the message chain.
    let msg = format!("{:#}", err).to_lowercase();
    if msg.contains("timed out") || msg.contains("timeout") {
        TIMEOUT_APOLOGY
    } else if msg.contains("connect") || msg.contains("connection") || msg.contains("dns") {
        CONNECTION_APOLOGY
    } else {
        GENERIC_APOLOGY
    }
}
