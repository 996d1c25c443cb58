// src/config/mod.rs
// All tunables load from the environment (.env supported), with defaults.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct TherabotConfig {
    // ── Gemini Configuration
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub embedding_model: String,

    // ── Sentiment Model Configuration
    pub sentiment_base_url: String,
    pub sentiment_model: String,
    pub sentiment_api_token: String,

    // ── Knowledge Base & Retrieval
    pub knowledge_base_path: String,
    pub context_top_k: usize,
    pub context_score_threshold: f32,

    // ── Database Configuration
    pub database_url: String,
    pub sqlite_max_connections: u32,

    // ── Chat History Defaults
    pub history_default_limit: usize,
    pub history_max_limit: usize,

    // ── Timeouts (in seconds)
    pub request_timeout: u64,
    pub connect_timeout: u64,
    pub sentiment_timeout: u64,

    // ── Server Configuration
    pub host: String,
    pub port: u16,
    pub cors_origin: String,

    // ── Logging Configuration
    pub log_level: String,
}

// Tolerant of values with trailing comments and whitespace.
fn env_var_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(val) => {
            let clean_val = val.split('#').next().unwrap_or("").trim();
            match clean_val.parse::<T>() {
                Ok(parsed) => parsed,
                Err(_) => {
                    eprintln!("Config: {} = '{}' (parse failed, using default)", key, val);
                    default
                }
            }
        }
        Err(_) => default,
    }
}

impl TherabotConfig {
    pub fn from_env() -> Self {
        // Load .env first if present; plain env vars still win.
        let _ = dotenvy::dotenv();

        Self {
            gemini_api_key: env_var_or("GEMINI_API_KEY", String::new()),
            gemini_base_url: env_var_or(
                "THERABOT_GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            ),
            gemini_model: env_var_or("THERABOT_GEMINI_MODEL", "gemini-1.5-flash-latest".to_string()),
            embedding_model: env_var_or("THERABOT_EMBEDDING_MODEL", "text-embedding-004".to_string()),
            sentiment_base_url: env_var_or(
                "THERABOT_SENTIMENT_BASE_URL",
                "https://api-inference.huggingface.co/models".to_string(),
            ),
            sentiment_model: env_var_or(
                "THERABOT_SENTIMENT_MODEL",
                "tabularisai/multilingual-sentiment-analysis".to_string(),
            ),
            sentiment_api_token: env_var_or("HF_API_TOKEN", String::new()),
            knowledge_base_path: env_var_or(
                "THERABOT_KNOWLEDGE_BASE",
                "knowledge_base.json".to_string(),
            ),
            context_top_k: env_var_or("THERABOT_CONTEXT_TOP_K", 1),
            context_score_threshold: env_var_or("THERABOT_CONTEXT_SCORE_THRESHOLD", 0.3),
            database_url: env_var_or("DATABASE_URL", "sqlite:./therabot.db?mode=rwc".to_string()),
            sqlite_max_connections: env_var_or("SQLITE_MAX_CONNECTIONS", 5),
            history_default_limit: env_var_or("THERABOT_HISTORY_DEFAULT_LIMIT", 50),
            history_max_limit: env_var_or("THERABOT_HISTORY_MAX_LIMIT", 200),
            request_timeout: env_var_or("THERABOT_REQUEST_TIMEOUT", 60),
            connect_timeout: env_var_or("THERABOT_CONNECT_TIMEOUT", 10),
            sentiment_timeout: env_var_or("THERABOT_SENTIMENT_TIMEOUT", 20),
            host: env_var_or("THERABOT_HOST", "0.0.0.0".to_string()),
            port: env_var_or("THERABOT_PORT", 3000),
            cors_origin: env_var_or("THERABOT_CORS_ORIGIN", "http://localhost:5173".to_string()),
            log_level: env_var_or("THERABOT_LOG_LEVEL", "info".to_string()),
        }
    }

    // --- Convenience Methods ---

    /// Server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL for the hosted sentiment model
    pub fn sentiment_url(&self) -> String {
        format!(
            "{}/{}",
            self.sentiment_base_url.trim_end_matches('/'),
            self.sentiment_model
        )
    }
}

// Global config instance - loaded once at startup
pub static CONFIG: Lazy<TherabotConfig> = Lazy::new(TherabotConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TherabotConfig::from_env();

        assert_eq!(config.context_top_k, 1);
        assert!((config.context_score_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.gemini_model, "gemini-1.5-flash-latest");
    }

    #[test]
    fn test_url_helpers() {
        let config = TherabotConfig::from_env();

        assert!(config.sentiment_url().contains("sentiment"));
        assert!(config.bind_address().ends_with(&config.port.to_string()));
    }

    #[test]
    fn test_env_var_or_strips_comments() {
        unsafe { std::env::set_var("THERABOT_TEST_COMMENTED", "7 # lucky") };
        let parsed: usize = env_var_or("THERABOT_TEST_COMMENTED", 0);
        assert_eq!(parsed, 7);
        unsafe { std::env::remove_var("THERABOT_TEST_COMMENTED") };
    }
}
