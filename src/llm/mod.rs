// src/llm/mod.rs
// Clients for the external model services and the response generator.

pub mod embeddings;
pub mod generate;
pub mod gemini;
pub mod http_client;

pub use embeddings::EmbeddingClient;
pub use generate::ResponseGenerator;
pub use gemini::{GeminiClient, GenerateOutcome};
pub use http_client::LlmHttpClient;
