// src/state.rs
// Process-wide service handles, constructed once and shared via Arc.

use crate::chat::ChatService;
use crate::config::CONFIG;
use crate::db::ChatStore;
use crate::emotion::EmotionClassifier;
use crate::knowledge;
use crate::llm::{EmbeddingClient, GeminiClient, ResponseGenerator};
use crate::retrieval::ContextRetriever;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ChatService>,
    pub store: ChatStore,
}

/// Wire the pipeline components together from CONFIG. The external-service
/// clients are immutable after construction; all handlers share them.
pub fn create_app_state(pool: SqlitePool) -> AppState {
    let knowledge = Arc::new(knowledge::load_or_create(Path::new(
        &CONFIG.knowledge_base_path,
    )));

    let classifier = Arc::new(EmotionClassifier::from_config());
    let embedder = Arc::new(EmbeddingClient::from_config());
    let retriever = Arc::new(ContextRetriever::new(embedder));
    let generator = Arc::new(ResponseGenerator::new(GeminiClient::from_config()));

    let chat_service = Arc::new(ChatService::new(classifier, retriever, generator, knowledge));

    AppState {
        chat_service,
        store: ChatStore::new(pool),
    }
}
