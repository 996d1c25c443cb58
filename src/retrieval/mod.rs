// src/retrieval/mod.rs
// Embedding-similarity lookup over the knowledge corpus.

use crate::config::CONFIG;
use crate::emotion::EmotionLabel;
use crate::knowledge::KnowledgeEntry;
use crate::llm::embeddings::{utils::cosine_similarity, EmbeddingClient};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

/// The knowledge corpus itself is empty
pub const EMPTY_CORPUS_TEXT: &str = "I'm here for you. Let's talk. 🌟";

/// Candidate set collapsed to nothing before ranking
pub const ZERO_CANDIDATES_TEXT: &str = "How does that make you feel? 💬";

/// Candidates existed but none met the score threshold
pub const BELOW_THRESHOLD_TEXT: &str = "Tell me more about that. 🫂";

/// Embedding or scoring failed
pub const RETRIEVAL_FAILURE_TEXT: &str =
    "I'm here to listen and help you with your concerns. 🌼";

/// Ranks knowledge entries against the user's message by embedding cosine
/// similarity. Entries matching the requested emotion are preferred; when
/// none carry that label the whole corpus is searched.
///
/// Full-corpus embeddings are computed once per process and cached;
/// per-emotion subsets vary by turn and are embedded fresh.
pub struct ContextRetriever {
    embedder: Arc<EmbeddingClient>,
    corpus_embeddings: OnceCell<Vec<Vec<f32>>>,
    /// Minimum cosine score (range [-1, 1]) for a snippet to qualify
    score_threshold: f32,
}

impl ContextRetriever {
    pub fn new(embedder: Arc<EmbeddingClient>) -> Self {
        Self {
            embedder,
            corpus_embeddings: OnceCell::new(),
            score_threshold: CONFIG.context_score_threshold,
        }
    }

    /// Retrieve up to `k` context snippets for `user_input`. Never fails and
    /// never returns an empty sequence.
    pub async fn retrieve(
        &self,
        user_input: &str,
        emotion: EmotionLabel,
        knowledge: &[KnowledgeEntry],
        k: usize,
    ) -> Vec<String> {
        match self.try_retrieve(user_input, emotion, knowledge, k).await {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!(error = %e, "Context retrieval failed");
                vec![RETRIEVAL_FAILURE_TEXT.to_string()]
            }
        }
    }

    async fn try_retrieve(
        &self,
        user_input: &str,
        emotion: EmotionLabel,
        knowledge: &[KnowledgeEntry],
        k: usize,
    ) -> Result<Vec<String>> {
        let emotion_texts: Vec<String> = knowledge
            .iter()
            .filter(|e| e.emotion == emotion)
            .map(|e| e.text.clone())
            .collect();

        let scoped = !emotion_texts.is_empty();
        let candidates: Vec<String> = if scoped {
            emotion_texts
        } else {
            knowledge.iter().map(|e| e.text.clone()).collect()
        };

        if candidates.is_empty() {
            return Ok(vec![EMPTY_CORPUS_TEXT.to_string()]);
        }

        let actual_k = k.min(candidates.len());
        if actual_k == 0 {
            return Ok(vec![ZERO_CANDIDATES_TEXT.to_string()]);
        }

        // Emotion-scoped subsets change every turn; only the full corpus is
        // worth caching.
        let candidate_embeddings: Vec<Vec<f32>> = if scoped {
            self.embedder.embed_batch(&candidates).await?
        } else {
            self.full_corpus_embeddings(&candidates).await?.clone()
        };

        let user_embedding = self.embedder.embed(user_input).await?;

        let mut ranked: Vec<(f32, &String)> = candidate_embeddings
            .iter()
            .zip(candidates.iter())
            .map(|(emb, text)| (cosine_similarity(&user_embedding, emb), text))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        let contexts: Vec<String> = ranked
            .into_iter()
            .take(actual_k)
            .filter(|(score, _)| *score >= self.score_threshold)
            .map(|(score, text)| {
                debug!(score, "Context snippet accepted");
                text.clone()
            })
            .collect();

        if contexts.is_empty() {
            return Ok(vec![BELOW_THRESHOLD_TEXT.to_string()]);
        }

        Ok(contexts)
    }

    async fn full_corpus_embeddings(&self, corpus: &[String]) -> Result<&Vec<Vec<f32>>> {
        self.corpus_embeddings
            .get_or_try_init(|| async {
                debug!(count = corpus.len(), "Embedding full knowledge corpus");
                self.embedder.embed_batch(corpus).await
            })
            .await
    }
}
