// src/chat/mod.rs
// The conversational pipeline: emotion detection, context retrieval, prompt
// assembly, generation, and the ambient-audio decision.

use crate::config::CONFIG;
use crate::emotion::{EmotionClassifier, EmotionLabel};
use crate::knowledge::KnowledgeEntry;
use crate::llm::ResponseGenerator;
use crate::prompt::build_user_prompt;
use crate::retrieval::ContextRetriever;
use std::sync::Arc;
use tracing::{info, instrument};

/// Fixed phrases that count as an explicit request for ambient audio.
const AMBIENT_AUDIO_TRIGGERS: &[&str] = &[
    "play rain",
    "rain sounds",
    "rain sound",
    "play music",
    "play some music",
    "peaceful music",
    "relaxing music",
    "calming music",
    "calming sounds",
    "soothing sounds",
];

/// Keywords that switch the audio flag on even without an explicit request.
const ANXIETY_KEYWORDS: &[&str] = &["anxious", "stressed"];

/// Appended to the reply when the user explicitly asked for ambient audio.
pub const AUDIO_ACKNOWLEDGMENT: &str =
    " I've started some gentle rain sounds for you. Let them play in the background while we talk. 🌧️";

/// Fallback username when neither a name nor a user id is available.
const DEFAULT_USERNAME: &str = "friend";

/// What a chat turn produces. The caller owns persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct BotReply {
    pub text: String,
    pub emotion: EmotionLabel,
    pub play_ambient_audio: bool,
}

/// One inbound chat turn.
#[derive(Debug, Default)]
pub struct ChatTurn<'a> {
    pub message: &'a str,
    pub user_id: Option<i64>,
    pub user_mood: Option<&'a str>,
    pub username: Option<&'a str>,
}

/// Composes the pipeline components into a single entry point. Every
/// component degrades internally, so `respond` always yields a usable reply
/// triple and never surfaces an error to the web layer.
pub struct ChatService {
    classifier: Arc<EmotionClassifier>,
    retriever: Arc<ContextRetriever>,
    generator: Arc<ResponseGenerator>,
    knowledge: Arc<Vec<KnowledgeEntry>>,
    top_k: usize,
}

impl ChatService {
    pub fn new(
        classifier: Arc<EmotionClassifier>,
        retriever: Arc<ContextRetriever>,
        generator: Arc<ResponseGenerator>,
        knowledge: Arc<Vec<KnowledgeEntry>>,
    ) -> Self {
        Self {
            classifier,
            retriever,
            generator,
            knowledge,
            top_k: CONFIG.context_top_k.max(1),
        }
    }

    #[instrument(skip(self, turn), fields(user_id = turn.user_id))]
    pub async fn respond(&self, turn: ChatTurn<'_>) -> BotReply {
        let message_lower = turn.message.to_lowercase();

        // An explicit, valid mood wins over detection.
        let emotion = match turn.user_mood.and_then(|m| m.parse::<EmotionLabel>().ok()) {
            Some(label) => {
                info!(emotion = %label, "Using caller-declared mood");
                label
            }
            None => self.classifier.classify(turn.message).await,
        };

        let username = resolve_username(turn.username, turn.user_id);
        let audio_requested = wants_ambient_audio(&message_lower);

        let contexts = self
            .retriever
            .retrieve(turn.message, emotion, &self.knowledge, self.top_k)
            .await;

        let user_block = build_user_prompt(turn.message, emotion, &contexts);
        let mut reply = self.generator.generate(&user_block, &username).await;

        let play_ambient_audio = audio_requested
            || emotion == EmotionLabel::Worried
            || ANXIETY_KEYWORDS.iter().any(|w| message_lower.contains(w));

        if audio_requested {
            reply.push_str(AUDIO_ACKNOWLEDGMENT);
        }

        info!(emotion = %emotion, play_ambient_audio, "Chat turn complete");

        BotReply {
            text: reply,
            emotion,
            play_ambient_audio,
        }
    }
}

/// Explicit ambient-audio request detection. Coarse by design.
fn wants_ambient_audio(message_lower: &str) -> bool {
    AMBIENT_AUDIO_TRIGGERS
        .iter()
        .any(|phrase| message_lower.contains(phrase))
}

fn resolve_username(username: Option<&str>, user_id: Option<i64>) -> String {
    match username {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => match user_id {
            Some(id) => format!("user_{}", id),
            None => DEFAULT_USERNAME.to_string(),
        },
    }
}
