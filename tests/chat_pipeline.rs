// tests/chat_pipeline.rs
// End-to-end pipeline behavior with every external service unreachable.
// The orchestrator must still hand back a usable reply triple.

use std::sync::Arc;
use std::time::Duration;

use therabot::chat::{BotReply, ChatService, ChatTurn, AUDIO_ACKNOWLEDGMENT};
use therabot::emotion::{EmotionClassifier, EmotionLabel};
use therabot::knowledge;
use therabot::llm::{EmbeddingClient, GeminiClient, LlmHttpClient, ResponseGenerator};
use therabot::retrieval::ContextRetriever;

/// Build the whole pipeline against endpoints nothing is listening on.
fn offline_service() -> ChatService {
    let classifier = Arc::new(EmotionClassifier::new(
        "http://127.0.0.1:1/model".to_string(),
        String::new(),
        Duration::from_millis(300),
    ));

    let embedder = Arc::new(EmbeddingClient::new(
        "test-key".to_string(),
        "embed-model".to_string(),
        "http://127.0.0.1:1".to_string(),
        Duration::from_millis(300),
    ));

    let http = LlmHttpClient::new(Duration::from_millis(300), Duration::from_millis(200))
        .with_limits(2, Duration::from_millis(10));
    let gemini = GeminiClient::new(
        "test-key".to_string(),
        "gemini-test".to_string(),
        "http://127.0.0.1:1".to_string(),
        http,
    );

    ChatService::new(
        classifier,
        Arc::new(ContextRetriever::new(embedder)),
        Arc::new(ResponseGenerator::new(gemini)),
        Arc::new(knowledge::default_entries()),
    )
}

fn assert_usable(reply: &BotReply) {
    assert!(!reply.text.is_empty(), "reply text must never be empty");
    assert!(
        EmotionLabel::all().contains(&reply.emotion),
        "emotion must be one of the five labels"
    );
}

#[tokio::test]
async fn respond_survives_total_service_outage() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "hello there",
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
}

#[tokio::test]
async fn anxious_message_sets_audio_flag_and_worried_emotion() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "I feel so anxious about work",
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
    // Classifier is down, so the keyword fallback decides: "anxious" → worried.
    assert_eq!(reply.emotion, EmotionLabel::Worried);
    assert!(reply.play_ambient_audio);
}

#[tokio::test]
async fn explicit_music_request_appends_acknowledgment() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "play some peaceful music please",
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
    assert!(reply.play_ambient_audio);
    assert!(
        reply.text.ends_with(AUDIO_ACKNOWLEDGMENT),
        "acknowledgment must be appended verbatim, got: {}",
        reply.text
    );
}

#[tokio::test]
async fn declared_mood_overrides_detection() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "I am furious about everything",
            user_mood: Some("happy"),
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
    assert_eq!(reply.emotion, EmotionLabel::Happy);
}

#[tokio::test]
async fn unparseable_mood_falls_back_to_detection() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "I'm so frustrated today",
            user_mood: Some("grumpy-ish"),
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
    assert_eq!(reply.emotion, EmotionLabel::Angry);
}

#[tokio::test]
async fn stressed_keyword_sets_audio_flag_without_request() {
    let service = offline_service();

    let reply = service
        .respond(ChatTurn {
            message: "work has me stressed beyond belief",
            ..Default::default()
        })
        .await;

    assert_usable(&reply);
    assert!(reply.play_ambient_audio);
    assert!(
        !reply.text.ends_with(AUDIO_ACKNOWLEDGMENT),
        "no explicit request, so no acknowledgment"
    );
}
