// src/api/http/chat.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::error::{ApiError, ApiResult, IntoApiError};
use crate::chat::ChatTurn;
use crate::config::CONFIG;
use crate::emotion::EmotionLabel;
use crate::state::AppState;

/// Greeting seeded into an empty history, personalized with the username.
const FIRST_CONTACT_GREETING: &str =
    "Hello {username}! 👋 I'm Therabot, your mental health assistant. How are you feeling today? 😊";

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub mood: Option<String>,
    /// Hidden turns (e.g. mood-update pings from the UI) skip persistence
    #[serde(default)]
    pub hidden: bool,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub bot_reply: String,
    pub emotion: EmotionLabel,
    pub play_rain: bool,
}

pub async fn chat_handler(
    State(app_state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(ApiError::bad_request("Message is required."));
    }

    // Resolve a display name for known users when the client sent none.
    let mut username = request.username.clone();
    if username.is_none() {
        if let Some(user_id) = request.user_id {
            username = app_state
                .store
                .username_for(user_id)
                .await
                .into_api_error("Failed to look up user")?;
        }
    }

    // Hidden turns (and anonymous ones) leave no trace in the history.
    let persist_for = request.user_id.filter(|_| !request.hidden);
    if let Some(user_id) = persist_for {
        app_state
            .store
            .insert_chat_message(user_id, "user", message, None)
            .await
            .into_api_error("Failed to store chat message")?;
    }

    let reply = app_state
        .chat_service
        .respond(ChatTurn {
            message,
            user_id: request.user_id,
            user_mood: request.mood.as_deref(),
            username: username.as_deref(),
        })
        .await;

    if let Some(user_id) = persist_for {
        app_state
            .store
            .insert_chat_message(user_id, "bot", &reply.text, Some(reply.emotion.as_str()))
            .await
            .into_api_error("Failed to store bot reply")?;
    }

    Ok(Json(ChatResponse {
        bot_reply: reply.text,
        emotion: reply.emotion,
        play_rain: reply.play_ambient_audio,
    }))
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub user_id: i64,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct ChatHistoryMessage {
    pub id: i64,
    pub sender: String,
    pub message: String,
    pub emotion: Option<String>,
    pub timestamp: String,
}

#[derive(Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatHistoryMessage>,
}

pub async fn get_chat_history(
    State(app_state): State<AppState>,
    Query(params): Query<HistoryQuery>,
) -> ApiResult<Json<ChatHistoryResponse>> {
    let limit = params
        .limit
        .unwrap_or(CONFIG.history_default_limit)
        .min(CONFIG.history_max_limit);

    let count = app_state
        .store
        .history_count(params.user_id)
        .await
        .into_api_error("Failed to read chat history")?;

    // First contact: seed a personalized greeting so the conversation never
    // opens on an empty screen.
    if count == 0 {
        let username = app_state
            .store
            .username_for(params.user_id)
            .await
            .into_api_error("Failed to look up user")?
            .unwrap_or_else(|| format!("user_{}", params.user_id));

        let greeting = FIRST_CONTACT_GREETING.replace("{username}", &username);
        app_state
            .store
            .insert_chat_message(params.user_id, "bot", &greeting, Some("neutral"))
            .await
            .into_api_error("Failed to store greeting")?;
        info!(user_id = params.user_id, "Seeded first-contact greeting");
    }

    let messages = app_state
        .store
        .recent_history(params.user_id, limit)
        .await
        .into_api_error("Failed to read chat history")?
        .into_iter()
        .map(|row| ChatHistoryMessage {
            id: row.id,
            sender: row.sender,
            message: row.message,
            emotion: row.emotion,
            timestamp: row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();

    Ok(Json(ChatHistoryResponse { messages }))
}
