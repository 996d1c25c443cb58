// src/api/http/router.rs
// HTTP router composition for the REST API

use axum::{
    routing::{get, post},
    Router,
};

use super::{
    chat::{chat_handler, get_chat_history},
    journal::{delete_journal_entry, get_journal_entry, list_journal_entries, save_journal_entry},
    users::register_user,
};
use crate::state::AppState;

async fn health_handler() -> &'static str {
    "ok"
}

/// Main HTTP router. Nested under /api in main.rs.
pub fn http_router(app_state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_handler))
        // Chat
        .route("/chat", post(chat_handler))
        .route("/chat/history", get(get_chat_history))
        // Users
        .route("/users", post(register_user))
        // Journal
        .route("/journal/entries", get(list_journal_entries))
        .route(
            "/journal/entry/{date}",
            get(get_journal_entry)
                .post(save_journal_entry)
                .delete(delete_journal_entry),
        )
        .with_state(app_state)
}
