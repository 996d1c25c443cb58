// src/api/http/journal.rs

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult, IntoApiError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JournalQuery {
    pub user_id: i64,
}

#[derive(Serialize)]
pub struct JournalSummary {
    pub id: i64,
    pub date: String,
    pub mood: Option<String>,
    pub preview: String,
}

#[derive(Serialize)]
pub struct JournalEntryResponse {
    pub id: Option<i64>,
    pub date: String,
    pub mood: Option<String>,
    pub content: String,
    pub is_new: bool,
}

#[derive(Deserialize)]
pub struct SaveJournalRequest {
    pub user_id: i64,
    pub content: String,
    pub mood: Option<String>,
}

#[derive(Serialize)]
pub struct JournalSaveResponse {
    pub message: String,
    pub success: bool,
}

fn validate_date(date: &str) -> ApiResult<()> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| ApiError::bad_request("Invalid date format. Use YYYY-MM-DD"))
}

pub async fn list_journal_entries(
    State(app_state): State<AppState>,
    Query(params): Query<JournalQuery>,
) -> ApiResult<Json<Vec<JournalSummary>>> {
    let entries = app_state
        .store
        .journal_entries(params.user_id)
        .await
        .into_api_error("Failed to list journal entries")?
        .into_iter()
        .map(|row| JournalSummary {
            id: row.id,
            date: row.entry_date,
            mood: row.mood,
            preview: row.preview,
        })
        .collect();

    Ok(Json(entries))
}

pub async fn get_journal_entry(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
    Query(params): Query<JournalQuery>,
) -> ApiResult<Json<JournalEntryResponse>> {
    validate_date(&date)?;

    let entry = app_state
        .store
        .journal_entry(params.user_id, &date)
        .await
        .into_api_error("Failed to read journal entry")?;

    let response = match entry {
        Some(row) => JournalEntryResponse {
            id: Some(row.id),
            date: row.entry_date,
            mood: row.mood,
            content: row.content,
            is_new: false,
        },
        // No entry yet: hand back an empty template for this date.
        None => JournalEntryResponse {
            id: None,
            date,
            mood: None,
            content: String::new(),
            is_new: true,
        },
    };

    Ok(Json(response))
}

pub async fn save_journal_entry(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
    Json(request): Json<SaveJournalRequest>,
) -> ApiResult<Json<JournalSaveResponse>> {
    validate_date(&date)?;

    let content = request.content.trim();
    if content.is_empty() {
        return Err(ApiError::bad_request("Content is required"));
    }

    let created = app_state
        .store
        .upsert_journal_entry(request.user_id, &date, request.mood.as_deref(), content)
        .await
        .into_api_error("Failed to save journal entry")?;

    let message = if created {
        "Journal entry created successfully"
    } else {
        "Journal entry updated successfully"
    };

    Ok(Json(JournalSaveResponse {
        message: message.to_string(),
        success: true,
    }))
}

pub async fn delete_journal_entry(
    State(app_state): State<AppState>,
    Path(date): Path<String>,
    Query(params): Query<JournalQuery>,
) -> ApiResult<Json<JournalSaveResponse>> {
    validate_date(&date)?;

    let deleted = app_state
        .store
        .delete_journal_entry(params.user_id, &date)
        .await
        .into_api_error("Failed to delete journal entry")?;

    if !deleted {
        return Err(ApiError::not_found("No journal entry for that date"));
    }

    Ok(Json(JournalSaveResponse {
        message: "Journal entry deleted successfully".to_string(),
        success: true,
    }))
}
