// src/db/mod.rs
// SQLite store for users, chat history, and journal entries.

use crate::error::Result;
use chrono::NaiveDateTime;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

const JOURNAL_PREVIEW_CHARS: i32 = 100;

/// Create the SQLite connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create tables if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS chat_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            sender TEXT NOT NULL,
            message TEXT NOT NULL,
            emotion TEXT,
            timestamp TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS journal_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            entry_date TEXT NOT NULL,
            mood TEXT,
            content TEXT NOT NULL,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(user_id, entry_date)
        )",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChatMessageRow {
    pub id: i64,
    pub sender: String,
    pub message: String,
    pub emotion: Option<String>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalSummaryRow {
    pub id: i64,
    pub entry_date: String,
    pub mood: Option<String>,
    pub preview: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalEntryRow {
    pub id: i64,
    pub entry_date: String,
    pub mood: Option<String>,
    pub content: String,
}

/// All persistence the web layer needs, over one shared pool.
#[derive(Clone)]
pub struct ChatStore {
    pool: SqlitePool,
}

impl ChatStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a user by name, creating the row if needed.
    pub async fn ensure_user(&self, username: &str) -> Result<i64> {
        if let Some((id,)) = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(id);
        }

        let result = sqlx::query("INSERT INTO users (username) VALUES (?)")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn user_exists(&self, user_id: i64) -> Result<bool> {
        let row = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    pub async fn username_for(&self, user_id: i64) -> Result<Option<String>> {
        let row = sqlx::query_as::<_, (String,)>("SELECT username FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(name,)| name))
    }

    // ------------------------------------------------------------------
    // Chat history
    // ------------------------------------------------------------------

    pub async fn insert_chat_message(
        &self,
        user_id: i64,
        sender: &str,
        message: &str,
        emotion: Option<&str>,
    ) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO chat_history (user_id, sender, message, emotion) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(sender)
        .bind(message)
        .bind(emotion)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Oldest-first slice of a user's most recent messages.
    pub async fn recent_history(&self, user_id: i64, limit: usize) -> Result<Vec<ChatMessageRow>> {
        let mut rows: Vec<ChatMessageRow> = sqlx::query_as(
            "SELECT id, sender, message, emotion, timestamp
             FROM chat_history WHERE user_id = ?
             ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(user_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.reverse();
        Ok(rows)
    }

    pub async fn history_count(&self, user_id: i64) -> Result<i64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM chat_history WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    // ------------------------------------------------------------------
    // Journal
    // ------------------------------------------------------------------

    /// Create or update the entry for a date. Returns true when a new row was
    /// created.
    pub async fn upsert_journal_entry(
        &self,
        user_id: i64,
        entry_date: &str,
        mood: Option<&str>,
        content: &str,
    ) -> Result<bool> {
        let existing = sqlx::query_as::<_, (i64,)>(
            "SELECT id FROM journal_entries WHERE user_id = ? AND entry_date = ?",
        )
        .bind(user_id)
        .bind(entry_date)
        .fetch_optional(&self.pool)
        .await?;

        match existing {
            Some((id,)) => {
                sqlx::query(
                    "UPDATE journal_entries
                     SET content = ?, mood = ?, updated_at = CURRENT_TIMESTAMP
                     WHERE id = ?",
                )
                .bind(content)
                .bind(mood)
                .bind(id)
                .execute(&self.pool)
                .await?;
                Ok(false)
            }
            None => {
                sqlx::query(
                    "INSERT INTO journal_entries (user_id, entry_date, mood, content)
                     VALUES (?, ?, ?, ?)",
                )
                .bind(user_id)
                .bind(entry_date)
                .bind(mood)
                .bind(content)
                .execute(&self.pool)
                .await?;
                Ok(true)
            }
        }
    }

    /// Newest-first entry summaries with a content preview.
    pub async fn journal_entries(&self, user_id: i64) -> Result<Vec<JournalSummaryRow>> {
        let rows = sqlx::query_as(
            "SELECT id, entry_date, mood,
                    SUBSTR(content, 1, ?) ||
                        CASE WHEN LENGTH(content) > ? THEN '...' ELSE '' END AS preview
             FROM journal_entries WHERE user_id = ?
             ORDER BY entry_date DESC",
        )
        .bind(JOURNAL_PREVIEW_CHARS)
        .bind(JOURNAL_PREVIEW_CHARS)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn journal_entry(
        &self,
        user_id: i64,
        entry_date: &str,
    ) -> Result<Option<JournalEntryRow>> {
        let row = sqlx::query_as(
            "SELECT id, entry_date, mood, content
             FROM journal_entries WHERE user_id = ? AND entry_date = ?",
        )
        .bind(user_id)
        .bind(entry_date)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Returns true when a row was actually deleted.
    pub async fn delete_journal_entry(&self, user_id: i64, entry_date: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE user_id = ? AND entry_date = ?")
            .bind(user_id)
            .bind(entry_date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> ChatStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("create in-memory sqlite");
        init_schema(&pool).await.expect("init schema");
        ChatStore::new(pool)
    }

    // ============================================================================
    // Users
    // ============================================================================

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let store = test_store().await;
        let a = store.ensure_user("ada").await.unwrap();
        let b = store.ensure_user("ada").await.unwrap();
        assert_eq!(a, b);
        assert!(store.user_exists(a).await.unwrap());
        assert_eq!(store.username_for(a).await.unwrap().as_deref(), Some("ada"));
    }

    // ============================================================================
    // Chat history
    // ============================================================================

    #[tokio::test]
    async fn test_history_round_trip_oldest_first() {
        let store = test_store().await;
        let user = store.ensure_user("ada").await.unwrap();

        store
            .insert_chat_message(user, "user", "hello", None)
            .await
            .unwrap();
        store
            .insert_chat_message(user, "bot", "hi there 😊", Some("happy"))
            .await
            .unwrap();

        let rows = store.recent_history(user, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sender, "user");
        assert_eq!(rows[1].sender, "bot");
        assert_eq!(rows[1].emotion.as_deref(), Some("happy"));
        assert_eq!(store.history_count(user).await.unwrap(), 2);
    }

    // ============================================================================
    // Journal
    // ============================================================================

    #[tokio::test]
    async fn test_journal_upsert_and_delete() {
        let store = test_store().await;
        let user = store.ensure_user("ada").await.unwrap();

        let created = store
            .upsert_journal_entry(user, "2026-08-04", Some("happy"), "Long walk today.")
            .await
            .unwrap();
        assert!(created);

        let updated = store
            .upsert_journal_entry(user, "2026-08-04", Some("worried"), "Actually, rough day.")
            .await
            .unwrap();
        assert!(!updated);

        let entry = store
            .journal_entry(user, "2026-08-04")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(entry.content, "Actually, rough day.");
        assert_eq!(entry.mood.as_deref(), Some("worried"));

        assert!(store.delete_journal_entry(user, "2026-08-04").await.unwrap());
        assert!(!store.delete_journal_entry(user, "2026-08-04").await.unwrap());
    }

    #[tokio::test]
    async fn test_journal_preview_truncates() {
        let store = test_store().await;
        let user = store.ensure_user("ada").await.unwrap();
        let long_content = "x".repeat(150);

        store
            .upsert_journal_entry(user, "2026-08-03", None, &long_content)
            .await
            .unwrap();

        let entries = store.journal_entries(user).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].preview.ends_with("..."));
        assert_eq!(entries[0].preview.len(), 103);
    }
}
