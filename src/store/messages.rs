use anyhow::{Context, Result};

use super::MessageStore;

/// A row of the message log
#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub struct StoredMessage {
    pub id: i64,
    pub user_id: i64,
    pub chat_id: i64,
    pub text: String,
    pub command: Option<String>,
    /// Server-side creation time, RFC 3339 UTC
    pub created_at: String,
}

impl MessageStore {
    /// Append one message to the log. The id and timestamp are assigned by the database.
    pub async fn create_message(
        &self,
        user_id: i64,
        chat_id: i64,
        text: &str,
        command: Option<&str>,
    ) -> Result<StoredMessage> {
        let conn = self.conn.lock().await;

        conn.execute(
            "INSERT INTO messages (user_id, chat_id, text, command) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![user_id, chat_id, text, command],
        )
        .context("Failed to save message")?;

        let id = conn.last_insert_rowid();
        conn.query_row(
            "SELECT id, user_id, chat_id, text, command, created_at FROM messages WHERE id = ?1",
            rusqlite::params![id],
            parse_message_row,
        )
        .context("Failed to read back saved message")
    }

    /// Most recent messages first
    pub async fn list_messages(&self, limit: usize) -> Result<Vec<StoredMessage>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, chat_id, text, command, created_at
             FROM messages
             ORDER BY id DESC
             LIMIT ?1",
        )?;

        let messages = stmt
            .query_map(rusqlite::params![limit as i64], parse_message_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to load messages")?;

        Ok(messages)
    }

    pub async fn count_messages(&self) -> Result<i64> {
        let conn = self.conn.lock().await;
        conn.query_row("SELECT count(*) FROM messages", [], |row| row.get(0))
            .context("Failed to count messages")
    }
}

fn parse_message_row(row: &rusqlite::Row) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        chat_id: row.get(2)?,
        text: row.get(3)?,
        command: row.get(4)?,
        created_at: row.get(5)?,
    })
}
