pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A text message received from the chat platform
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Platform message id, used to reply to this message
    pub message_id: i32,
    pub sender_id: i64,
    pub chat_id: i64,
    /// Display name of the sender (first name on Telegram)
    pub sender_name: String,
    /// The message text exactly as received
    pub text: String,
    pub received_at: DateTime<Utc>,
}

/// Outbound side of the chat platform
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_photo(&self, chat_id: i64, image_url: &str) -> Result<()>;

    /// Send `text` as a reply to the given inbound message
    async fn reply_to(&self, chat_id: i64, message_id: i32, text: &str) -> Result<()>;
}
