use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InputFile, MessageId, ReplyParameters};
use tracing::{info, warn};

use crate::dispatch::Dispatch;
use crate::platform::{InboundMessage, Transport};

/// Outbound Telegram calls through the Bot API
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .context("sendMessage failed")?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, image_url: &str) -> Result<()> {
        let url = reqwest::Url::parse(image_url)
            .with_context(|| format!("Invalid image URL: {}", image_url))?;
        self.bot
            .send_photo(ChatId(chat_id), InputFile::url(url))
            .await
            .context("sendPhoto failed")?;
        Ok(())
    }

    async fn reply_to(&self, chat_id: i64, message_id: i32, text: &str) -> Result<()> {
        let mut req = self.bot.send_message(ChatId(chat_id), text);
        req.reply_parameters = Some(ReplyParameters::new(MessageId(message_id)));
        req.await.context("sendMessage (reply) failed")?;
        Ok(())
    }
}

/// Run the Telegram long-poll loop until the process is stopped
pub async fn run(dispatch: Arc<Dispatch>, bot: Bot) -> Result<()> {
    info!("Starting Telegram platform...");

    let transport = TelegramTransport::new(bot.clone());

    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![dispatch, transport])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(
    msg: Message,
    dispatch: Arc<Dispatch>,
    transport: TelegramTransport,
) -> ResponseResult<()> {
    // Only text messages are routed; stickers, photos and the like are dropped here.
    let Some(inbound) = to_inbound(&msg) else {
        return Ok(());
    };

    dispatch.process(&inbound, &transport).await;
    Ok(())
}

fn to_inbound(msg: &Message) -> Option<InboundMessage> {
    let user = msg.from.as_ref()?;
    let text = msg.text()?;

    Some(InboundMessage {
        message_id: msg.id.0,
        sender_id: user.id.0 as i64,
        chat_id: msg.chat.id.0,
        sender_name: user.first_name.clone(),
        text: text.to_string(),
        received_at: msg.date,
    })
}
