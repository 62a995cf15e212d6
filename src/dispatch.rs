use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::commands::classify;
use crate::config::ImagesConfig;
use crate::handlers::{self, HandlerContext, Reply};
use crate::platform::{InboundMessage, Transport};
use crate::providers::{NewsProvider, WeatherProvider};
use crate::store::MessageStore;

/// Routes inbound messages to handlers and records each of them.
/// Platform-agnostic: replies go out through any [`Transport`].
pub struct Dispatch {
    store: MessageStore,
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    images: ImagesConfig,
    permits: Semaphore,
}

impl Dispatch {
    pub fn new(
        store: MessageStore,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
        images: ImagesConfig,
        max_concurrent: usize,
    ) -> Self {
        Self {
            store,
            weather,
            news,
            images,
            permits: Semaphore::new(max_concurrent.max(1)),
        }
    }

    /// Handle one inbound message: record it, run the matching handler and
    /// send its replies. Failures are logged; nothing here is fatal.
    pub async fn process(&self, msg: &InboundMessage, transport: &dyn Transport) {
        // The semaphore is never closed, so acquire only fails on a bug.
        let _permit = match self.permits.acquire().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                error!("Dispatch semaphore unavailable: {}", e);
                None
            }
        };

        let command = classify(&msg.text);
        info!(
            sender_id = msg.sender_id,
            chat_id = msg.chat_id,
            command = command.label().unwrap_or("none"),
            received_at = %msg.received_at,
            "Inbound message"
        );

        // Recorded before handling so a failing handler cannot skip it.
        match self
            .store
            .create_message(msg.sender_id, msg.chat_id, &msg.text, command.label())
            .await
        {
            Ok(stored) => debug!("Stored message {}", stored.id),
            Err(e) => error!(
                chat_id = msg.chat_id,
                "Failed to store message: {:#}", e
            ),
        }

        let ctx = HandlerContext {
            weather: self.weather.as_ref(),
            news: self.news.as_ref(),
            images: &self.images,
        };
        let replies = handlers::handle(&command, &msg.sender_name, &ctx).await;

        for reply in replies {
            let sent = match &reply {
                Reply::Text(text) => transport.send_text(msg.chat_id, text).await,
                Reply::Photo(url) => transport.send_photo(msg.chat_id, url).await,
                Reply::ReplyTo(text) => {
                    transport
                        .reply_to(msg.chat_id, msg.message_id, text)
                        .await
                }
            };
            if let Err(e) = sent {
                error!(chat_id = msg.chat_id, "Failed to send {:?}: {:#}", reply, e);
            }
        }
    }
}
