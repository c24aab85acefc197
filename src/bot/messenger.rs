use crate::error::AppResult;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::InputFile;

/// Outbound chat primitives used by the command handlers.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()>;

    async fn send_image(&self, chat_id: i64, image: Vec<u8>) -> AppResult<()>;

    async fn send_file(&self, chat_id: i64, data: Vec<u8>, filename: &str) -> AppResult<()>;
}

/// [`Messenger`] backed by the Telegram Bot API
#[derive(Debug, Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str) -> AppResult<()> {
        self.bot.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }

    async fn send_image(&self, chat_id: i64, image: Vec<u8>) -> AppResult<()> {
        let photo = InputFile::memory(image).file_name("qr.png");
        self.bot.send_photo(ChatId(chat_id), photo).await?;
        Ok(())
    }

    async fn send_file(&self, chat_id: i64, data: Vec<u8>, filename: &str) -> AppResult<()> {
        let document = InputFile::memory(data).file_name(filename.to_string());
        self.bot.send_document(ChatId(chat_id), document).await?;
        Ok(())
    }
}
