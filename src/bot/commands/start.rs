use crate::bot::commands::{reply, Invocation};
use crate::bot::BotContext;
use tracing::info;

pub const WELCOME_MESSAGE: &str = "🔐 VPN Bot для обхода гео-блокировок\n\n\
    Доступные команды:\n\
    /request - Получить VPN конфигурацию\n\
    /status - Проверить статус VPN\n\
    /revoke - Отозвать доступ\n\n\
    Отправь /request для получения конфига.";

/// /start: show the command menu
pub async fn handle(ctx: &BotContext, invocation: &Invocation) {
    info!("User {} started bot", invocation.user_id);
    reply(ctx, invocation.chat_id, WELCOME_MESSAGE).await;
}
