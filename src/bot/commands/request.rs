use crate::bot::commands::{reply, Invocation};
use crate::bot::BotContext;
use crate::error::{AppError, AppResult};
use crate::provider::ManagedClient;
use chrono::Utc;
use tracing::{error, info, warn};

pub const DENIED_MESSAGE: &str = "❌ У вас нет доступа. Обратитесь к администратору.";

/// /request: provision a new peer and deliver its config
pub async fn handle(ctx: &BotContext, invocation: &Invocation) {
    if !ctx.access.is_authorized(invocation.user_id) {
        warn!("Unauthorized user {}", invocation.user_id);
        reply(ctx, invocation.chat_id, DENIED_MESSAGE).await;
        return;
    }

    info!("User {} requested VPN config", invocation.user_id);

    let name = client_name(
        invocation.username.as_deref(),
        invocation.user_id,
        Utc::now().timestamp(),
    );

    let client = match ctx.provider.create_client(&name).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create VPN client for user {}: {}", invocation.user_id, e);
            reply(ctx, invocation.chat_id, &failure_message(&e)).await;
            return;
        }
    };

    match deliver(ctx, invocation.chat_id, &client).await {
        Ok(()) => info!("Client {} created for user {}", client.name, invocation.user_id),
        Err(e) => {
            // The peer exists on wg-easy; the id lets an admin /revoke it
            error!(
                "Client {} (id {}) created for user {} but delivery failed: {}",
                client.name, client.id, invocation.user_id, e
            );
            reply(ctx, invocation.chat_id, &orphan_failure_message(&e, &client.id)).await;
        }
    }
}

/// `{username}_{unix_seconds}`, falling back to `user_{id}` without a username.
pub fn client_name(username: Option<&str>, user_id: u64, timestamp: i64) -> String {
    match username {
        Some(username) if !username.is_empty() => format!("{}_{}", username, timestamp),
        _ => format!("user_{}_{}", user_id, timestamp),
    }
}

/// Send config file, QR code and instructions in that order.
async fn deliver(ctx: &BotContext, chat_id: i64, client: &ManagedClient) -> AppResult<()> {
    if client.configuration.is_empty() {
        return Err(AppError::internal("wg-easy returned an empty configuration"));
    }

    let qr = ctx.renderer.render(&client.configuration)?;

    ctx.messenger
        .send_file(
            chat_id,
            client.configuration.clone().into_bytes(),
            &format!("{}.conf", client.name),
        )
        .await?;
    ctx.messenger.send_image(chat_id, qr).await?;
    ctx.messenger
        .send_text(chat_id, &success_message(&client.name))
        .await
}

pub fn success_message(client_name: &str) -> String {
    format!(
        "✅ VPN конфигурация создана!\n\n\
         1. Скачай .conf файл ИЛИ отсканируй QR код\n\
         2. Импортируй в WireGuard приложение\n\
         3. Подключись к VPN\n\n\
         Имя клиента: {}",
        client_name
    )
}

pub fn failure_message(error: &AppError) -> String {
    format!(
        "❌ Ошибка создания VPN: {}\n\n\
         Попробуй позже или обратись к администратору.",
        error
    )
}

/// Failure after the peer was created; carries the id for the admin.
pub fn orphan_failure_message(error: &AppError, client_id: &str) -> String {
    format!("{}\n\nID клиента: {}", failure_message(error), client_id)
}
