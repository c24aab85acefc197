use crate::bot::commands::{reply, Invocation};
use crate::bot::BotContext;
use tracing::{info, warn};

pub const NOT_ADMIN_MESSAGE: &str = "❌ Только администраторы могут отзывать доступ.";

pub const USAGE_MESSAGE: &str = "❌ Использование: /revoke <client_id>\n\n\
    Используй /status для списка клиентов.";

/// /revoke <client_id>: admin-only deletion of a peer
pub async fn handle(ctx: &BotContext, invocation: &Invocation, args: &str) {
    if !ctx.access.is_admin(invocation.user_id) {
        warn!("Non-admin {} tried /revoke", invocation.user_id);
        reply(ctx, invocation.chat_id, NOT_ADMIN_MESSAGE).await;
        return;
    }

    let Some(client_id) = single_argument(args) else {
        warn!("Admin {} sent /revoke with bad arguments: {:?}", invocation.user_id, args);
        reply(ctx, invocation.chat_id, USAGE_MESSAGE).await;
        return;
    };

    if ctx.provider.delete_client(client_id).await {
        info!("Admin {} revoked client {}", invocation.user_id, client_id);
        reply(ctx, invocation.chat_id, &format!("✅ Клиент {} удален", client_id)).await;
    } else {
        warn!("Admin {} failed to revoke client {}", invocation.user_id, client_id);
        reply(
            ctx,
            invocation.chat_id,
            &format!("❌ Не удалось удалить клиента {}", client_id),
        )
        .await;
    }
}

/// The only whitespace-separated argument, if there is exactly one.
fn single_argument(args: &str) -> Option<&str> {
    let mut parts = args.split_whitespace();
    let first = parts.next()?;
    parts.next().is_none().then_some(first)
}
