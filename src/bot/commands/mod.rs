pub mod request;
pub mod revoke;
pub mod start;
pub mod status;

use crate::bot::BotContext;
use teloxide::utils::command::{BotCommands, ParseError};
use tracing::error;

/// Commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "показать это меню")]
    Start,
    #[command(description = "получить VPN конфигурацию")]
    Request,
    #[command(
        description = "отозвать доступ: /revoke <client_id>",
        parse_with = raw_arguments
    )]
    Revoke(String),
    #[command(description = "список VPN клиентов")]
    Status,
}

/// Pass the argument text through untouched; the handler validates it.
fn raw_arguments(input: String) -> Result<(String,), ParseError> {
    Ok((input,))
}

/// Who sent a command and where to answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub chat_id: i64,
    pub user_id: u64,
    pub username: Option<String>,
}

/// Route a parsed command to its handler.
pub async fn dispatch(ctx: &BotContext, invocation: &Invocation, command: Command) {
    match command {
        Command::Start => start::handle(ctx, invocation).await,
        Command::Request => request::handle(ctx, invocation).await,
        Command::Revoke(args) => revoke::handle(ctx, invocation, &args).await,
        Command::Status => status::handle(ctx, invocation).await,
    }
}

/// Send a text reply, logging delivery failures.
pub(crate) async fn reply(ctx: &BotContext, chat_id: i64, text: &str) {
    if let Err(e) = ctx.messenger.send_text(chat_id, text).await {
        error!("Failed to send message to chat {}: {}", chat_id, e);
    }
}
