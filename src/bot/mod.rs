pub mod access;
pub mod commands;
pub mod messenger;

pub use access::AccessPolicy;
pub use commands::{Command, Invocation};
pub use messenger::{Messenger, TelegramMessenger};

use crate::provider::ResourceProvider;
use crate::render::ArtifactRenderer;
use std::sync::Arc;
use teloxide::dispatching::{HandlerExt, UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Shared data accessible in all commands
pub struct BotContext {
    pub provider: Arc<dyn ResourceProvider>,
    pub messenger: Arc<dyn Messenger>,
    pub renderer: Arc<dyn ArtifactRenderer>,
    pub access: AccessPolicy,
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// Message updates carrying one of our commands go to the handlers.
pub fn schema() -> UpdateHandler<Error> {
    Update::filter_message()
        .filter_command::<Command>()
        .endpoint(handle_command)
}

async fn handle_command(
    msg: Message,
    command: Command,
    ctx: Arc<BotContext>,
) -> Result<(), Error> {
    let Some(user) = msg.from.as_ref() else {
        debug!("Ignoring command without sender in chat {}", msg.chat.id);
        return Ok(());
    };

    let invocation = Invocation {
        chat_id: msg.chat.id.0,
        user_id: user.id.0,
        username: user.username.clone(),
    };

    // Handlers report their own failures; nothing propagates to the dispatcher.
    commands::dispatch(&ctx, &invocation, command).await;
    Ok(())
}

/// Register the command menu and poll for updates until Ctrl-C.
pub async fn run(bot: Bot, ctx: Arc<BotContext>) {
    match bot.set_my_commands(Command::bot_commands()).await {
        Ok(_) => info!("Registered {} bot commands", Command::bot_commands().len()),
        Err(e) => warn!("Failed to register bot commands: {}", e),
    }

    match bot.get_me().await {
        Ok(me) => info!("Bot is ready! Logged in as @{}", me.username()),
        Err(e) => warn!("Could not fetch bot identity via getMe: {}", e),
    }

    info!("Bot started - polling for updates");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
