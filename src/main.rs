use std::sync::Arc;
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wgbot::{
    bot::{self, AccessPolicy, BotContext, TelegramMessenger},
    config::{self, AppConfig},
    provider::WgEasyClient,
    render::QrCodeRenderer,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Initialize logging first
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wgbot=info,teloxide=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting wgbot v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::init()?;
    info!("Configuration loaded");
    info!("  BOT_TOKEN: {}", config::redact(&config.bot_token));
    info!("  wg-easy URL: {}", config.wg_easy_url());
    info!(
        "  Whitelist: {}",
        if config.bot_whitelist.trim().is_empty() {
            "(all users)"
        } else {
            config.bot_whitelist.as_str()
        }
    );

    let provider = WgEasyClient::from_config(config)?;
    info!("wg-easy client initialized for {}", provider.base_url());

    let telegram = Bot::new(&config.bot_token);
    let ctx = Arc::new(BotContext {
        provider: Arc::new(provider),
        messenger: Arc::new(TelegramMessenger::new(telegram.clone())),
        renderer: Arc::new(QrCodeRenderer::new()),
        access: AccessPolicy::from_config(config),
    });

    bot::run(telegram, ctx).await;

    info!("Bot shut down gracefully");
    Ok(())
}
