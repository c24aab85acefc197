use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

fn default_wg_easy_host() -> String {
    "wg-easy".to_string()
}

fn default_wg_easy_port() -> u16 {
    51821
}

/// Root application configuration.
///
/// Keys are flat so the plain environment names (`BOT_TOKEN`, `WG_PASSWORD`,
/// `BOT_WHITELIST`, ...) map onto fields directly.
#[derive(Deserialize, Clone)]
pub struct AppConfig {
    /// Telegram bot token
    #[serde(default)]
    pub bot_token: String,
    /// Comma-separated Telegram user ids allowed to use /request.
    /// Empty means everyone.
    #[serde(default)]
    pub bot_whitelist: String,
    /// Comma-separated Telegram user ids allowed to use /revoke.
    /// Empty means nobody.
    #[serde(default)]
    pub bot_admins: String,
    #[serde(default = "default_wg_easy_host")]
    pub wg_easy_host: String,
    #[serde(default = "default_wg_easy_port")]
    pub wg_easy_port: u16,
    /// wg-easy admin password used for session login
    #[serde(default)]
    pub wg_password: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("bot_whitelist", &self.bot_whitelist)
            .field("bot_admins", &self.bot_admins)
            .field("wg_easy_host", &self.wg_easy_host)
            .field("wg_easy_port", &self.wg_easy_port)
            .field("wg_password", &"***")
            .finish()
    }
}

/// Keep only a short prefix of a secret for log output.
pub fn redact(secret: &str) -> String {
    let prefix: String = secret.chars().take(10).collect();
    format!("{}...", prefix)
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Unprefixed, e.g. BOT_TOKEN, WG_EASY_PORT
            .add_source(Environment::default())
            .build()?;

        Self::from_config(config)
    }

    /// Deserialize and validate an already assembled configuration.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let app: Self = config.try_deserialize()?;
        app.validate()?;
        Ok(app)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.trim().is_empty() {
            return Err(ConfigError::Message(
                "BOT_TOKEN environment variable is required".to_string(),
            ));
        }
        if self.wg_password.is_empty() {
            return Err(ConfigError::Message(
                "WG_PASSWORD environment variable is required".to_string(),
            ));
        }
        if self.wg_easy_host.trim().is_empty() {
            return Err(ConfigError::Message("WG_EASY_HOST must not be empty".to_string()));
        }
        Ok(())
    }

    /// Initialize the global config singleton
    pub fn init() -> Result<&'static Self, ConfigError> {
        let config = Self::load()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    /// Base URL of the wg-easy web API
    pub fn wg_easy_url(&self) -> String {
        format!("http://{}:{}", self.wg_easy_host, self.wg_easy_port)
    }
}
