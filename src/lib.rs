pub mod bot;
pub mod config;
pub mod error;
pub mod provider;
pub mod render;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
