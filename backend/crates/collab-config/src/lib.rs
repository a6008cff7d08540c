mod config;
mod error;
mod log_level;
mod logging_config;
mod room_config;
mod server_config;
mod websocket_config;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use room_config::RoomConfig;
pub use server_config::ServerConfig;
pub use websocket_config::WebSocketConfig;

pub const CONFIG_DIR_ENV: &str = "COLLAB_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR: &str = ".collab";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const MIN_PORT: u16 = 1024;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
