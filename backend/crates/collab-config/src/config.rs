use crate::{
    CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR,
    LoggingConfig, RoomConfig, ServerConfig, WebSocketConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub websocket: WebSocketConfig,
    pub room: RoomConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for COLLAB_CONFIG_DIR env var, else use ./.collab/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply COLLAB_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: COLLAB_CONFIG_DIR env var > ./.collab/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.websocket.validate()?;
        self.room.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(ref filename) = self.logging.file else {
            return Ok(None);
        };

        let log_dir = Self::config_dir()?.join(&self.logging.dir);
        Ok(Some(log_dir.join(filename)))
    }

    /// Log configuration summary.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);

        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );

        info!(
            "  websocket: buffer={}, read_timeout={}s, write_timeout={}s, max_message={}B, coalesce={}",
            self.websocket.send_buffer_size,
            self.websocket.read_timeout_secs,
            self.websocket.write_timeout_secs,
            self.websocket.max_message_size,
            self.websocket.coalesce_writes
        );

        info!(
            "  room: max_members={}, command_buffer={}, echo_to_sender={}",
            self.room.max_members, self.room.command_buffer_size, self.room.echo_to_sender
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("COLLAB_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("COLLAB_SERVER_PORT", &mut self.server.port);

        // Logging
        Self::apply_env_parse("COLLAB_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("COLLAB_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("COLLAB_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("COLLAB_LOG_DIR", &mut self.logging.dir);

        // WebSocket
        Self::apply_env_parse(
            "COLLAB_WS_SEND_BUFFER_SIZE",
            &mut self.websocket.send_buffer_size,
        );
        Self::apply_env_parse(
            "COLLAB_WS_READ_TIMEOUT_SECS",
            &mut self.websocket.read_timeout_secs,
        );
        Self::apply_env_parse(
            "COLLAB_WS_WRITE_TIMEOUT_SECS",
            &mut self.websocket.write_timeout_secs,
        );
        Self::apply_env_parse(
            "COLLAB_WS_MAX_MESSAGE_SIZE",
            &mut self.websocket.max_message_size,
        );
        Self::apply_env_bool(
            "COLLAB_WS_COALESCE_WRITES",
            &mut self.websocket.coalesce_writes,
        );

        // Room
        Self::apply_env_parse("COLLAB_ROOM_MAX_MEMBERS", &mut self.room.max_members);
        Self::apply_env_parse(
            "COLLAB_ROOM_COMMAND_BUFFER_SIZE",
            &mut self.room.command_buffer_size,
        );
        Self::apply_env_bool("COLLAB_ROOM_ECHO_TO_SENDER", &mut self.room.echo_to_sender);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
