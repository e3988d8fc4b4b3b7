use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use verifier_channel::{ChannelSettings, DEFAULT_ENDPOINT};

use super::logging::{LogDestination, LogLevel};

pub(crate) const DEFAULT_CONFIG_PATH: &str = "./verifier.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    /// Print user-visible notices. Turning this off only silences them.
    pub alerts: bool,
    pub log: LogDestination,
    pub log_level: LogLevel,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: 10,
            alerts: true,
            log: LogDestination::Terminal,
            log_level: LogLevel::Info,
        }
    }
}

impl AppConfig {
    pub(crate) fn channel_settings(&self) -> ChannelSettings {
        ChannelSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Read the config file at `path`. A missing file is `Ok(None)`.
pub(crate) fn read_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the config at `path`, falling back to defaults.
///
/// The error is handed back instead of logged, since the log destination
/// itself comes from the config.
pub(crate) fn load_config(path: &Path) -> (AppConfig, Option<ConfigError>) {
    match read_config(path) {
        Ok(config) => (config.unwrap_or_default(), None),
        Err(err) => (AppConfig::default(), Some(err)),
    }
}
