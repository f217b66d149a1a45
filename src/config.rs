//! Configuration file support for the storefront client.
//!
//! Settings are plain JSON. Natively they live in the platform config
//! directory; in the browser they live in `localStorage`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::api::AuthScheme;
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_HANDOFF_DESTINATION, DEFAULT_MESSAGING_HOST,
    DEFAULT_NOTICE_MILLIS, MAX_PHOTO_BYTES,
};
use crate::notice::NoticeBoard;
use crate::photo::StagingLimits;
use crate::registration::HandoffTarget;
use crate::storage::{StorageError, TabStorage};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// REST API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// How the auth token is sent
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Messaging service host for the checkout hand-off
    #[serde(default = "default_messaging_host")]
    pub messaging_host: String,

    /// Chat destination address
    #[serde(default = "default_handoff_destination")]
    pub handoff_destination: String,

    /// Largest accepted photo, in bytes
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: u64,

    /// Largest number of photos per listing (unlimited if absent)
    #[serde(default)]
    pub max_photos: Option<usize>,

    /// Banner lifetime in milliseconds (clamped to 3000..=5000)
    #[serde(default = "default_notice_millis")]
    pub notice_millis: u64,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_messaging_host() -> String {
    DEFAULT_MESSAGING_HOST.to_string()
}

fn default_handoff_destination() -> String {
    DEFAULT_HANDOFF_DESTINATION.to_string()
}

fn default_max_photo_bytes() -> u64 {
    MAX_PHOTO_BYTES
}

fn default_notice_millis() -> u64 {
    DEFAULT_NOTICE_MILLIS
}

impl StorefrontConfig {
    /// Storage key for browser config persistence.
    pub const STORAGE_KEY: &'static str = "storefront-config";

    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            api_base_url: default_api_base_url(),
            auth_scheme: AuthScheme::default(),
            messaging_host: default_messaging_host(),
            handoff_destination: default_handoff_destination(),
            max_photo_bytes: default_max_photo_bytes(),
            max_photos: None,
            notice_millis: default_notice_millis(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Hand-off target built from the messaging settings.
    pub fn handoff_target(&self) -> HandoffTarget {
        HandoffTarget::new(&self.messaging_host, &self.handoff_destination)
    }

    /// Photo staging limits.
    pub fn staging_limits(&self) -> StagingLimits {
        StagingLimits {
            max_bytes: self.max_photo_bytes,
            max_photos: self.max_photos,
        }
    }

    /// Banner board with the configured lifetime.
    pub fn notice_board(&self) -> NoticeBoard {
        NoticeBoard::new(Duration::from_millis(self.notice_millis))
    }

    /// Load configuration from a storage backend.
    /// Returns None if not found or can't be parsed.
    pub fn load_from_storage(storage: &impl TabStorage) -> Option<Self> {
        match storage.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from storage");
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse stored configuration: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("No configuration found in storage");
                None
            }
            Err(e) => {
                log::warn!("Failed to read configuration from storage: {}", e);
                None
            }
        }
    }

    /// Save configuration to a storage backend.
    pub fn save_to_storage(&self, storage: &impl TabStorage) -> Result<(), ConfigError> {
        let json = self.to_json()?;
        storage.set(Self::STORAGE_KEY, &json)?;
        log::info!("Saved configuration to storage");
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "storefront.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("storefront").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("storefront")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from_path(&path)
    }

    /// Try to load configuration from `path`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Option<Self> {
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded configuration from {:?}", path);
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse config file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Save configuration to `path`, creating parent directories.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_path(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Load from the platform location, falling back to defaults.
    pub fn load_or_default() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::load_from_default_path();

        #[cfg(target_arch = "wasm32")]
        let loaded = crate::storage::WebStorage::local()
            .ok()
            .and_then(|storage| Self::load_from_storage(&storage));

        loaded.unwrap_or_default()
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Storage error (localStorage in WASM)
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}
