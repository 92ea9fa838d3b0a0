//! Service configuration.
//!
//! Non-secret settings come from an optional TOML file named by
//! `PRONOUNCE_CONFIG`; every table has defaults, so an empty or missing file is
//! a working configuration. API keys are read from the environment only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engines::elevenlabs::VoiceCatalog;

/// Environment variable naming the TOML config file.
pub const CONFIG_PATH_ENV: &str = "PRONOUNCE_CONFIG";
/// Text-generation provider credential.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Speech-synthesis provider credential.
pub const ELEVENLABS_API_KEY_ENV: &str = "ELEVENLABS_API_KEY";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set. Export it or add it to the service environment.")]
    MissingCredential(&'static str),
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub gemini: GeminiConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub voices: VoiceCatalog,
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Use `0` to let the OS pick a port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Filesystem layout for static assets and generated audio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory served under `/static`, also holding `index.html` and `admin.html`.
    pub static_dir: PathBuf,
    /// Where synthesized audio is written. Created on first use.
    pub audio_dir: PathBuf,
    /// URL prefix under which `audio_dir` is reachable.
    pub audio_url_prefix: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            audio_dir: PathBuf::from("static/audio"),
            audio_url_prefix: "/static/audio".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-pro-latest".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevenLabsConfig {
    pub base_url: String,
    pub model_id: String,
    pub stability: f32,
    pub similarity_boost: f32,
    pub speed: f32,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            stability: 0.5,
            similarity_boost: 0.75,
            speed: 1.0,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `PRONOUNCE_CONFIG` when set, otherwise use defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                log::info!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            None => {
                log::info!("{CONFIG_PATH_ENV} not set, using default config");
                Ok(Self::default())
            }
        }
    }

    /// `host:port` string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// API keys for the two hosted providers.
#[derive(Clone)]
pub struct Credentials {
    pub google_api_key: String,
    pub elevenlabs_api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("google_api_key", &"<redacted>")
            .field("elevenlabs_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read both keys from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read both keys through `lookup`. A missing or blank key is an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingCredential(key))
        };
        Ok(Self {
            google_api_key: require(GOOGLE_API_KEY_ENV)?,
            elevenlabs_api_key: require(ELEVENLABS_API_KEY_ENV)?,
        })
    }
}
