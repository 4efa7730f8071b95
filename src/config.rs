// Application settings.
// Layers built-in defaults, an optional TOML file and PITCHSIDE__* environment variables.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::cache;
use crate::error::{AppError, Result};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pitchside.toml";

/// Conventional variable holding the football-data.org token.
pub const FOOTBALL_KEY_VAR: &str = "FOOTBALL_DATA_API_KEY";

/// Conventional variable holding the Gemini API key.
pub const GEMINI_KEY_VAR: &str = "GOOGLE_GEMINI_API_KEY";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub football: FootballSettings,
    pub gemini: GeminiSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FootballSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for FootballSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.football-data.org/v4".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    /// Cheaper model used when the primary one is rate limited.
    pub lite_model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            lite_model: "gemini-2.5-flash-lite".to_string(),
            temperature: 0.8,
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache root; the platform cache directory when unset.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the given file (required) or `pitchside.toml` (optional),
    /// then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let mut settings: Settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("PITCHSIDE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        settings.apply_key_overrides(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Parse settings from TOML text without consulting the environment.
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Fill API keys from the conventional variables when not configured explicitly.
    pub fn apply_key_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.football.api_key.is_none() {
            self.football.api_key = lookup(FOOTBALL_KEY_VAR);
        }
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = lookup(GEMINI_KEY_VAR);
        }
    }

    pub fn football_api_key(&self) -> Result<&str> {
        non_empty(self.football.api_key.as_deref()).ok_or(AppError::MissingApiKey(FOOTBALL_KEY_VAR))
    }

    pub fn gemini_api_key(&self) -> Result<&str> {
        non_empty(self.gemini.api_key.as_deref()).ok_or(AppError::MissingApiKey(GEMINI_KEY_VAR))
    }

    /// Resolve the cache root directory.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        match &self.cache.dir {
            Some(dir) => Ok(dir.clone()),
            None => cache::default_cache_dir()
                .ok_or_else(|| AppError::Other("Cannot determine cache directory".to_string())),
        }
    }

    /// Socket address string the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
