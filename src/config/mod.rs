use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const API_KEY_ENV: &str = "STEAM_WEB_API_KEY";
pub const CONFIG_PATH_ENV: &str = "STEAM_CARD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/card.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    pub server: ServerConfig,
    pub steam: SteamConfig,
    pub card: RenderConfig,
}

impl CardConfig {
    pub fn load() -> Result<Self> {
        let configured_path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        ensure!(
            !configured_path.is_empty(),
            "Configuration path must be non-empty"
        );

        let settings = Config::builder()
            .add_source(File::new(&configured_path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix("STEAM_CARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|err| map_config_error(err, &configured_path))?;
        let mut config: Self = settings
            .try_deserialize()
            .context("Failed to deserialize card configuration")?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.steam.api_key = Some(key);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&mut self) -> Result<()> {
        // A blank key counts as missing; requests then fail with 500.
        if self
            .steam
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            self.steam.api_key = None;
        }
        ensure!(self.server.port > 0, "Server port must be greater than zero");
        ensure!(
            !self.steam.api_base_url.trim().is_empty(),
            "Steam API base URL must be specified"
        );
        ensure!(
            self.steam.steam_id.len() == 17 && self.steam.steam_id.bytes().all(|b| b.is_ascii_digit()),
            "Steam id must be a 17 digit SteamID64, got {:?}",
            self.steam.steam_id
        );
        ensure!(
            !self.steam.user_agent.trim().is_empty(),
            "User agent must not be empty"
        );
        ensure!(
            (100..=60_000).contains(&self.steam.request_timeout_ms),
            "Request timeout must be between 100ms and 60s"
        );
        self.card.ensure_bounds()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.steam.api_key.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: Option<IpAddr>,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> SocketAddr {
        let host = self.host.unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        SocketAddr::new(host, self.port)
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SteamConfig {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub steam_id: String,
    pub user_agent: String,
    pub request_timeout_ms: u64,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.steampowered.com".to_string(),
            api_key: None,
            steam_id: "76561198835243757".to_string(),
            user_agent: "steam-card".to_string(),
            request_timeout_ms: 10_000,
        }
    }
}

impl SteamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

// Hand-written so the credential never reaches the logs.
impl std::fmt::Debug for SteamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamConfig")
            .field("api_base_url", &self.api_base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("steam_id", &self.steam_id)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub cache_max_age_secs: u64,
    pub watermark: String,
    pub fallback_name: String,
    pub max_avatar_bytes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cache_max_age_secs: 900,
            watermark: "STEAM".to_string(),
            fallback_name: "Steam User".to_string(),
            max_avatar_bytes: 2 * 1024 * 1024,
        }
    }
}

impl RenderConfig {
    fn ensure_bounds(&self) -> Result<()> {
        ensure!(
            self.cache_max_age_secs <= 86_400,
            "Cache max-age cannot exceed one day"
        );
        let watermark_len = self.watermark.chars().count();
        ensure!(
            (1..=32).contains(&watermark_len),
            "Watermark must be between 1 and 32 characters"
        );
        ensure!(
            !self.fallback_name.trim().is_empty(),
            "Fallback name must not be empty"
        );
        ensure!(
            self.max_avatar_bytes > 0 && self.max_avatar_bytes <= 16 * 1024 * 1024,
            "Avatar byte limit must be within 1 byte and 16 MiB"
        );
        Ok(())
    }

    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.cache_max_age_secs)
    }
}

fn map_config_error(err: ConfigError, path: &str) -> ConfigError {
    match err {
        ConfigError::NotFound(_) => ConfigError::NotFound(path.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let mut config = CardConfig::default();
        config.validate().expect("defaults are valid");
        assert_eq!(config.card.cache_control(), "public, max-age=900");
        assert_eq!(config.server.address().port(), 3000);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn blank_api_key_is_treated_as_missing() {
        let mut config = CardConfig::default();
        config.steam.api_key = Some("   ".to_string());
        config.validate().expect("blank key is not a startup error");
        assert!(config.api_key().is_none());
    }

    #[test]
    fn malformed_steam_id_is_rejected() {
        let mut config = CardConfig::default();
        config.steam.steam_id = "not-a-steam-id".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_cache_age_is_rejected() {
        let mut config = CardConfig::default();
        config.card.cache_max_age_secs = 90_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut config = CardConfig::default();
        config.steam.api_key = Some("SECRET123".to_string());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("SECRET123"));
        assert!(rendered.contains("<redacted>"));
    }
}
