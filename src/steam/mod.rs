use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::avatar::{DataUri, normalize_content_type};
use crate::config::SteamConfig;
use crate::models::player::{PlayerSummariesEnvelope, PlayerSummary};

const PLAYER_SUMMARIES_PATH: &str = "/ISteamUser/GetPlayerSummaries/v2/";

#[derive(Debug, thiserror::Error)]
pub enum SteamError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid user agent header: {0}")]
    UserAgent(#[from] reqwest::header::InvalidHeaderValue),
    #[error("request to Steam API failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Steam API answered with status {0}")]
    Status(StatusCode),
    #[error("Steam API returned a malformed body: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Result of the best-effort avatar download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarOutcome {
    Inlined(DataUri),
    Missing(AvatarMiss),
}

impl AvatarOutcome {
    pub fn into_data_uri(self) -> Option<DataUri> {
        match self {
            Self::Inlined(uri) => Some(uri),
            Self::Missing(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvatarMiss {
    #[error("profile has no avatar url")]
    EmptyUrl,
    #[error("avatar request failed: {0}")]
    Transport(String),
    #[error("avatar request answered with status {0}")]
    Status(u16),
    #[error("avatar body was empty")]
    Empty,
    #[error("avatar body of {0} bytes exceeds the configured limit")]
    TooLarge(usize),
}

#[derive(Clone)]
pub struct SteamClient {
    inner: Client,
    base_url: String,
}

impl SteamClient {
    pub fn new(config: &SteamConfig) -> Result<Self, SteamError> {
        Self::with_timeout(
            &config.api_base_url,
            &config.user_agent,
            config.request_timeout(),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SteamError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(user_agent)?);
        let inner = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(SteamError::Client)?;

        Ok(Self {
            inner,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Looks up one profile. `Ok(None)` means Steam returned no record.
    pub async fn fetch_player_summary(
        &self,
        api_key: &str,
        steam_id: &str,
    ) -> Result<Option<PlayerSummary>, SteamError> {
        let url = format!("{}{PLAYER_SUMMARIES_PATH}", self.base_url);
        debug!(%url, steam_id, "Fetching player summary");

        let response = self
            .inner
            .get(&url)
            .query(&[("key", api_key), ("steamids", steam_id)])
            .send()
            .await
            // The URL carries the key; keep it out of the error text.
            .map_err(|err| SteamError::Transport(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SteamError::Status(status));
        }

        let envelope: PlayerSummariesEnvelope = response
            .json()
            .await
            .map_err(|err| SteamError::Decode(err.without_url()))?;
        Ok(envelope.into_first())
    }

    /// Downloads the avatar and inlines it. Never fails the request.
    pub async fn fetch_avatar(&self, url: &str, max_bytes: usize) -> AvatarOutcome {
        match self.try_fetch_avatar(url, max_bytes).await {
            Ok(uri) => AvatarOutcome::Inlined(uri),
            Err(miss) => {
                debug!(reason = %miss, "Avatar unavailable, rendering placeholder");
                AvatarOutcome::Missing(miss)
            }
        }
    }

    async fn try_fetch_avatar(&self, url: &str, max_bytes: usize) -> Result<DataUri, AvatarMiss> {
        let url = url.trim();
        if url.is_empty() {
            return Err(AvatarMiss::EmptyUrl);
        }

        let mut response = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|err| AvatarMiss::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AvatarMiss::Status(status.as_u16()));
        }
        if let Some(length) = response.content_length() {
            if length > max_bytes as u64 {
                return Err(AvatarMiss::TooLarge(
                    usize::try_from(length).unwrap_or(usize::MAX),
                ));
            }
        }

        let content_type = normalize_content_type(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
        );

        // Content-Length may be absent or wrong; cap the running total.
        let mut bytes = Vec::with_capacity(
            response
                .content_length()
                .and_then(|length| usize::try_from(length).ok())
                .unwrap_or(0),
        );
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|err| AvatarMiss::Transport(err.to_string()))?
        {
            let total = bytes.len() + chunk.len();
            if total > max_bytes {
                return Err(AvatarMiss::TooLarge(total));
            }
            bytes.extend_from_slice(&chunk);
        }
        if bytes.is_empty() {
            return Err(AvatarMiss::Empty);
        }

        Ok(DataUri::encode(&content_type, &bytes))
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fake::FakeSteam;
    use super::*;

    const STEAM_ID: &str = "76561198835243757";

    fn client(addr: std::net::SocketAddr) -> SteamClient {
        SteamClient::with_timeout(
            &format!("http://{addr}/"),
            "steam-card-test",
            Duration::from_secs(5),
        )
        .expect("client builds")
    }

    #[tokio::test]
    async fn returns_first_player() {
        let fake = FakeSteam::new(json!([
            { "steamid": STEAM_ID, "personaname": "Alice", "avatarfull": "", "personastate": 1 },
            { "steamid": "other", "personaname": "Mallory", "avatarfull": "", "personastate": 0 }
        ]));
        let addr = fake.spawn().await;

        let player = client(addr)
            .fetch_player_summary("test-key", STEAM_ID)
            .await
            .expect("request succeeds")
            .expect("player present");
        assert_eq!(player.personaname, "Alice");
    }

    #[tokio::test]
    async fn empty_player_list_is_none() {
        let addr = FakeSteam::new(json!([])).spawn().await;
        let player = client(addr)
            .fetch_player_summary("test-key", STEAM_ID)
            .await
            .expect("request succeeds");
        assert!(player.is_none());
    }

    #[tokio::test]
    async fn rejected_key_is_status_error() {
        let addr = FakeSteam::new(json!([])).spawn().await;
        let err = client(addr)
            .fetch_player_summary("wrong-key", STEAM_ID)
            .await
            .expect_err("forbidden");
        assert!(matches!(err, SteamError::Status(status) if status == StatusCode::FORBIDDEN));
        assert!(!err.to_string().contains("wrong-key"));
    }

    #[tokio::test]
    async fn non_json_body_is_decode_error() {
        let addr = FakeSteam::new(json!([]))
            .with_malformed_summary()
            .spawn()
            .await;
        let err = client(addr)
            .fetch_player_summary("test-key", STEAM_ID)
            .await
            .expect_err("html is not a summary");
        assert!(matches!(err, SteamError::Decode(_)), "{err:?}");
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn avatar_is_inlined_with_content_type() {
        let bytes = vec![7u8; 40_000];
        let fake = FakeSteam::new(json!([])).with_avatar("image/png", bytes.clone());
        let addr = fake.spawn().await;

        let outcome = client(addr)
            .fetch_avatar(&format!("http://{addr}/avatar.img"), 1024 * 1024)
            .await;
        let AvatarOutcome::Inlined(uri) = outcome else {
            panic!("expected inlined avatar, got {outcome:?}");
        };
        assert_eq!(uri.content_type(), "image/png");
        assert_eq!(uri.decode().expect("decodes"), bytes);
    }

    #[tokio::test]
    async fn streamed_avatar_without_length_is_inlined() {
        let bytes: Vec<u8> = (0..4_500u32).map(|i| (i % 256) as u8).collect();
        let fake = FakeSteam::new(json!([])).with_avatar("image/jpeg", bytes.clone());
        let addr = fake.spawn().await;

        let outcome = client(addr)
            .fetch_avatar(&format!("http://{addr}/streamed.img"), 10_000)
            .await;
        let AvatarOutcome::Inlined(uri) = outcome else {
            panic!("expected inlined avatar, got {outcome:?}");
        };
        assert_eq!(uri.decode().expect("decodes"), bytes);
    }

    #[tokio::test]
    async fn streamed_avatar_over_limit_stops_early() {
        let fake = FakeSteam::new(json!([])).with_avatar("image/jpeg", vec![9u8; 50_000]);
        let addr = fake.spawn().await;

        let outcome = client(addr)
            .fetch_avatar(&format!("http://{addr}/streamed.img"), 2_500)
            .await;
        let AvatarOutcome::Missing(AvatarMiss::TooLarge(seen)) = outcome else {
            panic!("expected size rejection, got {outcome:?}");
        };
        assert!(seen > 2_500, "reported {seen}");
        assert!(seen < 50_000, "body was read to the end: {seen}");
    }

    #[tokio::test]
    async fn avatar_failures_degrade_to_missing() {
        let fake = FakeSteam::new(json!([])).with_avatar("image/png", vec![1, 2, 3, 4]);
        let addr = fake.spawn().await;
        let client = client(addr);

        assert_eq!(
            client.fetch_avatar(&format!("http://{addr}/broken"), 1024).await,
            AvatarOutcome::Missing(AvatarMiss::Status(500))
        );
        assert_eq!(
            client.fetch_avatar("", 1024).await,
            AvatarOutcome::Missing(AvatarMiss::EmptyUrl)
        );
        assert_eq!(
            client.fetch_avatar(&format!("http://{addr}/avatar.img"), 2).await,
            AvatarOutcome::Missing(AvatarMiss::TooLarge(4))
        );
        assert!(matches!(
            client.fetch_avatar("http://127.0.0.1:1/unreachable", 1024).await,
            AvatarOutcome::Missing(AvatarMiss::Transport(_))
        ));
    }
}
