use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::render::RenderError;
use crate::state::AppState;
use crate::steam::SteamError;

mod card;

pub fn router(state: AppState) -> Router {
    // Badges are embedded from arbitrary pages.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_live))
        .nest("/api", card::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_live(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "live",
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_seconds: u64,
}

/// Failures a card request can end in. The display text is the exact
/// plain-text body sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Missing STEAM_WEB_API_KEY")]
    MissingCredential,
    #[error("Steam profile not found")]
    ProfileNotFound,
    #[error("Steam API request failed")]
    Upstream(#[source] SteamError),
    #[error("Failed to render card")]
    Render(#[source] RenderError),
    #[error("Failed to render card")]
    RenderTask(#[source] tokio::task::JoinError),
}

impl CardError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::Render(_) | Self::RenderTask(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ProfileNotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::MissingCredential => error!("Card request rejected: API key is not configured"),
            Self::ProfileNotFound => warn!("Card request failed: {self}"),
            Self::Upstream(source) => error!("Card request failed: {self}: {source}"),
            Self::Render(source) => error!("Card request failed: {self}: {source}"),
            Self::RenderTask(source) => error!("Card request failed: {self}: {source}"),
        }
        (
            status,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
