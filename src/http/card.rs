use axum::Router;
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tracing::info;

use crate::models::card::CardModel;
use crate::render::CardFormat;
use crate::state::AppState;
use crate::steam::AvatarOutcome;

use super::CardError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/steam-card.svg", get(svg_card))
        .route("/steam-card.png", get(png_card))
}

async fn svg_card(State(state): State<AppState>) -> Result<Response, CardError> {
    render_card(&state, CardFormat::Svg).await
}

async fn png_card(State(state): State<AppState>) -> Result<Response, CardError> {
    render_card(&state, CardFormat::Png).await
}

/// Fetches the configured profile, inlines its avatar when possible and
/// renders it in `format`.
async fn render_card(state: &AppState, format: CardFormat) -> Result<Response, CardError> {
    let config = &state.config;
    let api_key = config.api_key().ok_or(CardError::MissingCredential)?;

    let summary = state
        .steam
        .fetch_player_summary(api_key, &config.steam.steam_id)
        .await
        .map_err(CardError::Upstream)?
        .ok_or(CardError::ProfileNotFound)?;

    let avatar = state
        .steam
        .fetch_avatar(&summary.avatarfull, config.card.max_avatar_bytes)
        .await;
    let inlined = matches!(avatar, AvatarOutcome::Inlined(_));
    let card = CardModel::from_summary(&summary, avatar.into_data_uri(), &config.card);

    let body = match format {
        CardFormat::Svg => state.renderer.render(&card, format),
        // Rasterizing decodes the inlined avatar; keep it off the async workers.
        CardFormat::Png => {
            let renderer = state.renderer.clone();
            tokio::task::spawn_blocking(move || renderer.render(&card, format))
                .await
                .map_err(CardError::RenderTask)?
        }
    }
    .map_err(CardError::Render)?;
    info!(
        ?format,
        steam_id = %summary.steamid,
        persona_state = summary.personastate,
        avatar = inlined,
        bytes = body.len(),
        "Rendered card"
    );

    Ok((
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CACHE_CONTROL, config.card.cache_control()),
        ],
        body,
    )
        .into_response())
}
