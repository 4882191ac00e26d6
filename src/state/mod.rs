use std::sync::Arc;
use std::time::Instant;

use crate::config::CardConfig;
use crate::render::CardRenderer;
use crate::steam::SteamClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CardConfig>,
    pub steam: SteamClient,
    pub renderer: CardRenderer,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Arc<CardConfig>, steam: SteamClient, renderer: CardRenderer) -> Self {
        Self {
            config,
            steam,
            renderer,
            start_time: Instant::now(),
        }
    }
}
