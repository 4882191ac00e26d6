use crate::avatar::DataUri;
use crate::config::RenderConfig;
use crate::models::player::PlayerSummary;
use crate::presence::{PersonaState, status_text};

/// Everything a renderer needs, already resolved. Text is unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardModel {
    pub name: String,
    pub status: String,
    pub indicator_color: &'static str,
    pub avatar: Option<DataUri>,
    pub watermark: String,
}

impl CardModel {
    pub fn from_summary(
        summary: &PlayerSummary,
        avatar: Option<DataUri>,
        config: &RenderConfig,
    ) -> Self {
        let state = PersonaState::from_code(summary.personastate);
        let name = match summary.personaname.trim() {
            "" => config.fallback_name.clone(),
            trimmed => trimmed.to_string(),
        };
        Self {
            name,
            status: status_text(state, summary.gameextrainfo.as_deref()),
            indicator_color: state.indicator_color(),
            avatar,
            watermark: config.watermark.clone(),
        }
    }
}
