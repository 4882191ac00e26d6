//! Card rendering. Both formats share one layout: the raster path
//! rasterizes the exact markup the vector path emits.

use std::sync::Arc;

use resvg::usvg::fontdb;
use tracing::info;

use crate::models::card::CardModel;

mod png;
mod svg;

pub const CARD_WIDTH: u32 = 520;
pub const CARD_HEIGHT: u32 = 120;
pub const CARD_RADIUS: u32 = 14;
pub const CARD_BACKGROUND: &str = "#0b1a2b";
pub const AVATAR_OFFSET: u32 = 16;
pub const AVATAR_SIZE: u32 = 88;
pub const AVATAR_RADIUS: u32 = 10;
pub const AVATAR_PLACEHOLDER: &str = "#1a3655";

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("card markup could not be parsed: {0}")]
    Parse(#[from] resvg::usvg::Error),
    #[error("failed to allocate the card pixmap")]
    Pixmap,
    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFormat {
    Svg,
    Png,
}

impl CardFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml; charset=utf-8",
            Self::Png => "image/png",
        }
    }
}

/// Holds the font database the rasterizer needs. Loading system fonts is
/// slow, so this is built once per process.
#[derive(Clone)]
pub struct CardRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl CardRenderer {
    pub fn with_system_fonts() -> Self {
        let mut database = fontdb::Database::new();
        database.load_system_fonts();
        info!("Loaded {} font faces for PNG rendering", database.len());
        Self::with_fonts(database)
    }

    pub fn with_fonts(database: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(database),
        }
    }

    pub fn render(&self, card: &CardModel, format: CardFormat) -> Result<Vec<u8>, RenderError> {
        let markup = svg::render_svg(card);
        match format {
            CardFormat::Svg => Ok(markup.into_bytes()),
            CardFormat::Png => png::rasterize(&markup, &self.fontdb),
        }
    }
}
