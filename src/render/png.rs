use std::sync::Arc;

use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{self, fontdb};

use super::{CARD_HEIGHT, CARD_WIDTH, RenderError};

pub(super) fn rasterize(markup: &str, fonts: &Arc<fontdb::Database>) -> Result<Vec<u8>, RenderError> {
    let options = usvg::Options {
        fontdb: Arc::clone(fonts),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(markup, &options)?;

    let mut pixmap = Pixmap::new(CARD_WIDTH, CARD_HEIGHT).ok_or(RenderError::Pixmap)?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
    pixmap
        .encode_png()
        .map_err(|err| RenderError::Encode(err.to_string()))
}
