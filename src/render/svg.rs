use std::borrow::Cow;

use super::{
    AVATAR_OFFSET, AVATAR_PLACEHOLDER, AVATAR_RADIUS, AVATAR_SIZE, CARD_BACKGROUND, CARD_HEIGHT,
    CARD_RADIUS, CARD_WIDTH,
};
use crate::models::card::CardModel;

const FONT_FAMILY: &str = "system-ui, -apple-system, 'Segoe UI', Roboto, sans-serif";

/// XML 1.0 `Char` production. Surrogates cannot occur in a Rust `char`.
fn is_xml_char(ch: char) -> bool {
    matches!(ch, '\t' | '\n' | '\r' | '\u{20}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

/// Escapes the five characters that are significant in XML text and
/// attribute values. Characters XML cannot carry at all become U+FFFD.
pub fn escape_markup(value: &str) -> Cow<'_, str> {
    if value
        .chars()
        .all(|ch| is_xml_char(ch) && !matches!(ch, '&' | '<' | '>' | '"' | '\''))
    {
        return Cow::Borrowed(value);
    }
    let mut escaped = String::with_capacity(value.len() + 16);
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other if !is_xml_char(other) => escaped.push(char::REPLACEMENT_CHARACTER),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

pub(super) fn render_svg(card: &CardModel) -> String {
    let avatar = match &card.avatar {
        Some(uri) => format!(
            r#"<image href="{href}" x="{AVATAR_OFFSET}" y="{AVATAR_OFFSET}" width="{AVATAR_SIZE}" height="{AVATAR_SIZE}" clip-path="url(#clip)"/>"#,
            href = escape_markup(uri.as_str()),
        ),
        None => format!(
            r#"<rect x="{AVATAR_OFFSET}" y="{AVATAR_OFFSET}" width="{AVATAR_SIZE}" height="{AVATAR_SIZE}" rx="{AVATAR_RADIUS}" fill="{AVATAR_PLACEHOLDER}"/>"#
        ),
    };

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <clipPath id="clip">
      <rect x="{AVATAR_OFFSET}" y="{AVATAR_OFFSET}" width="{AVATAR_SIZE}" height="{AVATAR_SIZE}" rx="{AVATAR_RADIUS}" ry="{AVATAR_RADIUS}"/>
    </clipPath>
  </defs>
  <rect x="0" y="0" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" rx="{CARD_RADIUS}" fill="{CARD_BACKGROUND}"/>
  {avatar}
  <text x="120" y="46" fill="#e7f0ff" font-size="18" font-weight="700" font-family="{FONT_FAMILY}">{name}</text>
  <circle cx="128" cy="66" r="5" fill="{color}"/>
  <text x="140" y="70" fill="#c9d6e8" font-size="13" font-family="{FONT_FAMILY}">{status}</text>
  <text x="500" y="24" fill="#7ea2c8" font-size="11" text-anchor="end" font-family="{FONT_FAMILY}">{watermark}</text>
</svg>
"##,
        name = escape_markup(&card.name),
        color = card.indicator_color,
        status = escape_markup(&card.status),
        watermark = escape_markup(&card.watermark),
    )
}
