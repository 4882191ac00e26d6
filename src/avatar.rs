use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

pub const DEFAULT_AVATAR_CONTENT_TYPE: &str = "image/jpeg";

/// Bytes fed to the encoder per call. Must stay a multiple of 3 so every
/// chunk but the last encodes without padding.
pub const ENCODE_CHUNK_BYTES: usize = 3 * 0x2000;

const _: [(); 0] = [(); ENCODE_CHUNK_BYTES % 3];

const MAX_CONTENT_TYPE_LEN: usize = 64;

/// A self-contained `data:` reference for an inlined image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri(String);

impl DataUri {
    pub fn encode(content_type: &str, bytes: &[u8]) -> Self {
        let content_type = normalize_content_type(Some(content_type));
        let prefix = format!("data:{content_type};base64,");
        let mut uri = String::with_capacity(prefix.len() + bytes.len().div_ceil(3) * 4);
        uri.push_str(&prefix);
        for chunk in bytes.chunks(ENCODE_CHUNK_BYTES) {
            BASE64_STANDARD.encode_string(chunk, &mut uri);
        }
        Self(uri)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl DataUri {
    pub fn content_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(content_type, _)| content_type)
            .unwrap_or(DEFAULT_AVATAR_CONTENT_TYPE)
    }

    pub fn decode(&self) -> anyhow::Result<Vec<u8>> {
        let (_, payload) = self
            .0
            .split_once(";base64,")
            .ok_or_else(|| anyhow::anyhow!("Data URI is missing its base64 marker"))?;
        BASE64_STANDARD
            .decode(payload)
            .map_err(|err| anyhow::anyhow!("Failed to decode data URI payload: {err}"))
    }
}

/// Keeps only a bare `image/<subtype>` token; anything else becomes
/// `image/jpeg`. Parameters such as `; charset=` are dropped.
pub fn normalize_content_type(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return DEFAULT_AVATAR_CONTENT_TYPE.to_string();
    };
    let essence = raw.split(';').next().unwrap_or_default().trim();
    let valid = essence.len() <= MAX_CONTENT_TYPE_LEN
        && essence
            .strip_prefix("image/")
            .is_some_and(|subtype| {
                !subtype.is_empty()
                    && subtype
                        .bytes()
                        .all(|b| b.is_ascii_alphanumeric() || b"+-.".contains(&b))
            });
    if valid {
        essence.to_ascii_lowercase()
    } else {
        DEFAULT_AVATAR_CONTENT_TYPE.to_string()
    }
}
