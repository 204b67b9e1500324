//! Inline image transport. Images travel to and from clients as
//! `data:<content-type>;base64,<payload>` strings and are stored as raw bytes
//! plus a content type.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

/// Avatar shown for users without a stored profile image.
pub const DEFAULT_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/847/847969.png";

/// Placeholder for adopted pets whose image is no longer available.
pub const DEFAULT_PET_IMAGE: &str = "/images/pet.jpg";

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("not a data URI")]
    MissingScheme,
    #[error("data URI has no payload")]
    MissingPayload,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Raw image bytes with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub content_type: String,
    pub data: Vec<u8>,
}

impl InlineImage {
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
        }
    }

    /// Parse a `data:` URI into bytes and content type.
    pub fn from_data_uri(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPayload)?;
        let content_type = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;
        let data = B64.decode(payload.trim())?;
        Ok(Self::new(content_type, data))
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.content_type, &self.data)
    }
}

pub fn encode_data_uri(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, B64.encode(data))
}

/// Encode an optional stored image, returning `None` when either half is
/// missing.
pub fn stored_image_uri(data: Option<&[u8]>, content_type: Option<&str>) -> Option<String> {
    match (data, content_type) {
        (Some(data), Some(ct)) if !data.is_empty() => Some(encode_data_uri(ct, data)),
        _ => None,
    }
}
