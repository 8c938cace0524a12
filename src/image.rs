use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::ImageBufferError;

/// Encoded image bytes paired with their MIME type.
///
/// The bytes are never decoded here; they are only forwarded to the model or
/// back to the browser. Cloning shares the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    bytes: Arc<[u8]>,
    mime_type: String,
}

impl ImageBuffer {
    pub fn new(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: Arc::from(bytes),
            mime_type: mime_type.into(),
        }
    }

    pub fn from_base64(data: &str, mime_type: impl Into<String>) -> Result<Self, ImageBufferError> {
        let bytes = general_purpose::STANDARD.decode(data.trim())?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&*self.bytes)
    }
}

impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

// Snapshots describe images without carrying them; the page fetches the bytes
// from their own endpoint.
impl Serialize for ImageBuffer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("ImageBuffer", 2)?;
        s.serialize_field("mimeType", &self.mime_type)?;
        s.serialize_field("size", &self.bytes.len())?;
        s.end()
    }
}
