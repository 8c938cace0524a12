//! Boundary to the hosted generative model.
//!
//! Every call is exactly one outbound request: no retries, no caching, no
//! timeouts beyond what the HTTP client does on its own.

mod gemini;

use async_trait::async_trait;

pub use gemini::{GeminiGateway, NO_TEXT_FALLBACK};

use crate::error::GatewayError;
use crate::image::ImageBuffer;

#[async_trait]
pub trait Gateway: Send + Sync {
    /// Sends the instruction (and the image, when there is one) to an
    /// image-capable model and returns the first image it produced.
    async fn transform_image(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<ImageBuffer, GatewayError>;

    /// Asks a text model for a caption or story, optionally about an image.
    async fn generate_text(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<String, GatewayError>;
}

/// Where the API key comes from. Resolved on every call, so a key added to the
/// environment after start-up is picked up and a missing key only fails the
/// request at hand.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// First non-empty variable wins.
    Env(Vec<String>),
    Fixed(Option<String>),
}

impl KeySource {
    pub fn resolve(&self) -> Option<String> {
        match self {
            KeySource::Env(vars) => vars
                .iter()
                .filter_map(|var| std::env::var(var).ok())
                .find(|value| !value.trim().is_empty()),
            KeySource::Fixed(key) => key.clone().filter(|k| !k.trim().is_empty()),
        }
    }
}

impl Default for KeySource {
    fn default() -> Self {
        KeySource::Env(vec!["GEMINI_API_KEY".to_string(), "API_KEY".to_string()])
    }
}
