// Gemini `generateContent` over plain REST.

use std::borrow::Cow;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::{Gateway, KeySource};
use crate::config::Config;
use crate::error::GatewayError;
use crate::image::ImageBuffer;

/// Returned by [`Gateway::generate_text`] when the model answers with no text.
pub const NO_TEXT_FALLBACK: &str = "No text generated.";

#[derive(Debug, Clone)]
pub struct GeminiGateway {
    client: reqwest::Client,
    base_url: String,
    image_model: String,
    text_model: String,
    key: KeySource,
}

impl GeminiGateway {
    pub fn new(config: &Config, key: KeySource) -> Self {
        Self::with_client(reqwest::Client::new(), config, key)
    }

    pub fn with_client(client: reqwest::Client, config: &Config, key: KeySource) -> Self {
        Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            image_model: config.image_model.clone(),
            text_model: config.text_model.clone(),
            key,
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    async fn call(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part<'_>>,
    ) -> Result<GenerateResponse, GatewayError> {
        let payload = GenerateRequest {
            contents: vec![Content { parts }],
        };

        info!(model, "sending request to Gemini");

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Gemini responded");

        if !status.is_success() {
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body: body.chars().take(500).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            debug!(error = %e, "undecodable Gemini body");
            GatewayError::MalformedResponse
        })
    }
}

#[async_trait]
impl Gateway for GeminiGateway {
    async fn transform_image(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<ImageBuffer, GatewayError> {
        let api_key = self.key.resolve().ok_or(GatewayError::MissingCredential)?;

        let mut parts = Vec::with_capacity(2);
        if let Some(image) = image {
            parts.push(Part::inline(image));
        }
        parts.push(Part::Text { text: Cow::Borrowed(instruction) });

        let result = self
            .call(&api_key, &self.image_model, parts)
            .await
            .and_then(first_image);

        if let Err(e) = &result {
            error!(error = %e, "Gemini image request failed");
        }
        result
    }

    async fn generate_text(
        &self,
        instruction: &str,
        image: Option<&ImageBuffer>,
    ) -> Result<String, GatewayError> {
        let api_key = self.key.resolve().ok_or(GatewayError::MissingCredential)?;

        let parts = match image {
            Some(image) => vec![
                Part::inline(image),
                Part::Text {
                    text: Cow::Owned(format!(
                        "Based on this image and this context: \"{}\", write a creative and engaging caption or short story.",
                        instruction
                    )),
                },
            ],
            None => vec![Part::Text { text: Cow::Borrowed(instruction) }],
        };

        match self.call(&api_key, &self.text_model, parts).await {
            Ok(response) => {
                let text = response.text();
                if text.is_empty() {
                    Ok(NO_TEXT_FALLBACK.to_string())
                } else {
                    Ok(text)
                }
            }
            Err(e) => {
                error!(error = %e, "Gemini text request failed");
                Err(GatewayError::Writing)
            }
        }
    }
}

fn first_image(response: GenerateResponse) -> Result<ImageBuffer, GatewayError> {
    let parts = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content)
        .and_then(|c| c.parts)
        .ok_or(GatewayError::MalformedResponse)?;

    let inline = parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or(GatewayError::NoImage)?;

    ImageBuffer::from_base64(&inline.data, inline.mime_type).map_err(|e| {
        debug!(error = %e, "inline image is not valid base64");
        GatewayError::MalformedResponse
    })
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: Cow<'a, str>,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlinePayload<'a>,
    },
}

impl<'a> Part<'a> {
    fn inline(image: &'a ImageBuffer) -> Self {
        Part::Inline {
            inline_data: InlinePayload {
                mime_type: image.mime_type(),
                data: image.to_base64(),
            },
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlinePayload<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

impl GenerateResponse {
    /// Text parts of the first candidate, concatenated.
    fn text(&self) -> String {
        self.candidates
            .as_deref()
            .and_then(|c| c.first())
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.as_deref())
            .map(|parts| {
                parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    thought: Option<bool>,
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: String,
    data: String,
}
