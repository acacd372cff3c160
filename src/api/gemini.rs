use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{GenerationBackend, ImageRequest, InlineData, Part, TextRequest};
use crate::error::{Result, StudioError};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: &'a [Part],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<[&'static str; 2]>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    fn first_image(&self) -> Option<&InlineData> {
        self.parts()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| d.mime_type.starts_with("image/"))
    }
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest<'_>,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(StudioError::ApiError {
                status: status.as_u16(),
                message: extract_error_message(&error_text),
            });
        }

        Ok(response.json().await?)
    }
}

/// Pulls `error.message` out of a JSON error body, falling back to the raw
/// text.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        info!("Requesting text from {}", request.model);

        let parts = [Part::text(request.prompt.as_str())];
        let body = GenerateContentRequest {
            contents: vec![Content { parts: &parts }],
            generation_config: request.schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(schema),
                response_modalities: None,
            }),
        };

        let response = self.generate_content(&request.model, &body).await?;
        response
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| StudioError::MalformedResponse("no text part in response".to_string()))
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineData>> {
        info!(
            "Requesting image from {} with {} parts",
            request.model,
            request.parts.len()
        );

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: &request.parts,
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(["IMAGE", "TEXT"]),
            }),
        };

        let response = self.generate_content(&request.model, &body).await?;
        Ok(response.first_image().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_request_asks_for_json_under_schema() {
        let schema = json!({ "type": "OBJECT" });
        let parts = [Part::text("viết kịch bản")];
        let body = GenerateContentRequest {
            contents: vec![Content { parts: &parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(&schema),
                response_modalities: None,
            }),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "viết kịch bản");
        assert_eq!(value["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(value["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(value["generationConfig"].get("responseModalities").is_none());
    }

    #[test]
    fn picks_first_image_part_and_skips_text() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image" },
                        { "inlineData": { "mimeType": "application/octet-stream", "data": "XX" } },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBOR" } }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.first_text(), Some("Here is your image"));
        let image = response.first_image().unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBOR");
    }

    #[test]
    fn empty_candidates_yield_nothing() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_image().is_none());
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        assert_eq!(extract_error_message(body), "The model is overloaded.");
        assert_eq!(extract_error_message(" upstream reset \n"), "upstream reset");
    }
}
