pub mod gemini;
pub mod retry;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

pub use gemini::GeminiClient;
pub use retry::{with_retry, RetryPolicy};

/// Base64 payload tagged with its mime type, as used on the wire in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// One piece of a multimodal request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

/// Structured-output text request. `schema` constrains the JSON the model
/// returns.
#[derive(Debug, Clone)]
pub struct TextRequest {
    pub model: String,
    pub prompt: String,
    pub schema: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub parts: Vec<Part>,
}

/// The generative service as seen by the rest of the crate.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Returns the raw text of the first candidate.
    async fn generate_text(&self, request: &TextRequest) -> Result<String>;

    /// Returns the first image part of the response, if the model produced one.
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineData>>;
}

#[async_trait]
impl<T: GenerationBackend + ?Sized> GenerationBackend for Arc<T> {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        (**self).generate_text(request).await
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineData>> {
        (**self).generate_image(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parts_serialize_in_wire_shape() {
        let parts = vec![Part::inline("image/png", "AAAA"), Part::text("hello")];
        let value = serde_json::to_value(&parts).unwrap();
        assert_eq!(value[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(value[0]["inlineData"]["data"], "AAAA");
        assert_eq!(value[1]["text"], "hello");
    }
}
