//! Leaf generation services: script, evaluation, humanization, images.
//! Each one is a single remote call wrapped in the shared retry policy.

use serde::Deserialize;
use tracing::{info, warn};

use crate::api::{with_retry, GenerationBackend, ImageRequest, Part, RetryPolicy, TextRequest};
use crate::brand::BrandPack;
use crate::error::{Result, StudioError};
use crate::prompt::image::build_image_instruction;
use crate::prompt::{
    build_evaluation_prompt, build_humanize_prompt, build_script_prompt, evaluation_schema,
    script_schema, AssetKit, ImageConfig, ScriptBrief,
};
use crate::scene::{renumber, ContentScore, ScriptScene, StoryboardImage};

pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Models {
    pub text: String,
    pub image: String,
}

impl Default for Models {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ScriptEnvelope {
    #[serde(default)]
    scenes: Vec<ScriptScene>,
}

pub struct ContentService<B> {
    backend: B,
    retry: RetryPolicy,
    models: Models,
}

impl<B: GenerationBackend> ContentService<B> {
    pub fn new(backend: B, retry: RetryPolicy, models: Models) -> Self {
        Self {
            backend,
            retry,
            models,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn request_text(&self, label: &str, prompt: String, schema: serde_json::Value) -> Result<String> {
        let request = TextRequest {
            model: self.models.text.clone(),
            prompt,
            schema: Some(schema),
        };
        with_retry(self.retry, label, || self.backend.generate_text(&request)).await
    }

    /// Produces a fresh script for `brief`. Ordinals are renumbered to
    /// 1..=N; a count that differs from the requested one is accepted.
    pub async fn generate_script(
        &self,
        brief: &ScriptBrief,
        brand: &BrandPack,
    ) -> Result<Vec<ScriptScene>> {
        let prompt = build_script_prompt(brief, brand)?;
        info!(
            "Generating {} script ({} scenes requested)",
            brief.content_type, prompt.expected_scenes
        );

        let raw = self.request_text("script", prompt.text, prompt.schema).await?;
        let mut scenes = parse_scenes(&raw)?;
        if scenes.is_empty() {
            return Err(StudioError::EmptyScript);
        }
        if scenes.len() != prompt.expected_scenes as usize {
            warn!(
                "Model returned {} scenes, {} were requested",
                scenes.len(),
                prompt.expected_scenes
            );
        }

        renumber(&mut scenes);
        info!("Generated script with {} scenes", scenes.len());
        Ok(scenes)
    }

    pub async fn evaluate(&self, scenes: &[ScriptScene]) -> Result<ContentScore> {
        if scenes.is_empty() {
            return Err(StudioError::EmptyScript);
        }
        let prompt = build_evaluation_prompt(scenes);
        let raw = self.request_text("evaluation", prompt, evaluation_schema()).await?;
        let score: ContentScore = serde_json::from_str(clean_json(&raw))?;
        info!("Script scored {}/100", score.score);
        Ok(score)
    }

    /// Rewrites the script in the given style. The result must keep the
    /// same number of scenes.
    pub async fn humanize(
        &self,
        scenes: &[ScriptScene],
        style: &str,
        persona: &str,
    ) -> Result<Vec<ScriptScene>> {
        let prompt = build_humanize_prompt(scenes, style, persona)?;
        info!("Humanizing {} scenes with style '{}'", scenes.len(), style);

        let raw = self.request_text("humanize", prompt, script_schema()).await?;
        let mut rewritten = parse_scenes(&raw)?;
        if rewritten.len() != scenes.len() {
            return Err(StudioError::ScriptShapeChanged {
                expected: scenes.len(),
                actual: rewritten.len(),
            });
        }

        renumber(&mut rewritten);
        Ok(rewritten)
    }

    /// Renders one still for the 1-based scene `ordinal`.
    pub async fn generate_image(
        &self,
        ordinal: u32,
        visual_cue: &str,
        assets: &AssetKit,
        config: &ImageConfig,
    ) -> Result<StoryboardImage> {
        if assets.mascot.is_none() {
            return Err(StudioError::validation(
                "Vui lòng tải lên mascot Ziino trước khi tạo nội dung.",
            ));
        }

        let mut parts: Vec<Part> = assets
            .references()
            .map(|r| Part::inline(r.mime_type.as_str(), r.data.as_str()))
            .collect();
        parts.push(Part::text(build_image_instruction(visual_cue, config)));

        let request = ImageRequest {
            model: self.models.image.clone(),
            parts,
        };
        let label = format!("image {ordinal}");
        let image = with_retry(self.retry, &label, || self.backend.generate_image(&request)).await?;

        match image {
            Some(data) => {
                info!("Scene {} image ready ({})", ordinal, data.mime_type);
                Ok(StoryboardImage::new(data.mime_type, data.data))
            }
            None => {
                warn!("Scene {} response carried no image", ordinal);
                Err(StudioError::ImageGenerationError { scene: ordinal })
            }
        }
    }
}

fn parse_scenes(raw: &str) -> Result<Vec<ScriptScene>> {
    let envelope: ScriptEnvelope = serde_json::from_str(clean_json(raw))?;
    Ok(envelope.scenes)
}

/// Strips a surrounding markdown code fence, if any.
pub fn clean_json(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
