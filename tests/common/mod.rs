#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::json;

use mascot_studio::api::{GenerationBackend, ImageRequest, InlineData, Part, RetryPolicy, TextRequest};
use mascot_studio::content::{ContentService, Models};
use mascot_studio::error::{Result, StudioError};
use mascot_studio::prompt::{AssetKit, ReferenceImage};
use mascot_studio::studio::Studio;

/// Scripted replies, consumed in order. Running out is an API error.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(u16, &'static str),
}

#[derive(Default)]
pub struct MockBackend {
    text: Mutex<VecDeque<Reply<String>>>,
    images: Mutex<VecDeque<Reply<Option<InlineData>>>>,
    text_prompts: Mutex<Vec<String>>,
    image_instructions: Mutex<Vec<String>>,
    image_reference_counts: Mutex<Vec<usize>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(self, reply: Reply<String>) -> Self {
        self.text.lock().unwrap().push_back(reply);
        self
    }

    pub fn image(self, reply: Reply<Option<InlineData>>) -> Self {
        self.images.lock().unwrap().push_back(reply);
        self
    }

    pub fn push_text(&self, reply: Reply<String>) {
        self.text.lock().unwrap().push_back(reply);
    }

    pub fn push_image(&self, reply: Reply<Option<InlineData>>) {
        self.images.lock().unwrap().push_back(reply);
    }

    pub fn text_calls(&self) -> usize {
        self.text_prompts.lock().unwrap().len()
    }

    pub fn image_calls(&self) -> usize {
        self.image_instructions.lock().unwrap().len()
    }

    pub fn text_prompts(&self) -> Vec<String> {
        self.text_prompts.lock().unwrap().clone()
    }

    pub fn image_instructions(&self) -> Vec<String> {
        self.image_instructions.lock().unwrap().clone()
    }

    pub fn image_reference_counts(&self) -> Vec<usize> {
        self.image_reference_counts.lock().unwrap().clone()
    }
}

fn resolve<T>(reply: Option<Reply<T>>) -> Result<T> {
    match reply {
        Some(Reply::Ok(value)) => Ok(value),
        Some(Reply::Fail(status, message)) => Err(StudioError::ApiError {
            status,
            message: message.to_string(),
        }),
        None => Err(StudioError::ApiError {
            status: 500,
            message: "mock has no scripted reply".to_string(),
        }),
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    async fn generate_text(&self, request: &TextRequest) -> Result<String> {
        self.text_prompts.lock().unwrap().push(request.prompt.clone());
        let reply = self.text.lock().unwrap().pop_front();
        resolve(reply)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineData>> {
        let mut references = 0;
        for part in &request.parts {
            match part {
                Part::Text { text } => self.image_instructions.lock().unwrap().push(text.clone()),
                Part::InlineData { .. } => references += 1,
            }
        }
        self.image_reference_counts.lock().unwrap().push(references);
        let reply = self.images.lock().unwrap().pop_front();
        resolve(reply)
    }
}

pub fn instant_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO)
}

pub fn studio(backend: MockBackend) -> Studio<MockBackend> {
    let mut studio = Studio::new(ContentService::new(backend, instant_retry(), Models::default()));
    studio.set_assets(mascot_only());
    studio
}

pub fn mascot_only() -> AssetKit {
    AssetKit {
        mascot: Some(ReferenceImage::new("ziino.png", "image/png", STANDARD.encode(b"mascot"))),
        ..AssetKit::default()
    }
}

/// A script reply with one scene per line. Ordinals are deliberately off
/// to exercise renumbering.
pub fn script_reply(lines: &[&str]) -> Reply<String> {
    let scenes: Vec<_> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            json!({
                "scene": (i + 1) * 10,
                "line": line,
                "duration_s": 2.5,
                "visual_cue": format!("cue {}", i + 1),
                "sfx": "whoosh",
                "camera_angle": "Close-up",
                "character_emotion": "Hào hứng",
                "action": "Nhảy"
            })
        })
        .collect();
    Reply::Ok(json!({ "scenes": scenes }).to_string())
}

/// A social-post reply: one post per caption, each with its own hashtags.
pub fn social_reply(captions: &[&str]) -> Reply<String> {
    let posts: Vec<_> = captions
        .iter()
        .enumerate()
        .map(|(i, caption)| {
            json!({
                "scene": i + 1,
                "line": "",
                "visual_cue": format!("post {}", i + 1),
                "sfx": "",
                "camera_angle": "Flat lay",
                "character_emotion": "Tự tin",
                "action": "Tạo dáng",
                "caption": caption,
                "hashtags": ["#Oniiz", format!("#Post{}", i + 1)]
            })
        })
        .collect();
    Reply::Ok(json!({ "scenes": posts }).to_string())
}

pub fn score_reply(score: u8) -> Reply<String> {
    Reply::Ok(
        json!({
            "score": score,
            "feedback": "Khá tự nhiên",
            "suggestions": ["Thêm slang", "Câu ngắn hơn", "Thêm cảm xúc"]
        })
        .to_string(),
    )
}

pub fn image_reply(payload: &[u8]) -> Reply<Option<InlineData>> {
    Reply::Ok(Some(InlineData {
        mime_type: "image/jpeg".to_string(),
        data: STANDARD.encode(payload),
    }))
}

pub fn no_image() -> Reply<Option<InlineData>> {
    Reply::Ok(None)
}

pub const UNAVAILABLE: (u16, &str) = (503, "The model is overloaded. Please try again later.");

pub fn unavailable<T>() -> Reply<T> {
    Reply::Fail(UNAVAILABLE.0, UNAVAILABLE.1)
}
