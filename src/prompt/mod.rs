//! Instruction building for the text and image models.
//!
//! Everything that differs between content types (how many scenes, which
//! inputs are required, which template, how assets are named) is read from
//! one [`ContentRules`] row per type instead of being re-decided at each
//! call site.

pub mod catalog;
pub mod image;
pub mod templates;

use serde_json::{json, Value};

use crate::brand::BrandPack;
use crate::error::{Result, StudioError};
use crate::scene::{ContentType, ScriptScene};

pub use image::{AspectRatio, AssetKit, ImageApplication, ImageConfig, ReferenceImage};
pub use templates::PromptInputs;

pub const DEFAULT_PERSONA: &str = "Mặc định là Ziino, một người bạn thân hài hước của người xem.";

#[derive(Debug, Clone, PartialEq)]
pub struct HookConfig {
    /// Hook archetype id, see [`catalog::HOOK_TEMPLATES`].
    pub style: String,
    pub tone: String,
    /// Target length of a video hook, in seconds.
    pub length: u32,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            style: "pov".to_string(),
            tone: catalog::TONES[0].to_string(),
            length: 15,
        }
    }
}

/// Everything the user typed or picked before asking for a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptBrief {
    pub content_type: ContentType,
    pub trend_idea: String,
    /// The main ad script; act-three resolution for films.
    pub secondary_script: String,
    pub hook: HookConfig,
    pub humanization_style: String,
    pub persona: String,
    /// Number of posts, stickers or panels for the explicitly counted types.
    pub post_count: u32,
    /// Film length in seconds.
    pub film_length: u32,
}

impl Default for ScriptBrief {
    fn default() -> Self {
        Self {
            content_type: ContentType::Video,
            trend_idea: String::new(),
            secondary_script: String::new(),
            hook: HookConfig::default(),
            humanization_style: catalog::HUMANIZATION_STYLES[0].to_string(),
            persona: String::new(),
            post_count: 3,
            film_length: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    HookLength,
    FilmLength,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneCount {
    /// `ceil(seconds / seconds_per_scene)` of a duration input.
    PerSeconds {
        source: DurationSource,
        seconds_per_scene: f64,
    },
    /// The user's count, used as-is within bounds.
    Explicit { min: u32, max: u32 },
}

pub struct ContentRules {
    pub content_type: ContentType,
    pub title: &'static str,
    /// Heading used for each unit in exported transcripts.
    pub unit_label: &'static str,
    /// Noun used in validation messages.
    pub count_noun: &'static str,
    pub scene_count: SceneCount,
    pub requires_secondary_script: bool,
    pub asset_prefix: &'static str,
    pub asset_extension: &'static str,
    pub template: fn(&PromptInputs<'_>) -> String,
}

static RULES: [ContentRules; 5] = [
    ContentRules {
        content_type: ContentType::Video,
        title: "Video Hook",
        unit_label: "SCENE",
        count_noun: "cảnh",
        scene_count: SceneCount::PerSeconds {
            source: DurationSource::HookLength,
            seconds_per_scene: 2.5,
        },
        requires_secondary_script: true,
        asset_prefix: "scene",
        asset_extension: "jpg",
        template: templates::video,
    },
    ContentRules {
        content_type: ContentType::Social,
        title: "Bộ ảnh Social",
        unit_label: "POST",
        count_noun: "bài đăng",
        scene_count: SceneCount::Explicit { min: 1, max: 10 },
        requires_secondary_script: true,
        asset_prefix: "post",
        asset_extension: "jpg",
        template: templates::social,
    },
    ContentRules {
        content_type: ContentType::Film,
        title: "Phim Cinematics",
        unit_label: "SCENE",
        count_noun: "cảnh",
        scene_count: SceneCount::PerSeconds {
            source: DurationSource::FilmLength,
            seconds_per_scene: 5.0,
        },
        requires_secondary_script: true,
        asset_prefix: "scene",
        asset_extension: "jpg",
        template: templates::film,
    },
    ContentRules {
        content_type: ContentType::Sticker,
        title: "Bộ Sticker",
        unit_label: "STICKER",
        count_noun: "sticker",
        scene_count: SceneCount::Explicit { min: 1, max: 12 },
        requires_secondary_script: false,
        asset_prefix: "sticker",
        asset_extension: "png",
        template: templates::sticker,
    },
    ContentRules {
        content_type: ContentType::Comic,
        title: "Bộ truyện tranh",
        unit_label: "PANEL",
        count_noun: "khung truyện",
        scene_count: SceneCount::Explicit { min: 2, max: 12 },
        requires_secondary_script: false,
        asset_prefix: "panel",
        asset_extension: "jpg",
        template: templates::comic,
    },
];

impl ContentType {
    pub fn rules(&self) -> &'static ContentRules {
        match self {
            ContentType::Video => &RULES[0],
            ContentType::Social => &RULES[1],
            ContentType::Film => &RULES[2],
            ContentType::Sticker => &RULES[3],
            ContentType::Comic => &RULES[4],
        }
    }
}

impl ContentRules {
    /// File name of the image for the 1-based `ordinal`, e.g. `post_3.jpg`.
    pub fn asset_file_name(&self, ordinal: usize) -> String {
        format!("{}_{}.{}", self.asset_prefix, ordinal, self.asset_extension)
    }
}

impl ScriptBrief {
    pub fn rules(&self) -> &'static ContentRules {
        self.content_type.rules()
    }

    fn seconds(&self, source: DurationSource) -> u32 {
        match source {
            DurationSource::HookLength => self.hook.length,
            DurationSource::FilmLength => self.film_length,
        }
    }

    /// Number of scenes the model is asked to produce.
    pub fn scene_count(&self) -> u32 {
        match self.rules().scene_count {
            SceneCount::PerSeconds {
                source,
                seconds_per_scene,
            } => (f64::from(self.seconds(source)) / seconds_per_scene).ceil() as u32,
            SceneCount::Explicit { .. } => self.post_count,
        }
    }

    pub fn persona_or_default(&self) -> &str {
        persona_or_default(&self.persona)
    }

    /// Input checks that run before any remote call.
    pub fn validate(&self) -> Result<()> {
        let rules = self.rules();

        if self.trend_idea.trim().is_empty() {
            return Err(StudioError::validation("Vui lòng nhập ý tưởng hoặc trend."));
        }
        if rules.requires_secondary_script && self.secondary_script.trim().is_empty() {
            return Err(StudioError::validation("Vui lòng nhập kịch bản quảng cáo."));
        }

        match rules.scene_count {
            SceneCount::PerSeconds { source, .. } => {
                if self.seconds(source) == 0 {
                    return Err(StudioError::validation("Thời lượng phải lớn hơn 0 giây."));
                }
            }
            SceneCount::Explicit { min, max } => {
                if !(min..=max).contains(&self.post_count) {
                    return Err(StudioError::validation(format!(
                        "Số lượng {} phải nằm trong khoảng {}-{}.",
                        rules.count_noun, min, max
                    )));
                }
            }
        }

        Ok(())
    }
}

pub fn persona_or_default(persona: &str) -> &str {
    if persona.trim().is_empty() {
        DEFAULT_PERSONA
    } else {
        persona
    }
}

/// Instruction text plus the output schema the model must follow.
#[derive(Debug, Clone)]
pub struct ScriptPrompt {
    pub text: String,
    pub schema: Value,
    pub expected_scenes: u32,
}

pub fn build_script_prompt(brief: &ScriptBrief, brand: &BrandPack) -> Result<ScriptPrompt> {
    brief.validate()?;
    let expected_scenes = brief.scene_count();
    let inputs = PromptInputs {
        brief,
        brand,
        scene_count: expected_scenes,
        persona: brief.persona_or_default(),
        hook_archetype: catalog::hook_archetype(&brief.hook.style),
    };

    Ok(ScriptPrompt {
        text: (brief.rules().template)(&inputs),
        schema: script_schema(),
        expected_scenes,
    })
}

/// Asks the model to grade a script against the six humanization factors.
pub fn build_evaluation_prompt(scenes: &[ScriptScene]) -> String {
    let script_text = scenes
        .iter()
        .map(|s| {
            if s.is_post() {
                let body = s.caption.as_deref().filter(|c| !c.is_empty()).unwrap_or(s.line.as_str());
                format!("Bài đăng {}: {}", s.index, body)
            } else {
                format!("Cảnh {}: {} ({})", s.index, s.line, s.character_emotion)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"BẠN LÀ MỘT CHUYÊN GIA BIÊN TẬP NỘI DUNG KHÓ TÍNH.
Nhiệm vụ của bạn là đánh giá kịch bản sau đây dựa trên 6 yếu tố nhân hóa để xem nó có giống người viết không. Chấm điểm trên thang 100.

KỊCH BẢN CẦN ĐÁNH GIÁ:
---
{script_text}
---

{factors}

Hãy đánh giá kịch bản một cách khách quan dựa trên 6 yếu tố trên và trả về kết quả theo JSON schema."#,
        factors = templates::HUMANIZATION_FACTORS,
    )
}

/// Asks the model to restyle a script while keeping its structure.
pub fn build_humanize_prompt(scenes: &[ScriptScene], style: &str, persona: &str) -> Result<String> {
    let script_json = serde_json::to_string_pretty(scenes)?;
    Ok(format!(
        r#"BẠN LÀ MỘT CHUYÊN GIA "NHÂN HÓA" NỘI DUNG AI.
Nhiệm vụ: Viết lại kịch bản JSON sau đây để nó nghe "người" hơn, lôi cuốn hơn, dựa trên Phong cách và Persona được cung cấp.

KỊCH BẢN GỐC (JSON):
---
{script_json}
---

{factors}

YÊU CẦU VIẾT LẠI:
- **Phong cách:** {style}
- **Persona (Nhân vật kể chuyện):** {persona}
- **Áp dụng 6 yếu tố nhân hóa:** Thấm nhuần tinh thần của 6 yếu tố trên vào từng câu chữ.
- **QUAN TRỌNG:** Giữ nguyên cấu trúc JSON, số lượng cảnh ({count}) và tất cả các trường dữ liệu. Chỉ thay đổi giá trị của các trường (đặc biệt là 'line', 'caption', 'hashtags', 'character_emotion', 'action'). Trả về JSON theo schema kịch bản gốc."#,
        factors = templates::HUMANIZATION_FACTORS,
        persona = persona_or_default(persona),
        count = scenes.len(),
    ))
}

pub fn script_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scenes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "scene": { "type": "NUMBER", "description": "Số thứ tự cảnh, bắt đầu từ 1." },
                        "line": { "type": "STRING", "description": "Lời thoại hoặc text hiển thị trong cảnh. Ngắn gọn, như caption meme (tối đa 18 từ)." },
                        "duration_s": { "type": "NUMBER", "description": "Thời lượng cảnh (giây)." },
                        "visual_cue": { "type": "STRING", "description": "Mô tả hình ảnh cực kỳ chi tiết, sống động cho keyframe. Tập trung vào biểu cảm \"meme-worthy\" của Ziino và bối cảnh." },
                        "sfx": { "type": "STRING", "description": "Âm thanh hiệu ứng (SFX), ví dụ: \"whoosh\", \"sad violin\", \"ting ting\"." },
                        "camera_angle": { "type": "STRING", "description": "Góc máy quay, ví dụ: \"Cận cảnh mặt Ziino\", \"Góc rộng toàn cảnh\", \"POV từ mắt Ziino\"." },
                        "character_emotion": { "type": "STRING", "description": "Cảm xúc của nhân vật Ziino." },
                        "action": { "type": "STRING", "description": "Hành động chính của nhân vật trong cảnh." },
                        "caption": { "type": "STRING", "description": "Social: nội dung caption cho bài đăng. Với video có thể bỏ trống." },
                        "hashtags": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "Social: mảng hashtags. Với video có thể bỏ trống." },
                        "supporting_character_description": { "type": "STRING", "description": "Mô tả ngắn gọn nhân vật phụ trong cảnh, nếu có." }
                    },
                    "required": ["scene", "line", "duration_s", "visual_cue", "sfx", "camera_angle", "character_emotion", "action"]
                }
            }
        },
        "required": ["scenes"]
    })
}

pub fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "NUMBER", "description": "Điểm số từ 0-100 đánh giá mức độ \"người\" của nội dung." },
            "feedback": { "type": "STRING", "description": "Nhận xét tổng quan, ngắn gọn về kịch bản." },
            "suggestions": { "type": "ARRAY", "items": { "type": "STRING" }, "description": "3 gợi ý cụ thể để cải thiện kịch bản, làm cho nó giống người hơn." }
        },
        "required": ["score", "feedback", "suggestions"]
    })
}
