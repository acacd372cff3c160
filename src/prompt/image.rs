use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::catalog::COMIC_IMAGE_STYLES;
use crate::brand::MASCOT_NAME;
use crate::error::Result;
use crate::scene::ContentType;

/// What the generated still is for. Selects the framing directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageApplication {
    Storyboard,
    ProductShowcase,
    Meme,
    Banner,
    Sticker,
    ComicPanel,
}

impl ImageApplication {
    pub const ALL: [ImageApplication; 6] = [
        ImageApplication::Storyboard,
        ImageApplication::ProductShowcase,
        ImageApplication::Meme,
        ImageApplication::Banner,
        ImageApplication::Sticker,
        ImageApplication::ComicPanel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageApplication::Storyboard => "storyboard",
            ImageApplication::ProductShowcase => "product-showcase",
            ImageApplication::Meme => "meme",
            ImageApplication::Banner => "banner",
            ImageApplication::Sticker => "sticker",
            ImageApplication::ComicPanel => "comic-panel",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageApplication::Storyboard => "Storyboard Video",
            ImageApplication::ProductShowcase => "Ảnh sản phẩm (Showcase)",
            ImageApplication::Meme => "Ảnh Meme",
            ImageApplication::Banner => "Banner / Ảnh bìa",
            ImageApplication::Sticker => "Sticker Zalo",
            ImageApplication::ComicPanel => "Khung truyện tranh",
        }
    }

    /// The application a content type is rendered with unless overridden.
    pub fn for_content(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Video | ContentType::Film | ContentType::Social => {
                ImageApplication::Storyboard
            }
            ContentType::Sticker => ImageApplication::Sticker,
            ContentType::Comic => ImageApplication::ComicPanel,
        }
    }

    /// Framing text placed before the scene's visual cue. `style` only
    /// affects comic panels.
    pub fn directive(&self, style: Option<&str>) -> String {
        match self {
            ImageApplication::ProductShowcase => format!(
                "Create a professional e-commerce product showcase. The product is the second image provided. \
                 The mascot, {MASCOT_NAME} (first image), should be interacting with the product in a fun, engaging way. \
                 The scene should be clean, well-lit, and focus on making the product look appealing. Scene description:"
            ),
            ImageApplication::Meme => format!(
                "Create a viral meme image featuring the mascot {MASCOT_NAME} (first image). \
                 The style should be funny and relatable for a Gen Z audience. Use the following situation as inspiration:"
            ),
            ImageApplication::Banner => format!(
                "Create a wide banner or cover photo suitable for social media. The image should feature the mascot \
                 {MASCOT_NAME} (first image) and potentially the product (second image) in an eye-catching composition. \
                 The design should be clean and leave space for text overlays. Scene description:"
            ),
            ImageApplication::Sticker => format!(
                "Create a high-quality, vibrant sticker for messaging apps (like Zalo or Messenger). \
                 The sticker must feature the mascot \"{MASCOT_NAME}\" (first image). The style must be a digital sticker \
                 with simple, clean lines, bold colors, and a distinct thick white outline around the character. \
                 The background must be transparent or a simple solid color. Create a sticker based on this description:"
            ),
            ImageApplication::ComicPanel => {
                let style = style.filter(|s| !s.trim().is_empty()).unwrap_or("digital art");
                format!(
                    "Create a single comic book panel in a vibrant, clean, {style} style with clear line art and flat colors. \
                     The main character is the mascot \"{MASCOT_NAME}\" (first image). Render this specific scene description:"
                )
            }
            ImageApplication::Storyboard => format!(
                "You are a CGI artist creating a single, viral, meme-worthy image featuring the mascot \"{MASCOT_NAME}\". \
                 Create a new, cinematic image based ONLY on this description:"
            ),
        }
    }
}

impl fmt::Display for ImageApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ImageApplication {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ImageApplication::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown image application: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Portrait9x16,
    Square,
    Landscape16x9,
    Portrait4x5,
    Landscape4x3,
    Portrait3x4,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 6] = [
        AspectRatio::Portrait9x16,
        AspectRatio::Square,
        AspectRatio::Landscape16x9,
        AspectRatio::Portrait4x5,
        AspectRatio::Landscape4x3,
        AspectRatio::Portrait3x4,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait3x4 => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        AspectRatio::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| format!("unsupported aspect ratio: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageConfig {
    pub application: ImageApplication,
    pub aspect_ratio: AspectRatio,
    /// Art style for comic panels.
    pub style: Option<String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            application: ImageApplication::Storyboard,
            aspect_ratio: AspectRatio::Portrait9x16,
            style: Some(COMIC_IMAGE_STYLES[0].to_string()),
        }
    }
}

impl ImageConfig {
    pub fn for_content(content_type: ContentType) -> Self {
        Self {
            application: ImageApplication::for_content(content_type),
            ..Self::default()
        }
    }
}

/// An uploaded image passed to the model as a visual reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub name: String,
    pub mime_type: String,
    /// Base64 payload.
    pub data: String,
}

impl ReferenceImage {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("reference")
            .to_string();
        Ok(Self::new(name, mime_for_path(path), STANDARD.encode(bytes)))
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

/// Reference images sent with every image request, in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetKit {
    pub mascot: Option<ReferenceImage>,
    pub product: Option<ReferenceImage>,
    pub supporting_character: Option<ReferenceImage>,
}

impl AssetKit {
    pub fn references(&self) -> impl Iterator<Item = &ReferenceImage> {
        [&self.mascot, &self.product, &self.supporting_character]
            .into_iter()
            .flatten()
    }
}

pub fn build_image_instruction(visual_cue: &str, config: &ImageConfig) -> String {
    let directive = config.application.directive(config.style.as_deref());
    format!(
        "INSTRUCTIONS:\n\
         1. The first image provided is the mascot \"{MASCOT_NAME}\". The second (if provided) is the product. \
         The third (if provided) is a supporting character. Use them as visual references for appearance and style.\n\
         2. {directive} \"{visual_cue}\"\n\
         3. The image should be high-quality, expressive, and visually engaging.\n\
         4. The final generated image MUST have an aspect ratio of {ratio}.\n\
         5. Output ONLY the final generated image. Do not output any text.",
        ratio = config.aspect_ratio,
    )
}
