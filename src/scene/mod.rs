use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::brand::BrandId;
use crate::error::{Result, StudioError};

/// The five kinds of creative asset the studio produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Social,
    Film,
    Sticker,
    Comic,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::Video,
        ContentType::Social,
        ContentType::Film,
        ContentType::Sticker,
        ContentType::Comic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Video => "video",
            ContentType::Social => "social",
            ContentType::Film => "film",
            ContentType::Sticker => "sticker",
            ContentType::Comic => "comic",
        }
    }

    /// Video and film carry per-scene durations; the others are sets of stills.
    pub fn is_timed(&self) -> bool {
        matches!(self, ContentType::Video | ContentType::Film)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown content type: {s}"))
    }
}

/// One ordinal unit of generated content: a video beat, a social post, a
/// sticker or a comic panel. Field names follow the model's output schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptScene {
    #[serde(rename = "scene", default, deserialize_with = "de_ordinal")]
    pub index: u32,
    #[serde(default)]
    pub line: String,
    #[serde(rename = "duration_s", default)]
    pub duration: f64,
    #[serde(default)]
    pub visual_cue: String,
    #[serde(default)]
    pub sfx: String,
    #[serde(default)]
    pub camera_angle: String,
    #[serde(default)]
    pub character_emotion: String,
    #[serde(default)]
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supporting_character_description: Option<String>,
}

impl ScriptScene {
    pub fn new(index: u32, line: impl Into<String>, visual_cue: impl Into<String>) -> Self {
        Self {
            index,
            line: line.into(),
            duration: 0.0,
            visual_cue: visual_cue.into(),
            sfx: String::new(),
            camera_angle: String::new(),
            character_emotion: String::new(),
            action: String::new(),
            caption: None,
            hashtags: None,
            supporting_character_description: None,
        }
    }

    /// True when the scene reads as a social post rather than a spoken beat.
    pub fn is_post(&self) -> bool {
        self.caption.as_deref().is_some_and(|c| !c.is_empty())
            || self.hashtags.as_ref().is_some_and(|h| !h.is_empty())
    }
}

fn de_ordinal<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    // The model sometimes emits ordinals as 1.0
    let value = f64::deserialize(deserializer)?;
    Ok(if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    })
}

/// Rewrites ordinals to 1..=N so they always match array position + 1.
pub fn renumber(scenes: &mut [ScriptScene]) {
    for (i, scene) in scenes.iter_mut().enumerate() {
        scene.index = i as u32 + 1;
    }
}

/// Humanness evaluation of a script. Replaced wholesale on every re-evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentScore {
    #[serde(deserialize_with = "de_score")]
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

fn de_score<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(if value.is_finite() {
        value.round().clamp(0.0, 100.0) as u8
    } else {
        0
    })
}

/// A generated still, kept base64-encoded as the API returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryboardImage {
    pub mime_type: String,
    pub data: String,
}

impl StoryboardImage {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(self.data.trim())?)
    }
}

/// A recorded voice-over backed by a file on disk. The backing file is the
/// recording buffer; it is removed when the clip is released.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioClip {
    path: PathBuf,
}

impl AudioClip {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("webm")
    }

    pub async fn release(self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// One full creative asset. `images` and `audio` run parallel to `scenes`;
/// the fields are private so every mutation keeps the three lengths equal.
#[derive(Debug)]
pub struct GeneratedItem {
    id: String,
    content_type: ContentType,
    scenes: Vec<ScriptScene>,
    images: Vec<Option<StoryboardImage>>,
    audio: Vec<Option<AudioClip>>,
    score: ContentScore,
    brand: BrandId,
    channel_id: String,
}

impl GeneratedItem {
    pub fn new(
        content_type: ContentType,
        mut scenes: Vec<ScriptScene>,
        score: ContentScore,
        brand: BrandId,
        channel_id: impl Into<String>,
    ) -> Self {
        renumber(&mut scenes);
        let len = scenes.len();
        Self {
            id: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            content_type,
            scenes,
            images: vec![None; len],
            audio: std::iter::repeat_with(|| None).take(len).collect(),
            score,
            brand,
            channel_id: channel_id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn scenes(&self) -> &[ScriptScene] {
        &self.scenes
    }

    pub fn images(&self) -> &[Option<StoryboardImage>] {
        &self.images
    }

    pub fn audio(&self) -> &[Option<AudioClip>] {
        &self.audio
    }

    pub fn score(&self) -> &ContentScore {
        &self.score
    }

    pub fn brand(&self) -> BrandId {
        self.brand
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.scenes.len() {
            Ok(())
        } else {
            Err(StudioError::SceneOutOfRange {
                index,
                len: self.scenes.len(),
            })
        }
    }

    pub fn scene(&self, index: usize) -> Result<&ScriptScene> {
        self.check_index(index)?;
        Ok(&self.scenes[index])
    }

    pub fn set_image(&mut self, index: usize, image: StoryboardImage) -> Result<()> {
        self.check_index(index)?;
        self.images[index] = Some(image);
        Ok(())
    }

    pub fn set_visual_cue(&mut self, index: usize, visual_cue: impl Into<String>) -> Result<()> {
        self.check_index(index)?;
        self.scenes[index].visual_cue = visual_cue.into();
        Ok(())
    }

    pub fn set_duration(&mut self, index: usize, seconds: f64) -> Result<()> {
        self.check_index(index)?;
        self.scenes[index].duration = seconds;
        Ok(())
    }

    /// Puts `clip` into the audio slot and hands back whatever was there.
    pub fn replace_audio(
        &mut self,
        index: usize,
        clip: Option<AudioClip>,
    ) -> Result<Option<AudioClip>> {
        self.check_index(index)?;
        Ok(std::mem::replace(&mut self.audio[index], clip))
    }

    /// Swaps in a rewritten script and its new score. Every image and audio
    /// slot is reset; displaced clips are returned for the caller to release.
    pub fn replace_script(
        &mut self,
        mut scenes: Vec<ScriptScene>,
        score: ContentScore,
    ) -> Vec<AudioClip> {
        renumber(&mut scenes);
        let released = self.take_audio_clips();
        let len = scenes.len();
        self.scenes = scenes;
        self.score = score;
        self.images = vec![None; len];
        self.audio = std::iter::repeat_with(|| None).take(len).collect();
        released
    }

    /// Empties every audio slot, returning the clips that were held.
    pub fn take_audio_clips(&mut self) -> Vec<AudioClip> {
        self.audio.iter_mut().filter_map(Option::take).collect()
    }

    pub fn is_complete(&self) -> bool {
        !self.images.is_empty() && self.images.iter().all(Option::is_some)
    }

    pub fn pending_images(&self) -> Vec<usize> {
        self.images
            .iter()
            .enumerate()
            .filter(|(_, img)| img.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().map(|s| s.duration.max(0.0)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: u8) -> ContentScore {
        ContentScore {
            score: value,
            feedback: String::new(),
            suggestions: vec![],
        }
    }

    fn scenes(n: u32) -> Vec<ScriptScene> {
        (1..=n)
            .map(|i| ScriptScene::new(i * 10, format!("line {i}"), format!("cue {i}")))
            .collect()
    }

    fn assert_parallel(item: &GeneratedItem) {
        assert_eq!(item.images().len(), item.scenes().len());
        assert_eq!(item.audio().len(), item.scenes().len());
    }

    #[test]
    fn new_item_renumbers_and_starts_with_empty_slots() {
        let item = GeneratedItem::new(ContentType::Video, scenes(4), score(60), BrandId::Oniiz, "1");
        assert_parallel(&item);
        let ordinals: Vec<u32> = item.scenes().iter().map(|s| s.index).collect();
        assert_eq!(ordinals, vec![1, 2, 3, 4]);
        assert!(item.images().iter().all(Option::is_none));
        assert!(!item.is_complete());
        assert_eq!(item.pending_images(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn replacing_script_resets_every_slot() {
        let mut item = GeneratedItem::new(ContentType::Film, scenes(3), score(40), BrandId::V2joy, "2");
        item.set_image(0, StoryboardImage::new("image/png", "AAAA")).unwrap();
        item.replace_audio(1, Some(AudioClip::new("/tmp/a.webm"))).unwrap();

        let released = item.replace_script(scenes(3), score(85));

        assert_eq!(released, vec![AudioClip::new("/tmp/a.webm")]);
        assert_parallel(&item);
        assert_eq!(item.score().score, 85);
        assert!(item.images().iter().all(Option::is_none));
        assert!(item.audio().iter().all(Option::is_none));
        assert_eq!(item.scenes()[2].index, 3);
    }

    #[test]
    fn out_of_range_mutations_are_rejected() {
        let mut item = GeneratedItem::new(ContentType::Comic, scenes(2), score(50), BrandId::Oniiz, "1");
        let err = item
            .set_image(2, StoryboardImage::new("image/png", "AAAA"))
            .unwrap_err();
        assert!(matches!(err, StudioError::SceneOutOfRange { index: 2, len: 2 }));
        assert_parallel(&item);
    }

    #[test]
    fn completes_once_every_slot_is_filled() {
        let mut item = GeneratedItem::new(ContentType::Sticker, scenes(2), score(50), BrandId::Oniiz, "1");
        item.set_image(1, StoryboardImage::new("image/png", "AAAA")).unwrap();
        assert!(!item.is_complete());
        item.set_image(0, StoryboardImage::new("image/png", "AAAA")).unwrap();
        assert!(item.is_complete());
        assert!(item.pending_images().is_empty());
    }

    #[test]
    fn parses_model_output_leniently() {
        let raw = r##"{
            "scene": 1.0,
            "line": "u là trời",
            "duration_s": 2.5,
            "visual_cue": "Ziino ôm mặt",
            "sfx": "ting ting",
            "camera_angle": "Close-up",
            "character_emotion": "Hoang mang",
            "action": "Ôm mặt",
            "hashtags": ["#HayChăm"]
        }"##;
        let scene: ScriptScene = serde_json::from_str(raw).unwrap();
        assert_eq!(scene.index, 1);
        assert_eq!(scene.duration, 2.5);
        assert!(scene.is_post());
        assert!(scene.caption.is_none());
    }

    #[test]
    fn clamps_scores_into_range() {
        let s: ContentScore =
            serde_json::from_str(r#"{"score": 104.6, "feedback": "ok", "suggestions": []}"#).unwrap();
        assert_eq!(s.score, 100);
        let s: ContentScore = serde_json::from_str(r#"{"score": 72.4}"#).unwrap();
        assert_eq!(s.score, 72);
        assert!(s.suggestions.is_empty());
    }

    #[test]
    fn content_type_round_trips_through_str() {
        for t in ContentType::ALL {
            assert_eq!(t.as_str().parse::<ContentType>().unwrap(), t);
        }
        assert!("podcast".parse::<ContentType>().is_err());
        assert!(ContentType::Film.is_timed());
        assert!(!ContentType::Social.is_timed());
    }

    #[tokio::test]
    async fn releasing_a_missing_clip_is_not_an_error() {
        let clip = AudioClip::new("/definitely/not/here.webm");
        assert_eq!(clip.extension(), "webm");
        clip.release().await.unwrap();
    }
}
