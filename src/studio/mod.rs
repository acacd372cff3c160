//! The orchestrator. Holds the single work-in-progress item and the
//! finalized library, and sequences the leaf services per user action.
//!
//! Every operation takes `&mut self`, so only one action can be in flight
//! at a time and the work-in-progress item has exactly one writer. Remote
//! results are applied only after the call resolves.

pub mod library;
pub mod queue;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::api::GenerationBackend;
use crate::brand::BrandId;
use crate::content::ContentService;
use crate::error::{Result, StudioError};
use crate::prompt::{AssetKit, ImageConfig, ScriptBrief};
use crate::scene::{AudioClip, ContentType, GeneratedItem};

pub use library::Library;
pub use queue::{CancelFlag, ImageQueue};

/// Shortest and longest duration a user may give a timed scene, in seconds.
pub const SCENE_DURATION_RANGE: (f64, f64) = (1.0, 5.0);

/// Progress notifications for whoever drives the studio.
#[derive(Debug, Clone, PartialEq)]
pub enum StudioEvent {
    Status(String),
    ImageStarted { index: usize, total: usize },
    ImageReady { index: usize },
    Finalized { id: String },
}

/// Brand and channel the next item is created for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationContext {
    pub brand: BrandId,
    pub channel_id: String,
}

impl CreationContext {
    pub fn new(brand: BrandId, channel_id: impl Into<String>) -> Self {
        Self {
            brand,
            channel_id: channel_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The slot was filled; other slots are still empty.
    Filled,
    /// The last empty slot was filled and the item moved to the library.
    Finalized(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRunOutcome {
    Finalized(String),
    /// Stopped between scenes; filled slots are kept.
    Cancelled { remaining: usize },
}

pub struct Studio<B> {
    content: ContentService<B>,
    assets: AssetKit,
    /// Overrides the per-content-type default when set.
    image_config: Option<ImageConfig>,
    wip: Option<GeneratedItem>,
    library: Library,
    events: Option<UnboundedSender<StudioEvent>>,
}

impl<B: GenerationBackend> Studio<B> {
    pub fn new(content: ContentService<B>) -> Self {
        Self {
            content,
            assets: AssetKit::default(),
            image_config: None,
            wip: None,
            library: Library::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: UnboundedSender<StudioEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn content(&self) -> &ContentService<B> {
        &self.content
    }

    pub fn set_assets(&mut self, assets: AssetKit) {
        self.assets = assets;
    }

    pub fn assets(&self) -> &AssetKit {
        &self.assets
    }

    pub fn set_image_config(&mut self, config: ImageConfig) {
        self.image_config = Some(config);
    }

    /// The configuration images of `content_type` are rendered with.
    pub fn image_config_for(&self, content_type: ContentType) -> ImageConfig {
        self.image_config
            .clone()
            .unwrap_or_else(|| ImageConfig::for_content(content_type))
    }

    pub fn work_in_progress(&self) -> Option<&GeneratedItem> {
        self.wip.as_ref()
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    fn emit(&self, event: StudioEvent) {
        if let Some(tx) = &self.events {
            // A dropped receiver only means nobody is listening
            let _ = tx.send(event);
        }
    }

    fn status(&self, message: &str) {
        self.emit(StudioEvent::Status(message.to_string()));
    }

    fn item(&self) -> Result<&GeneratedItem> {
        self.wip.as_ref().ok_or(StudioError::NoWorkInProgress)
    }

    fn item_mut(&mut self) -> Result<&mut GeneratedItem> {
        self.wip.as_mut().ok_or(StudioError::NoWorkInProgress)
    }

    /// Idle/Finalized -> Scripted. Validates locally, then generates and
    /// scores a script. An existing work-in-progress item is replaced only
    /// once both calls succeed.
    pub async fn generate_script(
        &mut self,
        brief: &ScriptBrief,
        context: Option<&CreationContext>,
    ) -> Result<&GeneratedItem> {
        let context =
            context.ok_or_else(|| StudioError::validation("Vui lòng chọn thương hiệu và kênh trước."))?;
        brief.validate()?;
        if self.assets.mascot.is_none() {
            return Err(StudioError::validation(
                "Vui lòng tải lên mascot Ziino trước khi tạo nội dung.",
            ));
        }

        self.status("Phân tích ý tưởng & tạo kịch bản...");
        let scenes = self
            .content
            .generate_script(brief, context.brand.pack())
            .await?;

        self.status("AI đang chấm điểm nội dung...");
        let score = self.content.evaluate(&scenes).await?;

        let item = GeneratedItem::new(
            brief.content_type,
            scenes,
            score,
            context.brand,
            context.channel_id.as_str(),
        );
        info!(
            "New {} item {} with {} scenes (score {})",
            item.content_type(),
            item.id(),
            item.len(),
            item.score().score
        );

        if let Some(mut previous) = self.wip.take() {
            release_all(previous.take_audio_clips()).await;
        }
        Ok(self.wip.insert(item))
    }

    /// Scripted -> Scripted. Rewrites the script, re-scores it, and resets
    /// every image and audio slot.
    pub async fn humanize(&mut self, style: &str, persona: &str) -> Result<&GeneratedItem> {
        let scenes = self.item()?.scenes().to_vec();

        self.status("Đang nhân hóa kịch bản...");
        let rewritten = self.content.humanize(&scenes, style, persona).await?;

        self.status("AI đang chấm điểm nội dung...");
        let score = self.content.evaluate(&rewritten).await?;

        let item = self.item_mut()?;
        let released = item.replace_script(rewritten, score);
        info!("Humanized item {} (score {})", item.id(), item.score().score);
        release_all(released).await;

        self.item()
    }

    /// Fills one image slot from the scene's current visual cue.
    pub async fn generate_image(&mut self, index: usize) -> Result<SlotOutcome> {
        let item = self.item()?;
        let total = item.len();
        let visual_cue = item.scene(index)?.visual_cue.clone();
        let config = self.image_config_for(item.content_type());

        self.emit(StudioEvent::ImageStarted { index, total });
        let image = self
            .content
            .generate_image(index as u32 + 1, &visual_cue, &self.assets, &config)
            .await?;

        self.item_mut()?.set_image(index, image)?;
        self.emit(StudioEvent::ImageReady { index });

        Ok(match self.finalize_if_complete() {
            Some(id) => SlotOutcome::Finalized(id),
            None => SlotOutcome::Filled,
        })
    }

    /// Fills every empty slot in ascending scene order, one request at a
    /// time. `cancel` is checked before each scene; a failure stops the run
    /// and keeps whatever was already filled.
    pub async fn generate_all_images(&mut self, cancel: &CancelFlag) -> Result<ImageRunOutcome> {
        let item = self.item()?;
        let mut queue = ImageQueue::new(item.pending_images(), item.len());
        let config = self.image_config_for(item.content_type());
        info!("Generating {} of {} images", queue.remaining(), queue.total());

        loop {
            if cancel.is_cancelled() {
                let remaining = queue.remaining();
                warn!("Image run cancelled with {} scenes left", remaining);
                return Ok(ImageRunOutcome::Cancelled { remaining });
            }
            let Some(index) = queue.pop() else {
                break;
            };

            self.status(&format!(
                "Đang tạo ảnh cho cảnh {}/{}...",
                index + 1,
                queue.total()
            ));
            let visual_cue = self.item()?.scene(index)?.visual_cue.clone();
            self.emit(StudioEvent::ImageStarted {
                index,
                total: queue.total(),
            });
            let image = self
                .content
                .generate_image(index as u32 + 1, &visual_cue, &self.assets, &config)
                .await?;
            self.item_mut()?.set_image(index, image)?;
            self.emit(StudioEvent::ImageReady { index });
        }

        self.finalize_if_complete()
            .map(ImageRunOutcome::Finalized)
            .ok_or_else(|| StudioError::validation("Tạo bộ ảnh thất bại."))
    }

    /// Replaces one slot's image from a new description. The scene's visual
    /// cue is updated only when the image call succeeds.
    pub async fn regenerate_image(&mut self, index: usize, prompt: &str) -> Result<SlotOutcome> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(StudioError::validation("Vui lòng nhập mô tả hình ảnh mới."));
        }
        let item = self.item()?;
        let total = item.len();
        item.scene(index)?;
        let config = self.image_config_for(item.content_type());

        self.emit(StudioEvent::ImageStarted { index, total });
        let image = self
            .content
            .generate_image(index as u32 + 1, prompt, &self.assets, &config)
            .await?;

        let item = self.item_mut()?;
        item.set_visual_cue(index, prompt)?;
        item.set_image(index, image)?;
        self.emit(StudioEvent::ImageReady { index });

        Ok(match self.finalize_if_complete() {
            Some(id) => SlotOutcome::Finalized(id),
            None => SlotOutcome::Filled,
        })
    }

    /// Attaches a recording to a scene. A clip already in the slot is
    /// released, and so is `clip` itself when it cannot be attached.
    pub async fn add_audio(&mut self, index: usize, clip: AudioClip) -> Result<()> {
        if let Err(e) = self.item().and_then(|item| item.scene(index).map(|_| ())) {
            release_all(vec![clip]).await;
            return Err(e);
        }
        let previous = self.item_mut()?.replace_audio(index, Some(clip))?;
        release_all(previous.into_iter().collect()).await;
        Ok(())
    }

    /// Clears a scene's audio slot, releasing the clip. An empty slot is a
    /// no-op.
    pub async fn delete_audio(&mut self, index: usize) -> Result<()> {
        if let Some(clip) = self.item_mut()?.replace_audio(index, None)? {
            clip.release().await?;
        }
        Ok(())
    }

    /// Video and film only.
    pub fn set_scene_duration(&mut self, index: usize, seconds: f64) -> Result<()> {
        let item = self.item_mut()?;
        if !item.content_type().is_timed() {
            return Err(StudioError::validation(
                "Chỉ video và phim mới có thời lượng cảnh.",
            ));
        }
        let (min, max) = SCENE_DURATION_RANGE;
        if !(min..=max).contains(&seconds) {
            return Err(StudioError::validation(format!(
                "Thời lượng cảnh phải từ {min} đến {max} giây."
            )));
        }
        item.set_duration(index, seconds)
    }

    /// Moves the work-in-progress item to the library once every image
    /// slot is filled. Returns the finalized item's id.
    pub fn finalize_if_complete(&mut self) -> Option<String> {
        if !self.wip.as_ref().is_some_and(GeneratedItem::is_complete) {
            return None;
        }
        let item = self.wip.take()?;
        let id = item.id().to_string();
        info!("Finalized item {} into the library", id);
        self.library.push(item);
        self.emit(StudioEvent::Finalized { id: id.clone() });
        Some(id)
    }

    /// Drops the work-in-progress item, releasing its recordings.
    pub async fn discard(&mut self) {
        if let Some(mut item) = self.wip.take() {
            release_all(item.take_audio_clips()).await;
        }
    }
}

async fn release_all(clips: Vec<AudioClip>) {
    for clip in clips {
        let path = clip.path().display().to_string();
        if let Err(e) = clip.release().await {
            warn!("Failed to release audio clip {}: {}", path, e);
        }
    }
}
