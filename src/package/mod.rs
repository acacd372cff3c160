//! Zip export of finalized items.

pub mod subtitles;

use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, StudioError};
use crate::scene::{ContentType, GeneratedItem, ScriptScene};

pub use subtitles::to_srt;

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

/// `script.txt` for video and film.
pub fn script_transcript(item: &GeneratedItem) -> String {
    let mut out = format!("SCRIPT - ID: {}\n\n", item.id());
    for scene in item.scenes() {
        let _ = write!(
            out,
            "---------- SCENE {} ({}s) ----------\n\
             LINE: {}\nVISUAL: {}\nEMOTION: {}\nCAMERA: {}\nACTION: {}\nSFX: {}\n\n",
            scene.index,
            scene.duration,
            or_na(&scene.line),
            or_na(&scene.visual_cue),
            or_na(&scene.character_emotion),
            or_na(&scene.camera_angle),
            or_na(&scene.action),
            or_na(&scene.sfx),
        );
    }
    out
}

fn write_unit_body(out: &mut String, content_type: ContentType, scene: &ScriptScene) {
    match content_type {
        ContentType::Social => {
            let hashtags = scene.hashtags.as_deref().unwrap_or_default().join(" ");
            let _ = write!(
                out,
                "CAPTION:\n{}\n\nHASHTAGS:\n{}\n\n",
                or_na(scene.caption.as_deref().unwrap_or_default()),
                hashtags
            );
        }
        ContentType::Sticker => {
            let _ = write!(out, "TEXT: {}\n\n", or_na(&scene.line));
        }
        _ => {
            let _ = write!(out, "DIALOGUE/NARRATION: {}\n\n", or_na(&scene.line));
        }
    }
}

/// `content.txt` for social, sticker and comic sets.
pub fn content_transcript(item: &GeneratedItem) -> String {
    let label = item.content_type().rules().unit_label;
    let mut out = format!("CONTENT - ID: {}\n\n", item.id());
    for (i, scene) in item.scenes().iter().enumerate() {
        let _ = writeln!(out, "---------- {} {} ----------", label, i + 1);
        write_unit_body(&mut out, item.content_type(), scene);
        let _ = write!(out, "VISUAL CUE:\n{}\n\n\n", or_na(&scene.visual_cue));
    }
    out
}

pub struct PackageExporter {
    output_dir: PathBuf,
}

impl PackageExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `ziino_<type>_<last six characters of the id>`.
    pub fn folder_name(item: &GeneratedItem) -> String {
        let id: Vec<char> = item.id().chars().collect();
        let suffix: String = id[id.len().saturating_sub(6)..].iter().collect();
        format!("ziino_{}_{}", item.content_type(), suffix)
    }

    /// Builds the archive in memory and writes `<folder>.zip` into the
    /// output directory.
    pub async fn export(&self, item: &GeneratedItem) -> Result<PathBuf> {
        if !item.is_complete() {
            return Err(StudioError::validation(
                "Chỉ có thể xuất nội dung đã tạo đủ hình ảnh.",
            ));
        }

        let folder = Self::folder_name(item);
        let rules = item.content_type().rules();
        info!("Packaging {} into {}.zip", item.id(), folder);

        let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
        if item.content_type().is_timed() {
            entries.push((format!("{folder}/script.txt"), script_transcript(item).into_bytes()));
            entries.push((format!("{folder}/subtitles.srt"), to_srt(item.scenes()).into_bytes()));
        } else {
            entries.push((format!("{folder}/content.txt"), content_transcript(item).into_bytes()));
        }

        for (i, image) in item.images().iter().enumerate() {
            if let Some(image) = image {
                entries.push((
                    format!("{}/{}", folder, rules.asset_file_name(i + 1)),
                    image.decode()?,
                ));
            }
        }

        for (i, clip) in item.audio().iter().enumerate() {
            let Some(clip) = clip else { continue };
            match tokio::fs::read(clip.path()).await {
                Ok(bytes) => entries.push((
                    format!("{}/scene_{}_audio.{}", folder, i + 1, clip.extension()),
                    bytes,
                )),
                Err(e) => warn!(
                    "Skipping audio for scene {} ({}): {}",
                    i + 1,
                    clip.path().display(),
                    e
                ),
            }
        }

        let archive = build_archive(&folder, entries)?;
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(format!("{folder}.zip"));
        tokio::fs::write(&path, archive).await?;

        info!("Package written to {}", path.display());
        Ok(path)
    }
}

fn build_archive(folder: &str, entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>> {
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    writer.add_directory(format!("{folder}/"), options)?;
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandId;
    use crate::scene::ContentScore;

    fn score() -> ContentScore {
        ContentScore {
            score: 80,
            feedback: String::new(),
            suggestions: vec![],
        }
    }

    #[test]
    fn script_transcript_fills_missing_fields_with_na() {
        let mut scene = ScriptScene::new(1, "Bủh", "Ziino ngã ngửa");
        scene.duration = 2.5;
        scene.sfx = "whoosh".to_string();
        let item = GeneratedItem::new(ContentType::Video, vec![scene], score(), BrandId::Oniiz, "1");

        let text = script_transcript(&item);
        assert!(text.starts_with(&format!("SCRIPT - ID: {}\n\n", item.id())));
        assert!(text.contains(
            "---------- SCENE 1 (2.5s) ----------\nLINE: Bủh\nVISUAL: Ziino ngã ngửa\n\
             EMOTION: N/A\nCAMERA: N/A\nACTION: N/A\nSFX: whoosh\n\n"
        ));
    }

    #[test]
    fn social_transcript_lists_caption_and_hashtags() {
        let mut post = ScriptScene::new(1, "", "Ziino cầm chai sữa tắm");
        post.caption = Some("Tắm xong thơm cả ngày".to_string());
        post.hashtags = Some(vec!["#HayChăm".to_string(), "#OniizXZiino".to_string()]);
        let item = GeneratedItem::new(ContentType::Social, vec![post], score(), BrandId::Oniiz, "1");

        let text = content_transcript(&item);
        assert!(text.contains(
            "---------- POST 1 ----------\nCAPTION:\nTắm xong thơm cả ngày\n\n\
             HASHTAGS:\n#HayChăm #OniizXZiino\n\nVISUAL CUE:\nZiino cầm chai sữa tắm\n\n\n"
        ));
    }

    #[test]
    fn sticker_and_comic_transcripts_use_their_own_headings() {
        let sticker = GeneratedItem::new(
            ContentType::Sticker,
            vec![ScriptScene::new(1, "xỉu", "cue")],
            score(),
            BrandId::V2joy,
            "2",
        );
        assert!(content_transcript(&sticker).contains("---------- STICKER 1 ----------\nTEXT: xỉu\n\n"));

        let comic = GeneratedItem::new(
            ContentType::Comic,
            vec![ScriptScene::new(1, "", "cue"), ScriptScene::new(2, "Hết cứu!", "cue")],
            score(),
            BrandId::V2joy,
            "2",
        );
        let text = content_transcript(&comic);
        assert!(text.contains("---------- PANEL 1 ----------\nDIALOGUE/NARRATION: N/A\n\n"));
        assert!(text.contains("---------- PANEL 2 ----------\nDIALOGUE/NARRATION: Hết cứu!\n\n"));
    }

    #[test]
    fn folder_name_uses_type_and_id_suffix() {
        let item = GeneratedItem::new(
            ContentType::Comic,
            vec![ScriptScene::new(1, "", "cue")],
            score(),
            BrandId::Oniiz,
            "1",
        );
        let name = PackageExporter::folder_name(&item);
        let suffix: String = item.id().chars().rev().take(6).collect::<Vec<_>>().into_iter().rev().collect();
        assert_eq!(name, format!("ziino_comic_{suffix}"));
    }
}
