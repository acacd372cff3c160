mod common;

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::*;
use mascot_studio::brand::BrandId;
use mascot_studio::package::PackageExporter;
use mascot_studio::prompt::{HookConfig, ScriptBrief};
use mascot_studio::scene::{
    AudioClip, ContentScore, ContentType, GeneratedItem, ScriptScene, StoryboardImage,
};
use mascot_studio::studio::{CancelFlag, CreationContext, ImageRunOutcome};

fn read_archive(path: &std::path::Path) -> zip::ZipArchive<std::fs::File> {
    zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap()
}

fn entry_names(archive: &zip::ZipArchive<std::fs::File>) -> Vec<String> {
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

fn entry_text(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> String {
    let mut text = String::new();
    archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
    text
}

fn entry_bytes(archive: &mut zip::ZipArchive<std::fs::File>, name: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    archive.by_name(name).unwrap().read_to_end(&mut bytes).unwrap();
    bytes
}

fn score() -> ContentScore {
    ContentScore {
        score: 90,
        feedback: "ok".to_string(),
        suggestions: vec![],
    }
}

fn filled(content_type: ContentType, scenes: Vec<ScriptScene>) -> GeneratedItem {
    let mut item = GeneratedItem::new(content_type, scenes, score(), BrandId::V2joy, "2");
    for i in 0..item.len() {
        let payload = format!("image-{}", i + 1);
        item.set_image(i, StoryboardImage::new("image/png", STANDARD.encode(payload)))
            .unwrap();
    }
    item
}

#[tokio::test]
async fn video_package_has_script_subtitles_images_and_audio() {
    let dir = tempfile::tempdir().unwrap();
    let recording = dir.path().join("take.webm");
    tokio::fs::write(&recording, b"voice-over").await.unwrap();

    let backend = MockBackend::new()
        .text(script_reply(&["Bủh", "u là trời"]))
        .text(score_reply(81))
        .image(image_reply(b"jpeg-1"))
        .image(image_reply(b"jpeg-2"));
    let mut studio = studio(backend);
    let brief = ScriptBrief {
        content_type: ContentType::Video,
        trend_idea: "Thứ Hai".to_string(),
        secondary_script: "Oniiz".to_string(),
        hook: HookConfig {
            length: 5,
            ..HookConfig::default()
        },
        ..ScriptBrief::default()
    };
    studio
        .generate_script(&brief, Some(&CreationContext::new(BrandId::Oniiz, "1")))
        .await
        .unwrap();
    studio.add_audio(1, AudioClip::new(&recording)).await.unwrap();

    let ImageRunOutcome::Finalized(id) = studio.generate_all_images(&CancelFlag::new()).await.unwrap() else {
        panic!("expected finalization");
    };
    let item = studio.library().get(&id).unwrap();

    let out = dir.path().join("packages");
    let path = PackageExporter::new(&out).export(item).await.unwrap();
    let folder = PackageExporter::folder_name(item);
    assert_eq!(path, out.join(format!("{folder}.zip")));
    assert!(folder.starts_with("ziino_video_"));

    let mut archive = read_archive(&path);
    assert_eq!(
        entry_names(&archive),
        vec![
            format!("{folder}/"),
            format!("{folder}/scene_1.jpg"),
            format!("{folder}/scene_2.jpg"),
            format!("{folder}/scene_2_audio.webm"),
            format!("{folder}/script.txt"),
            format!("{folder}/subtitles.srt"),
        ]
    );

    let script = entry_text(&mut archive, &format!("{folder}/script.txt"));
    assert!(script.starts_with(&format!("SCRIPT - ID: {id}\n\n")));
    assert!(script.contains("---------- SCENE 2 (2.5s) ----------\nLINE: u là trời\n"));

    let srt = entry_text(&mut archive, &format!("{folder}/subtitles.srt"));
    assert!(srt.contains("2\n00:00:02,500 --> 00:00:05,000\nu là trời\n"));

    assert_eq!(entry_bytes(&mut archive, &format!("{folder}/scene_1.jpg")), b"jpeg-1");
    assert_eq!(
        entry_bytes(&mut archive, &format!("{folder}/scene_2_audio.webm")),
        b"voice-over"
    );
}

#[tokio::test]
async fn sticker_package_uses_png_and_content_transcript() {
    let dir = tempfile::tempdir().unwrap();
    let item = filled(
        ContentType::Sticker,
        vec![
            ScriptScene::new(1, "xỉu", "Ziino nằm dài, phong cách sticker Zalo với viền trắng dày"),
            ScriptScene::new(2, "oke la", "Ziino giơ ngón cái"),
        ],
    );

    let path = PackageExporter::new(dir.path()).export(&item).await.unwrap();
    let folder = PackageExporter::folder_name(&item);
    let mut archive = read_archive(&path);

    assert_eq!(
        entry_names(&archive),
        vec![
            format!("{folder}/"),
            format!("{folder}/content.txt"),
            format!("{folder}/sticker_1.png"),
            format!("{folder}/sticker_2.png"),
        ]
    );
    let content = entry_text(&mut archive, &format!("{folder}/content.txt"));
    assert!(content.starts_with(&format!("CONTENT - ID: {}\n\n", item.id())));
    assert!(content.contains("---------- STICKER 2 ----------\nTEXT: oke la\n\nVISUAL CUE:\nZiino giơ ngón cái\n\n\n"));
    assert_eq!(entry_bytes(&mut archive, &format!("{folder}/sticker_2.png")), b"image-2");
}

#[tokio::test]
async fn social_and_comic_packages_name_their_assets() {
    let dir = tempfile::tempdir().unwrap();

    let mut post = ScriptScene::new(1, "", "cue");
    post.caption = Some("Thứ Hai mà vẫn thơm".to_string());
    post.hashtags = Some(vec!["#HayChăm".to_string()]);
    let social = filled(ContentType::Social, vec![post]);
    let path = PackageExporter::new(dir.path()).export(&social).await.unwrap();
    let folder = PackageExporter::folder_name(&social);
    let archive = read_archive(&path);
    assert!(entry_names(&archive).contains(&format!("{folder}/post_1.jpg")));

    let comic = filled(
        ContentType::Comic,
        vec![ScriptScene::new(1, "Ơ kìa", "cue"), ScriptScene::new(2, "", "cue")],
    );
    let comic_dir = dir.path().join("comic");
    let path = PackageExporter::new(&comic_dir).export(&comic).await.unwrap();
    let folder = PackageExporter::folder_name(&comic);
    let mut archive = read_archive(&path);
    let names = entry_names(&archive);
    assert!(names.contains(&format!("{folder}/panel_1.jpg")));
    assert!(names.contains(&format!("{folder}/panel_2.jpg")));
    assert!(!names.iter().any(|n| n.ends_with("subtitles.srt")));
    let content = entry_text(&mut archive, &format!("{folder}/content.txt"));
    assert!(content.contains("DIALOGUE/NARRATION: N/A"));
}

#[tokio::test]
async fn incomplete_items_are_not_exported() {
    let dir = tempfile::tempdir().unwrap();
    let item = GeneratedItem::new(
        ContentType::Film,
        vec![ScriptScene::new(1, "a", "cue")],
        score(),
        BrandId::Oniiz,
        "1",
    );
    assert!(PackageExporter::new(dir.path()).export(&item).await.is_err());
}
