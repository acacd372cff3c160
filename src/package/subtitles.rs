use std::fmt::Write as _;

use crate::scene::ScriptScene;

/// Duration assumed for a scene the model gave no usable duration.
pub const FALLBACK_SCENE_SECONDS: f64 = 2.5;

fn timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let s = (total_ms / 1000) % 60;
    let m = (total_ms / 60_000) % 60;
    let h = total_ms / 3_600_000;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Builds SubRip cues from cumulative scene durations. Scenes without a
/// spoken line still advance the clock but get no cue.
pub fn to_srt(scenes: &[ScriptScene]) -> String {
    let mut out = String::new();
    let mut clock = 0.0;
    let mut cue = 1;

    for scene in scenes {
        let duration = if scene.duration.is_finite() && scene.duration > 0.0 {
            scene.duration
        } else {
            FALLBACK_SCENE_SECONDS
        };
        let start = clock;
        clock += duration;

        let line = scene.line.trim();
        if line.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue,
            timestamp(start),
            timestamp(clock),
            line
        );
        cue += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(line: &str, duration: f64) -> ScriptScene {
        let mut s = ScriptScene::new(0, line, "cue");
        s.duration = duration;
        s
    }

    #[test]
    fn formats_hours_minutes_seconds_millis() {
        assert_eq!(timestamp(0.0), "00:00:00,000");
        assert_eq!(timestamp(2.5), "00:00:02,500");
        assert_eq!(timestamp(3725.042), "01:02:05,042");
    }

    #[test]
    fn cues_accumulate_and_skip_silent_scenes() {
        let srt = to_srt(&[
            scene("Bủh", 2.0),
            scene("", 3.0),
            scene("u là trời", 0.0),
        ]);
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,000\nBủh\n\n\
             2\n00:00:05,000 --> 00:00:07,500\nu là trời\n\n"
        );
    }
}
