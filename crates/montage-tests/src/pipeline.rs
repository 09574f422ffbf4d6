//! Integration tests for resolve-then-build.
//!
//! Drives montage-media's resolvers into montage-timeline's scheduler.

use montage_core::{FrameRate, MontageError};
use montage_media::{build_timeline, ManifestResolver, StaticResolver, DEFAULT_RESOLVE_TIMEOUT};
use montage_timeline::{ClipConfig, TimelineConfig, TimelineFile};
use std::io::Write;

fn scenario_a_config() -> TimelineConfig {
    let mut first = ClipConfig::new("video1.mp4");
    first.trim_in_frames = 40;
    first.playback_rate = 2.0;
    TimelineConfig {
        clips: vec![
            first,
            ClipConfig::new("video2.mp4"),
            ClipConfig::new("video3.mp4"),
            ClipConfig::new("video4.mp4"),
        ],
        ..TimelineConfig::default()
    }
}

#[tokio::test]
async fn manifest_resolution_builds_scenario_a() {
    let mut manifest = tempfile::NamedTempFile::new().unwrap();
    write!(
        manifest,
        r#"{{ "video1.mp4": 160, "video2.mp4": 60, "video3.mp4": 60, "video4.mp4": 160 }}"#
    )
    .unwrap();

    let resolver = ManifestResolver::load(manifest.path()).await.unwrap();
    let timeline = build_timeline(&scenario_a_config(), &resolver, DEFAULT_RESOLVE_TIMEOUT)
        .await
        .unwrap();

    let starts: Vec<i64> = timeline
        .layout()
        .clips()
        .iter()
        .map(|c| c.start_frame)
        .collect();
    assert_eq!(starts, vec![0, 60, 120, 180]);
    assert_eq!(timeline.total_duration(), 340);

    let sample = timeline.sample_at(113, FrameRate::FPS_30).unwrap();
    assert_eq!(sample.transition_index, Some(1));
}

#[tokio::test]
async fn one_unresolved_clip_fails_the_build() {
    let resolver = StaticResolver::new()
        .with("video1.mp4", 160)
        .with("video2.mp4", 60)
        .with("video4.mp4", 160);

    let err = build_timeline(&scenario_a_config(), &resolver, DEFAULT_RESOLVE_TIMEOUT)
        .await
        .unwrap_err();
    match err {
        MontageError::Resolution { media, .. } => assert_eq!(media, "video3.mp4"),
        other => panic!("expected resolution error, got {other:?}"),
    }
}

#[tokio::test]
async fn mixed_inline_and_resolved_durations() {
    let mut config = scenario_a_config();
    config.clips[1].raw_duration_frames = Some(60);
    config.clips[2].raw_duration_frames = Some(60);

    let resolver = StaticResolver::new()
        .with("video1.mp4", 160)
        .with("video4.mp4", 160);
    let timeline = build_timeline(&config, &resolver, DEFAULT_RESOLVE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(timeline.layout().transitions().len(), 3);
}

#[tokio::test]
async fn sparse_file_resolves_missing_durations() {
    let sparse = br#"{
        "version": 1,
        "app_version": "0.1.0",
        "timeline": {
            "fade_half_width": 5,
            "clips": [
                { "media": "a.mp4" },
                { "media": "b.mp4", "raw_duration_frames": 40 }
            ]
        }
    }"#;
    let file = TimelineFile::from_json(sparse).unwrap();
    let resolver = StaticResolver::new().with("a.mp4", 30);

    let timeline = build_timeline(&file.timeline, &resolver, DEFAULT_RESOLVE_TIMEOUT)
        .await
        .unwrap();
    assert_eq!(timeline.layout().transitions()[0].fade_start_frame, 25);
    assert_eq!(timeline.layout().transitions()[0].fade_duration_frames, 10);
}
