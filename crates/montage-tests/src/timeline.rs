//! Integration tests for layout and scheduling.
//!
//! Exercises montage-core curves through montage-timeline's layout,
//! scheduler and config files.

use montage_core::{FrameRate, MontageError, SpringConfig};
use montage_timeline::{
    ClipConfig, ClipSpec, OverlayAnimation, SpringChannel, Timeline, TimelineConfig,
    TimelineFile, TimelineSettings,
};

const FPS: FrameRate = FrameRate::FPS_30;

// ── Helpers ────────────────────────────────────────────────────

fn scenario_a_specs() -> Vec<ClipSpec> {
    let raw = [160, 60, 60, 160];
    let trim_in = [40, 0, 0, 0];
    let rates = [2.0, 1.0, 1.0, 1.0];
    (0..4)
        .map(|i| {
            ClipSpec::new(format!("video{}.mp4", i + 1).as_str(), raw[i])
                .with_trim(trim_in[i], 0)
                .with_playback_rate(rates[i])
        })
        .collect()
}

fn scenario_a() -> Timeline {
    Timeline::build(&scenario_a_specs(), &TimelineSettings::default()).unwrap()
}

// ── Scenario A ─────────────────────────────────────────────────

#[test]
fn scenario_a_places_clips_and_fades() {
    let timeline = scenario_a();
    let layout = timeline.layout();

    let placed: Vec<(i64, i64)> = layout
        .clips()
        .iter()
        .map(|c| (c.start_frame, c.effective_duration_frames))
        .collect();
    assert_eq!(placed, vec![(0, 60), (60, 60), (120, 60), (180, 160)]);

    let fades: Vec<(i64, i64)> = layout
        .transitions()
        .iter()
        .map(|t| (t.fade_start_frame, t.fade_duration_frames))
        .collect();
    assert_eq!(fades, vec![(53, 14), (113, 14), (173, 14)]);
}

#[test]
fn scenario_a_layout_is_contiguous() {
    let timeline = scenario_a();
    for pair in timeline.layout().clips().windows(2) {
        assert_eq!(
            pair[1].start_frame,
            pair[0].start_frame + pair[0].effective_duration_frames
        );
    }
}

#[test]
fn scenario_a_first_clip_consumes_trimmed_source_at_double_speed() {
    let timeline = scenario_a();
    let first = &timeline.layout().clips()[0];
    assert_eq!(first.source_start_frame, 40);
    assert_eq!(first.source_end_frame, 160);

    assert_eq!(timeline.sample_at(0, FPS).unwrap().source_frame, 40);
    assert_eq!(timeline.sample_at(59, FPS).unwrap().source_frame, 158);
    assert_eq!(timeline.sample_at(60, FPS).unwrap().source_frame, 0);
}

#[test]
fn fade_opacity_hits_zero_one_zero_on_every_window() {
    let timeline = scenario_a();
    for window in timeline.layout().transitions() {
        let start = window.fade_start_frame;
        let half = window.half_width();

        let at = |frame: i64| timeline.sample_at(frame, FPS).unwrap().fade_opacity;
        assert_eq!(at(start), 0.0);
        assert_eq!(at(start + half), 1.0);
        assert_eq!(at(start + 2 * half), 0.0);

        for f in start..start + half {
            assert!(at(f) <= at(f + 1), "rise not monotonic at {f}");
        }
        for f in start + half..start + 2 * half {
            assert!(at(f) >= at(f + 1), "fall not monotonic at {f}");
        }
    }
}

#[test]
fn fade_is_zero_away_from_boundaries() {
    let timeline = scenario_a();
    for frame in [0, 30, 52, 67, 90, 112, 127, 172, 187, 300, 339] {
        let sample = timeline.sample_at(frame, FPS).unwrap();
        assert_eq!(sample.fade_opacity, 0.0, "frame {frame}");
    }
}

// ── Scenario B ─────────────────────────────────────────────────

#[test]
fn scenario_b_short_clip_before_transition_is_rejected() {
    let specs = vec![
        ClipSpec::new("short.mp4", 10).with_trim(8, 0),
        ClipSpec::new("next.mp4", 60),
    ];
    let err = Timeline::build(&specs, &TimelineSettings::default()).unwrap_err();
    assert!(matches!(err, MontageError::Configuration(_)));
}

#[test]
fn scenario_b_short_clip_is_fine_when_last() {
    let specs = vec![
        ClipSpec::new("first.mp4", 60),
        ClipSpec::new("short.mp4", 10).with_trim(8, 0),
    ];
    let timeline = Timeline::build(&specs, &TimelineSettings::default()).unwrap();
    assert_eq!(timeline.total_duration(), 62);
    assert_eq!(timeline.sample_at(61, FPS).unwrap().active_clip_index, 1);
}

// ── Scenario C ─────────────────────────────────────────────────

#[test]
fn scenario_c_overlay_spring_settles_without_overshoot() {
    let overlay = OverlayAnimation {
        opacity: SpringChannel::new(0.0, 1.0),
        spring: SpringConfig::default().with_damping(400.0),
        ..OverlayAnimation::default()
    };
    let settings = TimelineSettings {
        overlay,
        ..TimelineSettings::default()
    };
    let timeline = Timeline::build(&[ClipSpec::new("long.mp4", 20_000)], &settings).unwrap();

    let first = timeline.sample_at(0, FPS).unwrap();
    assert!(first.overlay_opacity.abs() < 1e-9);

    let far = timeline.sample_at(19_999, FPS).unwrap();
    assert!((far.overlay_opacity - 1.0).abs() < 1e-6);

    let mut prev = first.overlay_opacity;
    for frame in 1..20_000 {
        let v = timeline.sample_at(frame, FPS).unwrap().overlay_opacity;
        assert!(v >= prev - 1e-12, "opacity fell at frame {frame}");
        prev = v;
    }
}

#[test]
fn overlay_ignores_clip_boundaries() {
    let timeline = scenario_a();
    let overlay = timeline.overlay();
    for frame in [0, 53, 60, 67, 180] {
        let sample = timeline.sample_at(frame, FPS).unwrap();
        assert_eq!(sample.overlay_opacity, overlay.opacity_at(frame, FPS));
        assert_eq!(sample.overlay_offset, overlay.offset_at(frame, FPS));
    }
}

// ── Boundaries ─────────────────────────────────────────────────

#[test]
fn last_frame_resolves_and_one_past_is_domain_error() {
    let timeline = scenario_a();
    let total = timeline.total_duration();

    let last = timeline.sample_at(total - 1, FPS).unwrap();
    assert_eq!(last.active_clip_index, 3);

    assert!(matches!(
        timeline.sample_at(total, FPS),
        Err(MontageError::Domain { .. })
    ));
    assert!(matches!(
        timeline.sample_at(-1, FPS),
        Err(MontageError::Domain { .. })
    ));
}

#[test]
fn sampling_is_bit_identical_across_calls() {
    let timeline = scenario_a();
    let first = timeline.sample_all(FPS).unwrap();
    let second = timeline.sample_all(FPS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fractional_frame_rate_only_affects_overlay() {
    let timeline = scenario_a();
    let a = timeline.sample_at(100, FrameRate::FPS_30).unwrap();
    let b = timeline.sample_at(100, FrameRate::FPS_29_97).unwrap();
    assert_eq!(a.active_clip_index, b.active_clip_index);
    assert_eq!(a.fade_opacity, b.fade_opacity);
    assert!(b.overlay_opacity > a.overlay_opacity);
}

// ── Config files ───────────────────────────────────────────────

#[test]
fn config_file_builds_same_timeline_as_specs() {
    let mut config = TimelineConfig::default();
    for spec in scenario_a_specs() {
        let mut clip = ClipConfig::new(spec.media.clone());
        clip.raw_duration_frames = Some(spec.raw_duration_frames);
        clip.trim_in_frames = spec.trim_in_frames;
        clip.playback_rate = spec.playback_rate;
        config.clips.push(clip);
    }

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("timeline.json");
    TimelineFile::new(config).save_to_file(&path).unwrap();

    let loaded = TimelineFile::load_from_file(&path).unwrap();
    let specs = loaded.timeline.inline_specs().unwrap();
    let timeline = Timeline::build(&specs, &loaded.timeline.settings()).unwrap();

    assert_eq!(timeline, scenario_a());
}
