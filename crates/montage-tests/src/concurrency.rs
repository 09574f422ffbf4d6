//! Concurrent sampling of a shared timeline.

use montage_core::FrameRate;
use montage_timeline::{ClipSpec, FrameSample, Timeline, TimelineSettings};
use rayon::prelude::*;
use std::sync::Arc;
use std::thread;

const FPS: FrameRate = FrameRate::FPS_30;

fn timeline() -> Timeline {
    let specs = vec![
        ClipSpec::new("video1.mp4", 160)
            .with_trim(40, 0)
            .with_playback_rate(2.0),
        ClipSpec::new("video2.mp4", 60),
        ClipSpec::new("video3.mp4", 60),
        ClipSpec::new("video4.mp4", 160),
    ];
    Timeline::build(&specs, &TimelineSettings::default()).unwrap()
}

#[test]
fn threads_sampling_out_of_order_agree_with_sequential() {
    let timeline = Arc::new(timeline());
    let total = timeline.total_duration();
    let expected: Vec<FrameSample> = (0..total)
        .map(|f| timeline.sample_at(f, FPS).unwrap())
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let timeline = Arc::clone(&timeline);
            thread::spawn(move || {
                // Each worker walks the timeline backwards from a different offset.
                (0..total)
                    .rev()
                    .filter(|f| f % 4 == worker)
                    .map(|f| timeline.sample_at(f, FPS).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for sample in handle.join().unwrap() {
            assert_eq!(sample, expected[sample.frame as usize]);
        }
    }
}

#[test]
fn rayon_shuffled_frames_match_sample_range() {
    let timeline = timeline();
    let ordered = timeline.sample_all(FPS).unwrap();

    let mut frames: Vec<i64> = (0..timeline.total_duration()).collect();
    frames.reverse();
    let shuffled: Vec<FrameSample> = frames
        .par_iter()
        .map(|&f| timeline.sample_at(f, FPS).unwrap())
        .collect();

    for sample in shuffled {
        assert_eq!(sample, ordered[sample.frame as usize]);
    }
}
