//! Frame scheduling: what the renderer should show at a given frame.
//!
//! A [`Timeline`] is built once from resolved clip specs and then sampled
//! any number of times. Sampling reads only immutable state, so a timeline
//! can be shared across threads and frames can be rendered in any order.

use montage_core::{FrameRate, MontageError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::info;

use crate::clip::ClipSpec;
use crate::layout::{layout, Layout, DEFAULT_FADE_HALF_WIDTH};
use crate::overlay::OverlayAnimation;

/// Everything besides the clip list needed to build a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    pub fade_half_width: u32,
    pub overlay: OverlayAnimation,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            fade_half_width: DEFAULT_FADE_HALF_WIDTH,
            overlay: OverlayAnimation::default(),
        }
    }
}

/// State of the composition at one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameSample {
    pub frame: i64,
    /// Clip that owns this frame in the contiguous layout.
    pub active_clip_index: usize,
    /// Source frame of the active clip to present.
    pub source_frame: i64,
    /// Crossfade overlay opacity, 0 outside every transition.
    pub fade_opacity: f64,
    /// Transition the fade opacity comes from.
    pub transition_index: Option<usize>,
    pub overlay_opacity: f64,
    pub overlay_offset: f64,
}

/// A built timeline: immutable layout plus overlay animation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    layout: Layout,
    overlay: OverlayAnimation,
}

impl Timeline {
    /// Lay out `specs` and attach the overlay animation.
    pub fn build(specs: &[ClipSpec], settings: &TimelineSettings) -> Result<Self> {
        settings.overlay.validate()?;
        let layout = layout(specs, settings.fade_half_width)?;
        info!(
            total_frames = layout.total_duration(),
            fade_half_width = settings.fade_half_width,
            "Timeline built"
        );
        Ok(Self {
            layout,
            overlay: settings.overlay,
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn overlay(&self) -> &OverlayAnimation {
        &self.overlay
    }

    /// Number of frames; valid sample frames are `0..total_duration()`.
    pub fn total_duration(&self) -> i64 {
        self.layout.total_duration()
    }

    /// Sample the timeline at `frame`.
    pub fn sample_at(&self, frame: i64, fps: FrameRate) -> Result<FrameSample> {
        if !fps.is_valid() {
            return Err(MontageError::config(format!(
                "invalid frame rate {}/{}",
                fps.numerator, fps.denominator
            )));
        }
        let total = self.total_duration();
        let active_clip_index = self
            .layout
            .clip_index_at(frame)
            .ok_or(MontageError::Domain { frame, total })?;
        let clip = &self.layout.clips()[active_clip_index];

        // Overlapping windows only occur around clips shorter than a full
        // fade; the stronger fade wins, the earlier one on ties.
        let mut fade_opacity = 0.0;
        let mut transition_index = None;
        for window in self.layout.transitions_at(frame) {
            let opacity = window.opacity_at(frame)?;
            if transition_index.is_none() || opacity > fade_opacity {
                fade_opacity = opacity;
                transition_index = Some(window.from_clip);
            }
        }

        Ok(FrameSample {
            frame,
            active_clip_index,
            source_frame: clip.source_frame_at(frame),
            fade_opacity,
            transition_index,
            overlay_opacity: self.overlay.opacity_at(frame, fps),
            overlay_offset: self.overlay.offset_at(frame, fps),
        })
    }

    /// Sample every frame in `frames` in parallel, returned in frame order.
    pub fn sample_range(&self, frames: Range<i64>, fps: FrameRate) -> Result<Vec<FrameSample>> {
        frames
            .into_par_iter()
            .map(|frame| self.sample_at(frame, fps))
            .collect()
    }

    /// Sample the whole timeline.
    pub fn sample_all(&self, fps: FrameRate) -> Result<Vec<FrameSample>> {
        self.sample_range(0..self.total_duration(), fps)
    }
}
