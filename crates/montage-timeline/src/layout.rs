//! Clip layout: places clips back to back and anchors the crossfades.
//!
//! Layout is a single left-to-right pass over the clip specs. Each clip
//! starts where the previous one ended; a fade window of `2 * half_width`
//! frames straddles every boundary between neighbours. Fades overlap the
//! clips only visually and never shift a clip's start.

use montage_core::{piecewise_linear, MontageError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clip::{ClipSpec, PlacedClip};

/// Half the crossfade width, in frames (7 + 7 = 14).
pub const DEFAULT_FADE_HALF_WIDTH: u32 = 7;

/// Crossfade between clip `from_clip` and the clip after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionWindow {
    pub from_clip: usize,
    pub to_clip: usize,
    /// First frame of the fade, `half_width` frames before the boundary.
    pub fade_start_frame: i64,
    pub fade_duration_frames: i64,
}

impl TransitionWindow {
    #[inline]
    pub fn half_width(&self) -> i64 {
        self.fade_duration_frames / 2
    }

    /// Frame at which `to_clip` starts.
    #[inline]
    pub fn boundary_frame(&self) -> i64 {
        self.fade_start_frame + self.half_width()
    }

    /// Frame after the last one of the fade.
    #[inline]
    pub fn end_frame(&self) -> i64 {
        self.fade_start_frame + self.fade_duration_frames
    }

    #[inline]
    pub fn contains(&self, frame: i64) -> bool {
        frame >= self.fade_start_frame && frame < self.end_frame()
    }

    /// Fade opacity: 0 at the edges, 1 on the boundary, 0 outside.
    pub fn opacity_at(&self, frame: i64) -> Result<f64> {
        let start = self.fade_start_frame as f64;
        let half = self.half_width() as f64;
        piecewise_linear(
            frame as f64,
            &[start, start + half, start + 2.0 * half],
            &[0.0, 1.0, 0.0],
        )
    }
}

/// Placed clips and the transitions between them.
///
/// Only [`layout`] constructs one, so its invariants always hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    clips: Vec<PlacedClip>,
    transitions: Vec<TransitionWindow>,
    fade_half_width: u32,
}

impl Layout {
    /// Clips in input order.
    pub fn clips(&self) -> &[PlacedClip] {
        &self.clips
    }

    /// `transitions()[i]` joins clip `i` and clip `i + 1`.
    pub fn transitions(&self) -> &[TransitionWindow] {
        &self.transitions
    }

    pub fn fade_half_width(&self) -> u32 {
        self.fade_half_width
    }

    /// Frames from the first clip's start to the last clip's end.
    pub fn total_duration(&self) -> i64 {
        self.clips.last().map(PlacedClip::end_frame).unwrap_or(0)
    }

    /// Index of the clip owning `frame`, if any.
    pub fn clip_index_at(&self, frame: i64) -> Option<usize> {
        if frame < 0 || frame >= self.total_duration() {
            return None;
        }
        let idx = self
            .clips
            .partition_point(|clip| clip.start_frame <= frame)
            .saturating_sub(1);
        Some(idx)
    }

    /// Windows that contain `frame`, earliest first.
    pub fn transitions_at(&self, frame: i64) -> impl Iterator<Item = &TransitionWindow> {
        let width = 2 * i64::from(self.fade_half_width);
        let lo = self
            .transitions
            .partition_point(|w| w.fade_start_frame + width <= frame);
        let hi = self
            .transitions
            .partition_point(|w| w.fade_start_frame <= frame);
        self.transitions[lo..hi.max(lo)].iter()
    }
}

/// Lay out `specs` back to back with crossfades of `2 * fade_half_width`.
///
/// Fails without a partial result if the list is empty, the half width is
/// zero, any spec is invalid, or a clip followed by another is shorter than
/// the half width.
pub fn layout(specs: &[ClipSpec], fade_half_width: u32) -> Result<Layout> {
    if specs.is_empty() {
        return Err(MontageError::config("timeline has no clips"));
    }
    if fade_half_width == 0 {
        return Err(MontageError::config("fade half width must be at least 1"));
    }
    let half = i64::from(fade_half_width);

    let mut clips = Vec::with_capacity(specs.len());
    let mut transitions = Vec::with_capacity(specs.len() - 1);
    let mut cursor = 0i64;

    for (index, spec) in specs.iter().enumerate() {
        let placed = PlacedClip::place(spec, cursor)?;
        let duration = placed.effective_duration_frames;

        debug!(
            index,
            media = %placed.media,
            start = placed.start_frame,
            duration,
            "Placed clip"
        );

        if index + 1 < specs.len() {
            if duration < half {
                return Err(MontageError::config(format!(
                    "clip {} ({}) lasts {} frames, shorter than the fade half width {}",
                    index, placed.media, duration, half
                )));
            }
            transitions.push(TransitionWindow {
                from_clip: index,
                to_clip: index + 1,
                fade_start_frame: cursor + duration - half,
                fade_duration_frames: 2 * half,
            });
        }

        cursor += duration;
        clips.push(placed);
    }

    info!(
        clips = clips.len(),
        transitions = transitions.len(),
        total_frames = cursor,
        "Timeline laid out"
    );

    Ok(Layout {
        clips,
        transitions,
        fade_half_width,
    })
}
