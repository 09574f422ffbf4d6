//! Clip types for the timeline.

use montage_core::{FrameRate, MontageError, RationalTime, Result, TimeRange};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest effective duration a single clip may have.
const MAX_CLIP_FRAMES: f64 = (1u64 << 40) as f64;

/// Opaque reference to a media source (path, URI, asset key).
///
/// Never opened by the timeline; it is only handed back to the player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaHandle(String);

impl MediaHandle {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaHandle {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaHandle {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A clip as requested by the host, with its source length already known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSpec {
    pub media: MediaHandle,
    /// Full decodable length of the source, in frames at the project rate.
    pub raw_duration_frames: u32,
    /// Source frames skipped at the start.
    pub trim_in_frames: u32,
    /// Source frames skipped at the end.
    pub trim_out_frames: u32,
    /// Speed multiplier (1.0 = native speed).
    pub playback_rate: f64,
}

impl ClipSpec {
    /// Untrimmed clip at native speed.
    pub fn new(media: impl Into<MediaHandle>, raw_duration_frames: u32) -> Self {
        Self {
            media: media.into(),
            raw_duration_frames,
            trim_in_frames: 0,
            trim_out_frames: 0,
            playback_rate: 1.0,
        }
    }

    pub fn with_trim(mut self, trim_in_frames: u32, trim_out_frames: u32) -> Self {
        self.trim_in_frames = trim_in_frames;
        self.trim_out_frames = trim_out_frames;
        self
    }

    pub fn with_playback_rate(mut self, playback_rate: f64) -> Self {
        self.playback_rate = playback_rate;
        self
    }

    /// Check this clip's own invariants.
    pub fn validate(&self) -> Result<()> {
        if self.raw_duration_frames == 0 {
            return Err(MontageError::config(format!(
                "clip {} has a zero raw duration",
                self.media
            )));
        }
        let trimmed = u64::from(self.trim_in_frames) + u64::from(self.trim_out_frames);
        if trimmed >= u64::from(self.raw_duration_frames) {
            return Err(MontageError::config(format!(
                "clip {} trims {} of its {} frames",
                self.media, trimmed, self.raw_duration_frames
            )));
        }
        let rate = self.playback_rate;
        if !(rate.is_finite() && rate > 0.0) {
            return Err(MontageError::config(format!(
                "clip {} has a non-positive playback rate {}",
                self.media, rate
            )));
        }
        Ok(())
    }

    /// Source frames left after trimming.
    pub fn usable_frames(&self) -> i64 {
        i64::from(self.raw_duration_frames)
            - i64::from(self.trim_in_frames)
            - i64::from(self.trim_out_frames)
    }

    /// `floor(usable / rate)`; fewer than one frame is an error.
    pub fn effective_duration_frames(&self) -> Result<i64> {
        self.validate()?;
        let frames = (self.usable_frames() as f64 / self.playback_rate).floor();
        if frames >= MAX_CLIP_FRAMES {
            return Err(MontageError::config(format!(
                "clip {} plays for too long at rate {}",
                self.media, self.playback_rate
            )));
        }
        if frames < 1.0 {
            return Err(MontageError::config(format!(
                "clip {} plays for less than one frame at rate {}",
                self.media, self.playback_rate
            )));
        }
        Ok(frames as i64)
    }
}

/// A clip placed on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedClip {
    pub media: MediaHandle,
    /// First global frame this clip occupies.
    pub start_frame: i64,
    pub effective_duration_frames: i64,
    /// First source frame consumed (the trim-in point).
    pub source_start_frame: i64,
    /// Source frame after the last one consumed.
    pub source_end_frame: i64,
    pub playback_rate: f64,
}

impl PlacedClip {
    /// Place `spec` at `start_frame`.
    pub fn place(spec: &ClipSpec, start_frame: i64) -> Result<Self> {
        let effective_duration_frames = spec.effective_duration_frames()?;
        Ok(Self {
            media: spec.media.clone(),
            start_frame,
            effective_duration_frames,
            source_start_frame: i64::from(spec.trim_in_frames),
            source_end_frame: i64::from(spec.raw_duration_frames)
                - i64::from(spec.trim_out_frames),
            playback_rate: spec.playback_rate,
        })
    }

    /// Global frame after the last one this clip occupies.
    #[inline]
    pub fn end_frame(&self) -> i64 {
        self.start_frame + self.effective_duration_frames
    }

    #[inline]
    pub fn contains(&self, frame: i64) -> bool {
        frame >= self.start_frame && frame < self.end_frame()
    }

    /// Source frame to present at `global_frame`.
    ///
    /// Frames outside the clip are clamped onto its first or last frame.
    pub fn source_frame_at(&self, global_frame: i64) -> i64 {
        let local = (global_frame - self.start_frame).max(0);
        let advanced = (local as f64 * self.playback_rate).floor() as i64;
        self.source_start_frame
            .saturating_add(advanced)
            .min(self.source_end_frame - 1)
    }

    /// Consumed source window in seconds, for seeking.
    pub fn source_range(&self, fps: FrameRate) -> Result<TimeRange> {
        if !fps.is_valid() {
            return Err(MontageError::config(format!(
                "invalid frame rate {}/{}",
                fps.numerator, fps.denominator
            )));
        }
        Ok(TimeRange::from_start_end(
            RationalTime::from_frames(self.source_start_frame, fps),
            RationalTime::from_frames(self.source_end_frame, fps),
        ))
    }
}
