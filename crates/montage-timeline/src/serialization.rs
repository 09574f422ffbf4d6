//! Versioned timeline configuration files.
//!
//! Uses JSON with a schema version field. The file only describes what the
//! host wants laid out; durations the host does not know yet are left empty
//! and resolved before the timeline is built.

use montage_core::{FrameRate, MontageError, Result};
use serde::{Deserialize, Serialize};

use crate::clip::{ClipSpec, MediaHandle};
use crate::layout::DEFAULT_FADE_HALF_WIDTH;
use crate::overlay::OverlayAnimation;
use crate::schedule::TimelineSettings;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// One clip entry of a timeline config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipConfig {
    pub media: MediaHandle,
    /// Known source length; `None` asks the host to resolve it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_duration_frames: Option<u32>,
    #[serde(default)]
    pub trim_in_frames: u32,
    #[serde(default)]
    pub trim_out_frames: u32,
    #[serde(default = "default_playback_rate")]
    pub playback_rate: f64,
}

fn default_playback_rate() -> f64 {
    1.0
}

impl ClipConfig {
    pub fn new(media: impl Into<MediaHandle>) -> Self {
        Self {
            media: media.into(),
            raw_duration_frames: None,
            trim_in_frames: 0,
            trim_out_frames: 0,
            playback_rate: default_playback_rate(),
        }
    }

    /// Spec for this clip given its resolved source length.
    pub fn to_spec(&self, raw_duration_frames: u32) -> ClipSpec {
        ClipSpec {
            media: self.media.clone(),
            raw_duration_frames,
            trim_in_frames: self.trim_in_frames,
            trim_out_frames: self.trim_out_frames,
            playback_rate: self.playback_rate,
        }
    }

    /// Spec from the inline duration, if the config carries one.
    pub fn inline_spec(&self) -> Option<ClipSpec> {
        self.raw_duration_frames.map(|raw| self.to_spec(raw))
    }
}

/// Plain structured description of a timeline, as persisted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub fps: FrameRate,
    pub width: u32,
    pub height: u32,
    pub fade_half_width: u32,
    /// RGB colour the crossfade overlay is filled with.
    pub fade_color: [u8; 3],
    pub clips: Vec<ClipConfig>,
    pub overlay: OverlayAnimation,
}

impl TimelineConfig {
    pub fn settings(&self) -> TimelineSettings {
        TimelineSettings {
            fade_half_width: self.fade_half_width,
            overlay: self.overlay,
        }
    }

    /// Specs for every clip, if all of them carry an inline duration.
    pub fn inline_specs(&self) -> Result<Vec<ClipSpec>> {
        self.clips
            .iter()
            .map(|clip| {
                clip.inline_spec().ok_or_else(|| MontageError::Resolution {
                    media: clip.media.to_string(),
                    reason: "no inline duration".to_string(),
                })
            })
            .collect()
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            fps: FrameRate::FPS_30,
            width: 1080,
            height: 1920,
            fade_half_width: DEFAULT_FADE_HALF_WIDTH,
            fade_color: [255, 255, 255],
            clips: Vec::new(),
            overlay: OverlayAnimation::default(),
        }
    }
}

/// Versioned timeline file wrapper.
#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineFile {
    /// Schema version, checked against `CURRENT_VERSION` on load.
    pub version: u32,
    pub timeline: TimelineConfig,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl TimelineFile {
    pub fn new(timeline: TimelineConfig) -> Self {
        Self {
            version: CURRENT_VERSION,
            timeline,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            MontageError::Serialization(format!("Failed to serialize timeline: {}", e))
        })
    }

    /// Deserialize from JSON bytes, checking the schema version first.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| MontageError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw
            .get("version")
            .ok_or_else(|| MontageError::Serialization("Timeline file has no version".into()))?;
        let version = version
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| {
                MontageError::Serialization(format!("Invalid timeline file version {}", version))
            })?;

        if version == 0 || version > CURRENT_VERSION {
            return Err(MontageError::Serialization(format!(
                "Timeline file version {} is not supported (expected 1..={})",
                version, CURRENT_VERSION
            )));
        }

        serde_json::from_value(raw)
            .map_err(|e| MontageError::Serialization(format!("Failed to parse timeline: {}", e)))
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }
}
