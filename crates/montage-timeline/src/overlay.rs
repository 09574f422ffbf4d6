//! Entrance animation for the logo overlay.
//!
//! The overlay fades in and slides up once, starting at frame
//! `delay_frames`, independently of clip boundaries.

use montage_core::{spring, FrameRate, MontageError, Result, SpringConfig};
use serde::{Deserialize, Serialize};

/// Start and end value of one animated property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringChannel {
    pub from: f64,
    pub to: f64,
}

impl SpringChannel {
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }
}

/// Opacity and vertical offset of the overlay, both spring driven.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayAnimation {
    pub opacity: SpringChannel,
    /// Vertical offset in pixels; positive is below the resting position.
    pub offset: SpringChannel,
    pub spring: SpringConfig,
    pub delay_frames: u32,
}

impl OverlayAnimation {
    /// Damping of the default entrance: heavy enough not to overshoot.
    pub const DEFAULT_DAMPING: f64 = 200.0;

    pub fn validate(&self) -> Result<()> {
        self.spring.validate()?;
        let channels = [
            self.opacity.from,
            self.opacity.to,
            self.offset.from,
            self.offset.to,
        ];
        if channels.iter().any(|v| !v.is_finite()) {
            return Err(MontageError::config(
                "overlay animation has a non-finite endpoint",
            ));
        }
        Ok(())
    }

    fn local_frame(&self, frame: i64) -> f64 {
        (frame - i64::from(self.delay_frames)) as f64
    }

    /// Overlay opacity at `frame`, always within `[0, 1]`.
    pub fn opacity_at(&self, frame: i64, fps: FrameRate) -> f64 {
        let value = spring(
            self.local_frame(frame),
            fps,
            self.opacity.from,
            self.opacity.to,
            &self.spring,
        );
        value.clamp(0.0, 1.0)
    }

    /// Vertical offset at `frame`.
    pub fn offset_at(&self, frame: i64, fps: FrameRate) -> f64 {
        spring(
            self.local_frame(frame),
            fps,
            self.offset.from,
            self.offset.to,
            &self.spring,
        )
    }

    /// Global frame after which the overlay is visually at rest.
    pub fn settle_frame(&self, fps: FrameRate, epsilon: f64) -> Option<i64> {
        self.spring
            .settle_frame(fps, epsilon)
            .map(|f| f + i64::from(self.delay_frames))
    }
}

impl Default for OverlayAnimation {
    fn default() -> Self {
        Self {
            opacity: SpringChannel::new(0.0, 1.0),
            offset: SpringChannel::new(300.0, 0.0),
            spring: SpringConfig::default().with_damping(Self::DEFAULT_DAMPING),
            delay_frames: 0,
        }
    }
}
