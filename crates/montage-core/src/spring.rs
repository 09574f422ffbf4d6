//! Spring-driven approach curves.
//!
//! A spring is a damped harmonic oscillator released from rest at `from` and
//! pulled toward `to`. The response is evaluated in closed form, so a value
//! at any frame depends only on that frame, never on earlier evaluations.

use serde::{Deserialize, Serialize};

use crate::error::{MontageError, Result};
use crate::time::FrameRate;

/// Frames scanned by [`SpringConfig::settle_frame`] before giving up.
const MAX_SETTLE_FRAMES: i64 = 1 << 20;

/// Tolerance around a damping ratio of 1 treated as critical damping.
const CRITICAL_EPSILON: f64 = 1e-9;

/// Physical parameters of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub mass: f64,
    pub stiffness: f64,
    /// Higher damping settles without overshoot but more slowly.
    pub damping: f64,
    /// Never let the value pass `to`, even for an underdamped spring.
    pub overshoot_clamping: bool,
}

impl SpringConfig {
    pub const fn new(mass: f64, stiffness: f64, damping: f64) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            overshoot_clamping: false,
        }
    }

    /// Same parameters with a different damping coefficient.
    pub const fn with_damping(self, damping: f64) -> Self {
        Self { damping, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.mass.is_finite() && self.mass > 0.0) {
            return Err(MontageError::config(format!(
                "spring mass must be positive, got {}",
                self.mass
            )));
        }
        if !(self.stiffness.is_finite() && self.stiffness > 0.0) {
            return Err(MontageError::config(format!(
                "spring stiffness must be positive, got {}",
                self.stiffness
            )));
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(MontageError::config(format!(
                "spring damping must be non-negative, got {}",
                self.damping
            )));
        }
        Ok(())
    }

    /// Undamped angular frequency, in radians per second.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// ζ: below 1 the spring oscillates, at or above 1 it does not.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Whether the response approaches its target without overshoot.
    pub fn is_monotonic(&self) -> bool {
        self.overshoot_clamping || self.damping_ratio() >= 1.0 - CRITICAL_EPSILON
    }

    /// Normalised response at `seconds` after release: 0 at rest, 1 at target.
    pub fn progress(&self, seconds: f64) -> f64 {
        if seconds <= 0.0 {
            return 0.0;
        }
        let p = step_response(self.natural_frequency(), self.damping_ratio(), seconds);
        if self.overshoot_clamping {
            p.min(1.0)
        } else {
            p
        }
    }

    /// First frame from which the spring stays within `epsilon` of its target.
    ///
    /// Returns `None` when that does not happen within a bounded scan, which
    /// is the case for an undamped spring.
    pub fn settle_frame(&self, fps: FrameRate, epsilon: f64) -> Option<i64> {
        if !fps.is_valid() || epsilon <= 0.0 {
            return None;
        }
        let rate = fps.to_fps_f64();
        let omega = self.natural_frequency();
        let zeta = self.damping_ratio();

        (0..MAX_SETTLE_FRAMES).find(|&frame| {
            let t = frame as f64 / rate;
            let residual = if zeta < 1.0 - CRITICAL_EPSILON {
                // Envelope of the oscillation bounds every later residual.
                (-zeta * omega * t).exp() / (1.0 - zeta * zeta).sqrt()
            } else {
                1.0 - self.progress(t)
            };
            residual.abs() < epsilon
        })
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(1.0, 100.0, 10.0)
    }
}

/// Value of a spring from `from` to `to`, `frame` frames after release.
///
/// Frames before release evaluate as the release frame.
pub fn spring(frame: f64, fps: FrameRate, from: f64, to: f64, config: &SpringConfig) -> f64 {
    let seconds = frame.max(0.0) / fps.to_fps_f64();
    from + (to - from) * config.progress(seconds)
}

/// Unit step response of `x'' + 2ζωx' + ω²x = ω²` with `x(0) = x'(0) = 0`.
fn step_response(omega: f64, zeta: f64, t: f64) -> f64 {
    if (zeta - 1.0).abs() < CRITICAL_EPSILON {
        let wt = omega * t;
        return 1.0 - (-wt).exp() * (1.0 + wt);
    }

    if zeta < 1.0 {
        let damped = omega * (1.0 - zeta * zeta).sqrt();
        let decay = (-zeta * omega * t).exp();
        return 1.0
            - decay * ((damped * t).cos() + (zeta * omega / damped) * (damped * t).sin());
    }

    // Overdamped: two real roots r1 > r2. r1 is written as ω / (ζ + s) to
    // avoid cancellation at large ζ.
    let s = (zeta * zeta - 1.0).sqrt();
    let r1 = -omega / (zeta + s);
    let r2 = -omega * (zeta + s);
    1.0 - (r2 * (r1 * t).exp() - r1 * (r2 * t).exp()) / (r2 - r1)
}
