//! Frame rates and rational time.
//!
//! Frame positions on the timeline are plain integers. Rational time is only
//! used where frames are handed to something that thinks in seconds, such as
//! the external media player seeking into a source file.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A point in time in seconds, stored as an exact rational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    value: Rational64,
}

impl RationalTime {
    /// `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Time of the first instant of `frames` at the given rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self {
            value: Rational64::new(frames * rate.denominator as i64, rate.numerator as i64),
        }
    }

    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Frame containing this instant at the given rate (floored).
    #[inline]
    pub fn to_frames(self, rate: FrameRate) -> i64 {
        let frames = self.value * Rational64::new(rate.numerator as i64, rate.denominator as i64);
        frames.floor().to_integer()
    }

    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
///
/// Supplied by the hosting renderer and constant for a whole timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FrameRate {
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Integer frames per second.
    #[inline]
    pub const fn from_fps(fps: u32) -> Self {
        Self::new(fps, 1)
    }

    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// A rate of zero (or with a zero denominator) cannot time anything.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// A time range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    #[inline]
    pub fn from_start_end(start: RationalTime, end: RationalTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        time >= self.start && time < self.end()
    }
}
