//! Piecewise-linear curve evaluation.
//!
//! Maps a frame position to a scalar through one or more linear segments.
//! What happens outside the breakpoints is chosen per side.

use serde::{Deserialize, Serialize};

use crate::error::{MontageError, Result};

// ── Extrapolation ───────────────────────────────────────────────

/// Behaviour of a curve outside its breakpoints, on one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Extrapolate {
    /// Keep following the nearest segment's slope.
    #[default]
    Extend,
    /// Hold the nearest endpoint value.
    Clamp,
    /// Return the input unchanged.
    Identity,
}

/// Left and right extrapolation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Extrapolation {
    pub left: Extrapolate,
    pub right: Extrapolate,
}

impl Extrapolation {
    pub const fn new(left: Extrapolate, right: Extrapolate) -> Self {
        Self { left, right }
    }

    pub const EXTEND: Self = Self::new(Extrapolate::Extend, Extrapolate::Extend);
    pub const CLAMP: Self = Self::new(Extrapolate::Clamp, Extrapolate::Clamp);
}

// ── Evaluation ──────────────────────────────────────────────────

/// Map `frame` from `domain` onto `range` along a straight line.
///
/// `domain` is expected to be ascending. A degenerate domain (`d0 == d1`)
/// behaves as a step at `d0`.
pub fn linear_map(
    frame: f64,
    domain: [f64; 2],
    range: [f64; 2],
    extrapolation: Extrapolation,
) -> f64 {
    let [d0, d1] = domain;
    let [r0, r1] = range;

    if frame < d0 {
        match extrapolation.left {
            Extrapolate::Clamp => return r0,
            Extrapolate::Identity => return frame,
            Extrapolate::Extend => {}
        }
    }
    if frame > d1 {
        match extrapolation.right {
            Extrapolate::Clamp => return r1,
            Extrapolate::Identity => return frame,
            Extrapolate::Extend => {}
        }
    }

    let span = d1 - d0;
    if span <= 0.0 {
        return if frame < d0 { r0 } else { r1 };
    }
    r0 + (r1 - r0) * ((frame - d0) / span)
}

/// Piecewise-linear interpolation across ascending `breakpoints`.
///
/// `values[i]` is the value at `breakpoints[i]`. Between breakpoints the
/// bracketing segment is used; outside them, `extrapolation` decides.
pub fn interpolate(
    frame: f64,
    breakpoints: &[f64],
    values: &[f64],
    extrapolation: Extrapolation,
) -> Result<f64> {
    validate_breakpoints(breakpoints, values)?;

    let last_segment = breakpoints.len() - 2;
    let segment = breakpoints
        .partition_point(|b| *b <= frame)
        .saturating_sub(1)
        .min(last_segment);

    Ok(linear_map(
        frame,
        [breakpoints[segment], breakpoints[segment + 1]],
        [values[segment], values[segment + 1]],
        extrapolation,
    ))
}

/// [`interpolate`] clamped on both sides.
pub fn piecewise_linear(frame: f64, breakpoints: &[f64], values: &[f64]) -> Result<f64> {
    interpolate(frame, breakpoints, values, Extrapolation::CLAMP)
}

fn validate_breakpoints(breakpoints: &[f64], values: &[f64]) -> Result<()> {
    if breakpoints.len() != values.len() {
        return Err(MontageError::config(format!(
            "curve has {} breakpoints but {} values",
            breakpoints.len(),
            values.len()
        )));
    }
    if breakpoints.len() < 2 {
        return Err(MontageError::config(
            "curve needs at least two breakpoints",
        ));
    }
    if breakpoints.iter().chain(values).any(|v| !v.is_finite()) {
        return Err(MontageError::config("curve contains a non-finite point"));
    }
    if let Some(pair) = breakpoints.windows(2).find(|w| w[0] >= w[1]) {
        return Err(MontageError::config(format!(
            "curve breakpoints must be strictly ascending, found {} then {}",
            pair[0], pair[1]
        )));
    }
    Ok(())
}

// ── Tests ───────────────────────────────────────────────────────
