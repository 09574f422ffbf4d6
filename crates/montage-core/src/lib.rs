//! Montage Core - Foundation types for the timeline scheduler
//!
//! This crate provides the pieces every other Montage crate builds on:
//! - Error type shared by layout, scheduling and resolution
//! - Frame rates and rational time (FrameRate, RationalTime, TimeRange)
//! - Curve evaluation: piecewise-linear maps and spring approach curves

pub mod curve;
pub mod error;
pub mod spring;
pub mod time;

pub use curve::{interpolate, linear_map, piecewise_linear, Extrapolate, Extrapolation};
pub use error::{MontageError, Result};
pub use spring::{spring, SpringConfig};
pub use time::{FrameRate, RationalTime, TimeRange};
