//! Montage Timeline - Clip layout and frame scheduling
//!
//! Turns an ordered list of clips into a frame-accurate schedule:
//! - Clip specs with trim and playback rate
//! - Back-to-back layout with crossfade windows on every boundary
//! - Spring-driven overlay entrance animation
//! - Per-frame sampling for the external renderer
//! - Versioned timeline config files

pub mod clip;
pub mod layout;
pub mod overlay;
pub mod schedule;
pub mod serialization;

pub use clip::{ClipSpec, MediaHandle, PlacedClip};
pub use layout::{layout, Layout, TransitionWindow, DEFAULT_FADE_HALF_WIDTH};
pub use overlay::{OverlayAnimation, SpringChannel};
pub use schedule::{FrameSample, Timeline, TimelineSettings};
pub use serialization::{ClipConfig, TimelineConfig, TimelineFile};
