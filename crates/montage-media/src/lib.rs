//! Montage Media - Clip metadata resolution
//!
//! The only asynchronous step of building a timeline: learning how long
//! each source is before layout runs.
//! - `DurationResolver` seam with static and manifest-backed resolvers
//! - Resolve-then-build pipeline with per-clip timeouts

pub mod error;
pub mod pipeline;
pub mod resolve;

pub use error::{MediaError, MediaResult};
pub use pipeline::{build_timeline, resolve_specs, DEFAULT_RESOLVE_TIMEOUT};
pub use resolve::{DurationResolver, ManifestResolver, StaticResolver};
