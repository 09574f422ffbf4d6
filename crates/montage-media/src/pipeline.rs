//! Resolve-then-build: turn a timeline config into a built timeline.
//!
//! Every clip length is known before layout runs. If any clip fails to
//! resolve, the whole build fails and no layout is attempted.

use montage_core::{MontageError, Result};
use montage_timeline::{ClipConfig, ClipSpec, MediaHandle, Timeline, TimelineConfig};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{MediaError, MediaResult};
use crate::resolve::DurationResolver;

/// Per-clip budget for a single resolver call.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolve the source length of every clip that does not carry one.
///
/// Clips with an inline duration never reach the resolver. The first
/// failure aborts the whole list.
pub async fn resolve_specs<R: DurationResolver>(
    clips: &[ClipConfig],
    resolver: &R,
    timeout: Duration,
) -> Result<Vec<ClipSpec>> {
    let mut specs = Vec::with_capacity(clips.len());

    for clip in clips {
        if let Some(spec) = clip.inline_spec() {
            specs.push(spec);
            continue;
        }

        let frames = resolve_one(&clip.media, resolver, timeout)
            .await
            .map_err(|e| {
                warn!(media = %clip.media, error = %e, "Duration resolution failed");
                MontageError::Resolution {
                    media: clip.media.to_string(),
                    reason: e.to_string(),
                }
            })?;

        debug!(media = %clip.media, frames, "Resolved clip duration");
        specs.push(clip.to_spec(frames));
    }

    info!(clips = specs.len(), "Clip durations resolved");
    Ok(specs)
}

async fn resolve_one<R: DurationResolver>(
    media: &MediaHandle,
    resolver: &R,
    timeout: Duration,
) -> MediaResult<u32> {
    let frames = tokio::time::timeout(timeout, resolver.resolve_duration(media))
        .await
        .map_err(|_| MediaError::Timeout {
            media: media.to_string(),
            timeout,
        })??;

    if frames == 0 {
        return Err(MediaError::InvalidDuration {
            media: media.to_string(),
            reason: "resolver reported zero frames".to_string(),
        });
    }
    Ok(frames)
}

/// Resolve every clip of `config`, then build its timeline.
///
/// A config whose clips all carry inline durations never touches the resolver.
pub async fn build_timeline<R: DurationResolver>(
    config: &TimelineConfig,
    resolver: &R,
    timeout: Duration,
) -> Result<Timeline> {
    let specs = if config.clips.iter().all(|c| c.raw_duration_frames.is_some()) {
        debug!(clips = config.clips.len(), "Every clip duration is inline");
        config.inline_specs()?
    } else {
        resolve_specs(&config.clips, resolver, timeout).await?
    };
    Timeline::build(&specs, &config.settings())
}
