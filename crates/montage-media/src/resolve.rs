//! Duration resolvers: learn how long a media source is, in frames.

use montage_timeline::MediaHandle;
use std::collections::HashMap;
use std::future::Future;
use std::path::Path;
use tracing::info;

use crate::error::{MediaError, MediaResult};

/// Source of clip lengths.
///
/// Implementations may do I/O; the pipeline awaits one call per clip that
/// does not already carry its duration.
pub trait DurationResolver: Send + Sync {
    /// Full decodable length of `media`, in frames at the timeline rate.
    fn resolve_duration(
        &self,
        media: &MediaHandle,
    ) -> impl Future<Output = MediaResult<u32>> + Send;
}

/// In-memory table of known durations.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    durations: HashMap<MediaHandle, u32>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, media: impl Into<MediaHandle>, frames: u32) -> Self {
        self.insert(media, frames);
        self
    }

    pub fn insert(&mut self, media: impl Into<MediaHandle>, frames: u32) {
        self.durations.insert(media.into(), frames);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    fn lookup(&self, media: &MediaHandle) -> MediaResult<u32> {
        self.durations
            .get(media)
            .copied()
            .ok_or_else(|| MediaError::NotFound {
                media: media.to_string(),
            })
    }
}

impl DurationResolver for StaticResolver {
    async fn resolve_duration(&self, media: &MediaHandle) -> MediaResult<u32> {
        self.lookup(media)
    }
}

/// Durations read from a JSON manifest: `{ "video1.mp4": 160, ... }`.
#[derive(Debug, Clone, Default)]
pub struct ManifestResolver {
    table: StaticResolver,
}

impl ManifestResolver {
    /// Parse a manifest from JSON bytes.
    pub fn from_json(data: &[u8]) -> MediaResult<Self> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_slice(data)
            .map_err(|e| MediaError::Manifest(format!("Invalid manifest JSON: {}", e)))?;

        let mut table = StaticResolver::new();
        for (media, value) in raw {
            let frames = value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| MediaError::InvalidDuration {
                    media: media.clone(),
                    reason: format!("expected a frame count, found {}", value),
                })?;
            table.insert(media, frames);
        }
        Ok(Self { table })
    }

    /// Read and parse a manifest file.
    pub async fn load(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let resolver = Self::from_json(&data)?;
        info!(
            path = %path.display(),
            entries = resolver.table.len(),
            "Loaded duration manifest"
        );
        Ok(resolver)
    }
}

impl DurationResolver for ManifestResolver {
    async fn resolve_duration(&self, media: &MediaHandle) -> MediaResult<u32> {
        self.table.lookup(media)
    }
}
