use std::path::PathBuf;
use std::sync::Arc;

use geochunk_benchmark::StreamingMetrics;
use geochunk_storage::{CacheError, ChunkCache, JsonFileCache};
use serde::{Deserialize, Serialize};

use crate::service::ChunkStreamingService;

/// Whether generation is seeded from the chunk key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    #[default]
    Deterministic,
    NonDeterministic,
}

/// Construction-time settings for a streaming service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    pub mode: GenerationMode,
    /// Root of the on-disk cache. No cache when `None`.
    pub cache_dir: Option<PathBuf>,
}

impl StreamingConfig {
    pub fn summary(&self) -> String {
        let mode = match self.mode {
            GenerationMode::Deterministic => "deterministic",
            GenerationMode::NonDeterministic => "non-deterministic",
        };
        match &self.cache_dir {
            Some(dir) => format!("{}, cache at {}", mode, dir.display()),
            None => format!("{}, no cache", mode),
        }
    }

    /// Build a service with the default feature generator.
    pub fn build(&self) -> Result<ChunkStreamingService, CacheError> {
        let cache = match &self.cache_dir {
            Some(dir) => Some(Arc::new(JsonFileCache::open(dir)?) as Arc<dyn ChunkCache>),
            None => None,
        };
        let metrics = Arc::new(StreamingMetrics::new(self.summary()));
        Ok(ChunkStreamingService::new(self.mode, cache).with_metrics(metrics))
    }
}
