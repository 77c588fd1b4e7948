//! Chunk paging.
//!
//! The service owns the resident table and is the only thing that moves a
//! chunk through its lifecycle:
//! 1. Check the resident table (loaded chunks are returned as-is)
//! 2. Otherwise generate from the key's seed and promote to loaded
//! 3. Mirror the result to the cache, if one is configured

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use geochunk_benchmark::StreamingMetrics;
use geochunk_core::{Chunk, ChunkKey, Mesh, Payload};
use geochunk_gen::{ContentGenerator, FeatureGenerator};
use geochunk_storage::ChunkCache;

use crate::config::GenerationMode;
use crate::error::StreamError;

pub struct ChunkStreamingService {
    // One lock covers check -> generate -> write-through, so a key is never
    // generated twice concurrently and snapshots never see a half-built chunk.
    chunks: Mutex<HashMap<ChunkKey, Chunk>>,
    generator: Box<dyn ContentGenerator>,
    cache: Option<Arc<dyn ChunkCache>>,
    mode: GenerationMode,
    metrics: Arc<StreamingMetrics>,
}

impl ChunkStreamingService {
    pub fn new(mode: GenerationMode, cache: Option<Arc<dyn ChunkCache>>) -> Self {
        Self::with_generator(Box::new(FeatureGenerator::new()), mode, cache)
    }

    pub fn with_generator(
        generator: Box<dyn ContentGenerator>,
        mode: GenerationMode,
        cache: Option<Arc<dyn ChunkCache>>,
    ) -> Self {
        Self {
            chunks: Mutex::new(HashMap::new()),
            generator,
            cache,
            mode,
            metrics: Arc::new(StreamingMetrics::default()),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<StreamingMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn metrics(&self) -> &Arc<StreamingMetrics> {
        &self.metrics
    }

    fn table(&self) -> MutexGuard<'_, HashMap<ChunkKey, Chunk>> {
        self.chunks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Return the loaded chunk for `key`, generating it if needed.
    ///
    /// A loaded resident chunk is returned unchanged without touching the
    /// generator or the cache. Anything else (absent, unloaded) starts a new
    /// lifecycle. When a cache is configured the chunk is written through
    /// before this returns; a failed write is reported as
    /// [`StreamError::Storage`] but the chunk stays loaded in memory.
    pub fn request_chunk(&self, key: ChunkKey) -> Result<Chunk, StreamError> {
        let mut chunks = self.table();

        if let Some(chunk) = chunks.get(&key) {
            if chunk.state.is_loaded() {
                self.metrics.record_fast_path_hit();
                log::trace!("chunk {} already loaded", key);
                return Ok(chunk.clone());
            }
        }
        self.metrics.record_fast_path_miss();

        let mut chunk = Chunk::new(key);
        let seed = match self.mode {
            GenerationMode::Deterministic => Some(key.seed()),
            GenerationMode::NonDeterministic => None,
        };

        let started = Instant::now();
        let content = self.generator.generate(seed);
        self.metrics.record_generation(started.elapsed());

        chunk.payload = Payload {
            features: content.features,
            seed,
            ..Default::default()
        };
        chunk.metadata = content.metadata;
        chunk.mark_loaded();
        log::debug!("generated chunk {} (seed {:?})", key, seed);

        chunks.insert(key, chunk.clone());
        self.write_through(&chunk)?;

        Ok(chunk)
    }

    /// Request each key in order. Stops at the first error; chunks requested
    /// before it stay loaded.
    pub fn request_many<I>(&self, keys: I) -> Result<Vec<Chunk>, StreamError>
    where
        I: IntoIterator<Item = ChunkKey>,
    {
        keys.into_iter().map(|key| self.request_chunk(key)).collect()
    }

    /// Transition a resident chunk to unloaded and evict its cache entry.
    ///
    /// The chunk stays in the resident table for inspection; requesting it
    /// again regenerates it.
    pub fn unload_chunk(&self, key: ChunkKey) -> Result<Chunk, StreamError> {
        let mut chunks = self.table();

        let Some(chunk) = chunks.get_mut(&key) else {
            return Err(StreamError::Lifecycle { key });
        };
        chunk.mark_unloaded();
        let unloaded = chunk.clone();
        self.metrics.record_unload();
        log::info!("unloaded chunk {}", key);

        if let Some(cache) = &self.cache {
            let started = Instant::now();
            if let Err(e) = cache.evict(&key) {
                self.metrics.record_storage_error();
                log::warn!("failed to evict chunk {} from cache: {}", key, e);
                return Err(e.into());
            }
            self.metrics.record_cache_evict(started.elapsed());
        }

        Ok(unloaded)
    }

    /// Snapshot of every resident chunk, in any state.
    pub fn get_loaded_chunks(&self) -> HashMap<ChunkKey, Chunk> {
        self.table().clone()
    }

    pub fn get_chunk(&self, key: &ChunkKey) -> Option<Chunk> {
        self.table().get(key).cloned()
    }

    /// Append collaborator meshes to a loaded chunk and re-store it.
    pub fn attach_meshes<I>(&self, key: ChunkKey, meshes: I) -> Result<Chunk, StreamError>
    where
        I: IntoIterator<Item = Mesh>,
    {
        let mut chunks = self.table();
        let chunk = match chunks.get_mut(&key) {
            Some(chunk) if chunk.state.is_loaded() => chunk,
            _ => return Err(StreamError::Lifecycle { key }),
        };
        let before = chunk.payload.meshes.len();
        chunk.payload.meshes.extend(meshes);
        log::debug!("attached {} meshes to chunk {}", chunk.payload.meshes.len() - before, key);

        let chunk = chunk.clone();
        self.write_through(&chunk)?;
        Ok(chunk)
    }

    /// Mutate a loaded chunk's payload in place. Nothing is written to the
    /// cache; call [`attach_meshes`](Self::attach_meshes) or re-store
    /// explicitly when persistence matters.
    pub fn with_payload_mut<R>(
        &self,
        key: ChunkKey,
        f: impl FnOnce(&mut Payload) -> R,
    ) -> Result<R, StreamError> {
        let mut chunks = self.table();
        match chunks.get_mut(&key) {
            Some(chunk) if chunk.state.is_loaded() => Ok(f(&mut chunk.payload)),
            _ => Err(StreamError::Lifecycle { key }),
        }
    }

    fn write_through(&self, chunk: &Chunk) -> Result<(), StreamError> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        let started = Instant::now();
        match cache.store(chunk) {
            Ok(()) => {
                self.metrics.record_cache_store(started.elapsed());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_storage_error();
                log::warn!("write-through for chunk {} failed: {}", chunk.key, e);
                Err(e.into())
            }
        }
    }
}

impl Default for ChunkStreamingService {
    fn default() -> Self {
        Self::new(GenerationMode::Deterministic, None)
    }
}
