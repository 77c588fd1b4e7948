use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use geochunk_core::{Chunk, ChunkKey};

use crate::{CacheError, CacheRecord, ChunkCache};

/// In-process cache. Same contract as the file cache, nothing touches disk.
#[derive(Default)]
pub struct MemoryCache {
    records: Mutex<HashMap<ChunkKey, CacheRecord>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &ChunkKey) -> bool {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).contains_key(key)
    }
}

impl ChunkCache for MemoryCache {
    fn store(&self, chunk: &Chunk) -> Result<(), CacheError> {
        let record = CacheRecord::from_chunk(chunk)?;
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(chunk.key, record);
        Ok(())
    }

    fn load(&self, key: &ChunkKey) -> Result<CacheRecord, CacheError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
            .ok_or(CacheError::NotFound { key: *key })
    }

    fn evict(&self, key: &ChunkKey) -> Result<(), CacheError> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}
