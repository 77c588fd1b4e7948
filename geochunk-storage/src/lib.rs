use std::path::PathBuf;

use geochunk_core::{Chunk, ChunkKey, Metadata, Payload};
use serde::{Deserialize, Serialize};

pub mod file;
pub mod memory;

pub use file::JsonFileCache;
pub use memory::MemoryCache;

/// Durable form of a chunk: everything except the lifecycle state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub key: ChunkKey,
    pub metadata: Metadata,
    pub payload: Payload,
}

impl CacheRecord {
    /// Snapshot a chunk for storage.
    ///
    /// Fails with [`CacheError::ReservedKey`] when an `extra` map reuses a
    /// named field, since the flattened document could not be read back.
    pub fn from_chunk(chunk: &Chunk) -> Result<Self, CacheError> {
        let reserved = chunk
            .metadata
            .reserved_extra_key()
            .or_else(|| chunk.payload.reserved_extra_key());
        if let Some(field) = reserved {
            return Err(CacheError::ReservedKey { key: chunk.key, field: field.to_string() });
        }
        Ok(Self {
            key: chunk.key,
            metadata: chunk.metadata.clone(),
            payload: chunk.payload.clone(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no cached record for chunk {key}")]
    NotFound { key: ChunkKey },
    #[error("chunk {key} uses reserved field name `{field}` in an extension map")]
    ReservedKey { key: ChunkKey, field: String },
    #[error("cache I/O failed at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache record at {} could not be encoded or decoded", .path.display())]
    Serde {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Key -> record mirror of in-memory chunk state.
///
/// The streaming service's resident table stays authoritative; a cache is
/// only a best-effort copy of the last stored state for each key.
pub trait ChunkCache: Send + Sync {
    /// Write (or overwrite) the record for `chunk.key`.
    fn store(&self, chunk: &Chunk) -> Result<(), CacheError>;

    /// Fails with [`CacheError::NotFound`] if the key was never stored.
    fn load(&self, key: &ChunkKey) -> Result<CacheRecord, CacheError>;

    /// Remove the record if present. Missing records are not an error.
    fn evict(&self, key: &ChunkKey) -> Result<(), CacheError>;
}
