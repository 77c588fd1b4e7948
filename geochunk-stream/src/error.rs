use geochunk_core::ChunkKey;
use geochunk_storage::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Operation on a chunk that is not resident (or not loaded, for
    /// payload mutation). Recoverable; the resident table is unchanged.
    #[error("chunk {key} is not loaded")]
    Lifecycle { key: ChunkKey },
    /// Cache write-through or eviction failed. In-memory state is already
    /// committed when this is returned.
    #[error("chunk cache operation failed")]
    Storage(#[from] CacheError),
}

impl StreamError {
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, StreamError::Lifecycle { .. })
    }
}
