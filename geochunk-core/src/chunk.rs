use serde::{Deserialize, Serialize};

use crate::key::ChunkKey;
use crate::payload::{Metadata, Payload};

/// Lifecycle states for streamed geographic chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkState {
    /// Only initial state. Promoted as soon as generation completes.
    #[default]
    Requested,
    Loaded,
    Unloaded,
}

impl ChunkState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ChunkState::Loaded)
    }
}

/// Runtime representation of a chunk and its simulation payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub key: ChunkKey,
    pub state: ChunkState,
    pub metadata: Metadata,
    pub payload: Payload,
}

impl Chunk {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            state: ChunkState::Requested,
            metadata: Metadata::default(),
            payload: Payload::default(),
        }
    }

    pub fn mark_loaded(&mut self) {
        self.state = ChunkState::Loaded;
    }

    /// Metadata is kept; payload must not be read after this.
    pub fn mark_unloaded(&mut self) {
        self.state = ChunkState::Unloaded;
        self.payload.clear();
    }
}
