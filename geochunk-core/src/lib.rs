//! Chunk data model shared by the generator, the cache and the streaming
//! service.

pub mod chunk;
pub mod key;
pub mod payload;

pub use chunk::{Chunk, ChunkState};
pub use key::{ChunkKey, Direction};
pub use payload::{Biome, Feature, Mesh, Metadata, Payload};
