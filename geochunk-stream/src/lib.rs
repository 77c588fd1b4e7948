//! Deterministic chunk streaming.
//!
//! [`ChunkStreamingService`] is the entry point other subsystems call: it
//! pages chunks in by key, generates their content from the key's seed, and
//! mirrors them to an optional [`ChunkCache`](geochunk_storage::ChunkCache).

pub mod config;
pub mod error;
pub mod service;
pub mod traversal;

pub use config::{GenerationMode, StreamingConfig};
pub use error::StreamError;
pub use service::ChunkStreamingService;
pub use traversal::TraversalController;
