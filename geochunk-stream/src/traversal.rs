use geochunk_core::{ChunkKey, Direction};

use crate::error::StreamError;
use crate::service::ChunkStreamingService;

/// Moves a cursor key around the grid and pages in each key it lands on.
pub struct TraversalController {
    current: ChunkKey,
}

impl TraversalController {
    pub fn new(origin: ChunkKey) -> Self {
        Self { current: origin }
    }

    pub fn current(&self) -> ChunkKey {
        self.current
    }

    /// Step once and request the new key. On error the cursor still moves,
    /// since the chunk itself is resident; only the cache mirror failed.
    pub fn step(
        &mut self,
        service: &ChunkStreamingService,
        direction: Direction,
    ) -> Result<ChunkKey, StreamError> {
        self.current = self.current.step(direction);
        service.request_chunk(self.current)?;
        Ok(self.current)
    }

    /// Apply each direction in order and return every key visited.
    pub fn walk<I>(
        &mut self,
        service: &ChunkStreamingService,
        directions: I,
    ) -> Result<Vec<ChunkKey>, StreamError>
    where
        I: IntoIterator<Item = Direction>,
    {
        directions.into_iter().map(|direction| self.step(service, direction)).collect()
    }
}
