//! Chunk identity.
//!
//! A chunk is addressed by integer tile coordinates plus a level of detail.
//! The key also derives the 32-bit seed used for content generation.

use std::fmt;

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Uniquely identifies a chunk using integer tile coordinates and LOD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkKey {
    pub latitude: i32,
    pub longitude: i32,
    pub level_of_detail: i32,
}

/// Directional delta applied to a key by traversal code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl ChunkKey {
    pub const fn new(latitude: i32, longitude: i32, level_of_detail: i32) -> Self {
        Self { latitude, longitude, level_of_detail }
    }

    /// Deterministic 32-bit seed for this key.
    ///
    /// FNV-1a (64-bit) over the little-endian bytes of latitude, longitude and
    /// level of detail, in that order, masked to the low 32 bits. The value
    /// is identical across runs, platforms and implementations.
    pub fn seed(&self) -> u32 {
        let mut hash = FNV_OFFSET_BASIS;
        for field in [self.latitude, self.longitude, self.level_of_detail] {
            for byte in field.to_le_bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        (hash & 0xFFFF_FFFF) as u32
    }

    /// Neighbouring key one tile away. LOD is unchanged.
    pub fn step(&self, direction: Direction) -> Self {
        let (d_lat, d_lon) = match direction {
            Direction::North => (1, 0),
            Direction::South => (-1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        };
        Self {
            latitude: self.latitude.wrapping_add(d_lat),
            longitude: self.longitude.wrapping_add(d_lon),
            level_of_detail: self.level_of_detail,
        }
    }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.latitude, self.longitude, self.level_of_detail)
    }
}

impl Direction {
    /// Parse a compass shorthand (`n`, `south`, ...). Case-insensitive.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }
}
