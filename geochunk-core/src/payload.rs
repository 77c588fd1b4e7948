//! Generated chunk content.
//!
//! Field names match the persisted record layout, so these types serialize
//! straight into cache documents.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque mesh object attached by a mesh producer. Never interpreted here.
pub type Mesh = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Tundra,
    Temperate,
    Desert,
    Forest,
    Alpine,
}

impl Biome {
    /// Fixed draw table. The index order is part of the generation contract.
    pub const ALL: [Biome; 5] = [
        Biome::Tundra,
        Biome::Temperate,
        Biome::Desert,
        Biome::Forest,
        Biome::Alpine,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: u32,
    pub biome: Biome,
    pub resource_density: f64,
}

/// Derived environmental scalars. Retained after unload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub elevation: f64,
    pub temperature: f64,
    /// Additional scalars. Must not use a name from [`Metadata::RESERVED_KEYS`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Metadata {
    /// Field names `extra` would collide with on the wire.
    pub const RESERVED_KEYS: [&'static str; 2] = ["elevation", "temperature"];

    /// First `extra` key that shadows a named field, if any.
    pub fn reserved_extra_key(&self) -> Option<&str> {
        first_reserved(&self.extra, &Self::RESERVED_KEYS)
    }
}

/// Transient chunk content. Cleared on unload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    /// Seed the features were drawn from; `None` in non-deterministic mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meshes: Vec<Mesh>,
    /// Other collaborator data. Must not use a name from
    /// [`Payload::RESERVED_KEYS`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Payload {
    /// Field names `extra` would collide with on the wire.
    pub const RESERVED_KEYS: [&'static str; 3] = ["features", "seed", "meshes"];

    /// First `extra` key that shadows a named field, if any.
    pub fn reserved_extra_key(&self) -> Option<&str> {
        first_reserved(&self.extra, &Self::RESERVED_KEYS)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
            && self.seed.is_none()
            && self.meshes.is_empty()
            && self.extra.is_empty()
    }

    pub fn clear(&mut self) {
        self.features.clear();
        self.seed = None;
        self.meshes.clear();
        self.extra.clear();
    }
}

fn first_reserved<'a>(extra: &'a Map<String, Value>, reserved: &[&str]) -> Option<&'a str> {
    extra.keys().map(String::as_str).find(|key| reserved.contains(key))
}
