use crate::{ContentGenerator, GeneratedContent};
use geochunk_core::{Biome, Feature, Metadata};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub const FEATURES_PER_CHUNK: u32 = 5;

const ELEVATION_MAX: f64 = 1250.0;
const TEMPERATURE_MIN: f64 = -10.0;
const TEMPERATURE_MAX: f64 = 35.0;

/// Synthetic feature + environment generator.
///
/// Draw order per call, from one stream seeded once:
/// 1. for each feature id 0..5: biome, then resource density
/// 2. elevation
/// 3. temperature
///
/// Reordering draws changes every output for a given seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct FeatureGenerator;

impl FeatureGenerator {
    pub fn new() -> Self {
        Self
    }

    fn rng_for(seed: Option<u32>) -> Pcg64Mcg {
        match seed {
            Some(seed) => Pcg64Mcg::seed_from_u64(seed as u64),
            None => Pcg64Mcg::from_rng(&mut rand::rng()),
        }
    }
}

impl ContentGenerator for FeatureGenerator {
    fn generate(&self, seed: Option<u32>) -> GeneratedContent {
        let mut rng = Self::rng_for(seed);

        let mut features = Vec::with_capacity(FEATURES_PER_CHUNK as usize);
        for id in 0..FEATURES_PER_CHUNK {
            let biome = Biome::ALL[rng.random_range(0..Biome::ALL.len() as u32) as usize];
            // Rounding can push 0.99996.. up to 1.0; keep it inside [0, 1).
            let resource_density = round_to(rng.random::<f64>(), 4).min(0.9999);
            features.push(Feature { id, biome, resource_density });
        }

        let metadata = Metadata {
            elevation: round_to(rng.random_range(0.0..=ELEVATION_MAX), 3),
            temperature: round_to(rng.random_range(TEMPERATURE_MIN..=TEMPERATURE_MAX), 2),
            ..Default::default()
        };

        log::trace!("generated {} features (seed {:?})", features.len(), seed);
        GeneratedContent { features, metadata }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}
