use geochunk_core::{Feature, Metadata};

/// Output of a single generation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedContent {
    pub features: Vec<Feature>,
    pub metadata: Metadata,
}

/// Produces chunk content from a seed.
///
/// `None` selects non-deterministic generation. Generation is total: it
/// cannot fail for any seed.
pub trait ContentGenerator: Send + Sync {
    fn generate(&self, seed: Option<u32>) -> GeneratedContent;
}

pub mod features;

pub use features::FeatureGenerator;
