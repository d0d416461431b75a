use crate::features::FeatureVector;
use crate::types::RawPrediction;

/// A trained regressor mapping the 12-slot feature vector to a raw,
/// still log-transformed, yield.
pub trait YieldModel: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<RawPrediction>;
}

/// Best-effort text translation between two language codes.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, source: &str, target: &str) -> anyhow::Result<String>;
}
