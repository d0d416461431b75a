use std::sync::Arc;

use cropyield_core::CropCatalog;

use crate::similarity::close_matches;

/// A crop the resolver settled on.
#[derive(Debug, Clone, PartialEq)]
pub struct CropMatch {
    pub crop: String,
    pub code: usize,
    /// Similarity in `[0, 1]` between the (substituted) text and `crop`.
    pub score: f64,
    pub via_synonym: bool,
}

/// Maps normalized text onto the closed crop vocabulary: synonym
/// substitution first, then approximate matching above `cutoff`.
#[derive(Clone)]
pub struct CropResolver {
    catalog: Arc<CropCatalog>,
    cutoff: f64,
}

impl CropResolver {
    pub const DEFAULT_CUTOFF: f64 = 0.6;

    pub fn new(catalog: Arc<CropCatalog>) -> Self {
        Self { catalog, cutoff: Self::DEFAULT_CUTOFF }
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// `None` means no vocabulary entry clears the cutoff; callers must
    /// reject the request instead of picking a default crop.
    pub fn resolve(&self, normalized: &str) -> Option<CropMatch> {
        let candidate = self.catalog.synonyms().substitute(normalized);
        let vocabulary = self.catalog.vocabulary();

        let (score, crop) = close_matches(candidate, vocabulary.names().iter().map(String::as_str), 1, self.cutoff)
            .into_iter()
            .next()?;
        let code = vocabulary.code_of(crop)?;
        tracing::debug!(input = normalized, crop, score, "resolved crop");
        Some(CropMatch { crop: crop.to_string(), code, score, via_synonym: candidate != normalized })
    }
}
