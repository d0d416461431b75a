//! cropyield-lang
//!
//! Turns free-text crop names (Tamil or English) into canonical crops:
//! translation with graceful fallback, synonym substitution, and
//! `difflib`-style approximate matching against the closed vocabulary.
pub mod normalizer;
pub mod resolver;
pub mod similarity;
pub mod translate;

pub use normalizer::{LanguageNormalizer, Normalized};
pub use resolver::{CropMatch, CropResolver};
pub use similarity::{close_matches, SequenceMatcher};
pub use translate::{get_default_translator, GlossaryTranslator, GoogleTranslator};
