use std::sync::Arc;

use cropyield_core::traits::Translator;

pub const DEFAULT_SOURCE_LANG: &str = "ta";
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Outcome of normalizing crop text. `Fallback` means the translator failed
/// and the raw input (lowercased) is used as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    Empty,
    Translated(String),
    Fallback { text: String, reason: String },
}

impl Normalized {
    pub fn text(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Translated(text) | Self::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Translates crop text into English before resolution. Never fails and
/// never retries.
pub struct LanguageNormalizer {
    translator: Arc<dyn Translator>,
    source: String,
    target: String,
}

impl LanguageNormalizer {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator,
            source: DEFAULT_SOURCE_LANG.to_string(),
            target: DEFAULT_TARGET_LANG.to_string(),
        }
    }

    pub fn with_languages(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source = source.into();
        self.target = target.into();
        self
    }

    pub fn normalize(&self, text: &str) -> Normalized {
        if text.is_empty() {
            return Normalized::Empty;
        }
        match self.translator.translate(text, &self.source, &self.target) {
            Ok(translated) => {
                let translated = translated.to_lowercase();
                tracing::debug!(input = text, output = %translated, "translated crop text");
                Normalized::Translated(translated)
            }
            Err(err) => {
                tracing::warn!(input = text, error = %err, "translation failed, using raw crop text");
                Normalized::Fallback { text: text.to_lowercase(), reason: format!("{err:#}") }
            }
        }
    }
}
