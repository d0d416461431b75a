//! cropyield-service
//!
//! End-to-end prediction contract: model availability check, crop
//! normalization and resolution, feature assembly, model call, log
//! reversal and rounding. Every failure comes back as one `Error`; nothing
//! here is allowed to take the host process down.
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use cropyield_core::config::Settings;
use cropyield_core::features::FeatureVector;
use cropyield_core::traits::YieldModel;
use cropyield_core::{Error, Prediction, PredictionRequest};
use cropyield_lang::{get_default_translator, CropResolver, LanguageNormalizer};
use cropyield_model::load_for_serving;

pub const LIVENESS_MESSAGE: &str = "Crop Yield Prediction API is running!";

pub struct PredictionService {
    model: Option<Arc<dyn YieldModel>>,
    normalizer: LanguageNormalizer,
    resolver: CropResolver,
}

impl PredictionService {
    pub fn new(model: Option<Arc<dyn YieldModel>>, normalizer: LanguageNormalizer, resolver: CropResolver) -> Self {
        Self { model, normalizer, resolver }
    }

    /// Wire the service from settings. Relative model paths are taken from
    /// `base_dir`. Only configuration problems are fatal; a model that fails
    /// to load leaves the service up but unable to predict.
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> Result<Self> {
        let catalog = Arc::new(settings.catalog.build()?);
        let translator = get_default_translator(&settings.translate)?;
        let normalizer = LanguageNormalizer::new(translator)
            .with_languages(settings.translate.source.clone(), settings.translate.target.clone());
        let resolver = CropResolver::new(catalog).with_cutoff(settings.resolver.cutoff);
        let model = load_for_serving(&settings.model.resolved_path(base_dir));
        Ok(Self::new(model, normalizer, resolver))
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Handle a raw request body. The model check comes first, so an
    /// unloaded model wins over a malformed body.
    pub fn handle(&self, body: &[u8]) -> Result<Prediction, Error> {
        if self.model.is_none() {
            return Err(Error::ModelUnavailable);
        }
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let req = parse_request(body)?;
            self.predict(&req)
        }));
        outcome.unwrap_or_else(|payload| {
            let detail = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(%detail, "prediction pipeline panicked");
            Err(Error::Internal(format!("Internal error: {detail}")))
        })
    }

    pub fn predict(&self, req: &PredictionRequest) -> Result<Prediction, Error> {
        let model = self.model.as_ref().ok_or(Error::ModelUnavailable)?;

        let crop_text = req.crop_text();
        let normalized = self.normalizer.normalize(crop_text);
        let Some(crop) = self.resolver.resolve(normalized.text()) else {
            tracing::info!(input = crop_text, normalized = normalized.text(), "unknown crop");
            return Err(Error::UnknownCrop(crop_text.to_string()));
        };

        let features = FeatureVector::build(req, crop.code);
        tracing::debug!(crop = %crop.crop, features = ?features.as_slice(), "invoking model");
        let raw = model
            .predict(&features)
            .and_then(|p| p.into_scalar())
            .map_err(|e| Error::Internal(format!("Model prediction failed: {e:#}")))?;

        let predicted_yield = round2(reverse_log1p(raw));
        if !predicted_yield.is_finite() {
            return Err(Error::Internal(format!("Model produced a non-finite prediction ({raw})")));
        }
        tracing::info!(crop = %crop.crop, predicted_yield, fallback = normalized.is_fallback(), "prediction served");
        Ok(Prediction { predicted_yield, final_crop_used: crop.crop })
    }
}

fn parse_request(body: &[u8]) -> Result<PredictionRequest, Error> {
    serde_json::from_slice(body).map_err(|e| Error::Internal(format!("Invalid request body: {e}")))
}

/// Undo the training-time `log1p`. When `exp` overflows the raw value is
/// reported unchanged.
pub fn reverse_log1p(raw: f64) -> f64 {
    let y = raw.exp() - 1.0;
    if y.is_finite() {
        y
    } else {
        raw
    }
}

/// Round to two decimals on the exact decimal expansion of `x`, ties to
/// even. `0.015` is stored just below the tie and rounds to `0.01`.
pub fn round2(x: f64) -> f64 {
    if !x.is_finite() {
        return x;
    }
    format!("{x:.2}").parse().unwrap_or(x)
}
