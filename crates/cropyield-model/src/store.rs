use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use cropyield_core::traits::YieldModel;
use tempfile::NamedTempFile;

use crate::persisted::PersistedModel;

pub fn load_model(path: &Path) -> Result<PersistedModel> {
    let file = File::open(path).with_context(|| format!("failed to open model file {}", path.display()))?;
    let model: PersistedModel = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse model file {}", path.display()))?;
    model
        .validate()
        .with_context(|| format!("model file {} is malformed", path.display()))?;
    Ok(model)
}

/// Write through a temp file in the target directory, then rename, so a
/// reader never sees a half-written model.
pub fn save_model(model: &PersistedModel, path: &Path) -> Result<()> {
    model.validate()?;
    let parent_dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        serde_json::to_writer_pretty(&mut writer, model)?;
        writer.flush()?;
    }
    temp_file
        .persist(path)
        .with_context(|| format!("failed to persist model to {}", path.display()))?;
    Ok(())
}

/// Startup loader. A missing or broken model file is logged and yields
/// `None`; the service then answers every prediction with "Model not loaded"
/// instead of refusing to start.
pub fn load_for_serving(path: &Path) -> Option<Arc<dyn YieldModel>> {
    match load_model(path) {
        Ok(model) => {
            tracing::info!(path = %path.display(), kind = model.kind(), "model loaded");
            Some(Arc::new(model))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %format!("{err:#}"), "model not loaded");
            None
        }
    }
}
