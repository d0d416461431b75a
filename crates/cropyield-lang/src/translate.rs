//! Translator implementations.
//!
//! `GoogleTranslator` talks to the public `translate_a/single` endpoint with
//! a blocking client. `GlossaryTranslator` is an offline Tamil → English
//! table covering the crop vocabulary; set `APP_USE_FAKE_TRANSLATION=1` to
//! use it instead of the network.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use cropyield_core::config::TranslateSettings;
use cropyield_core::traits::Translator;
use reqwest::blocking::Client;
use serde_json::Value;

/// Blocking client for Google's public translation endpoint. No retries.
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        anyhow::ensure!(!base_url.trim().is_empty(), "missing translation base URL");
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build translation HTTP client")?;
        let endpoint = format!("{}/translate_a/single", base_url.trim_end_matches('/'));
        Ok(Self { client, endpoint })
    }

    pub fn from_settings(settings: &TranslateSettings) -> Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs.max(1)))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Translator for GoogleTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t"), ("q", text)])
            .send()
            .context("translation request failed")?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "<body unavailable>".to_string());
            bail!("translation request failed ({}): {}", status, body);
        }
        let payload: Value = resp.json().context("failed to parse translation response")?;
        parse_segments(&payload)
    }
}

/// Join the translated segments of a `translate_a/single` payload, shaped
/// like `[[["Paddy","நெல்",null,null,10]],null,"ta",...]`.
pub fn parse_segments(payload: &Value) -> Result<String> {
    let segments = payload
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("translation response has no segment list"))?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        bail!("translation response carried no text");
    }
    Ok(text)
}

const GLOSSARY: [(&str, &str); 8] = [
    ("நெல்", "paddy"),
    ("அரிசி", "rice"),
    ("மக்காச்சோளம்", "maize"),
    ("சோளம்", "corn"),
    ("கோதுமை", "wheat"),
    ("நிலக்கடலை", "groundnut"),
    ("வேர்க்கடலை", "ground nut"),
    ("கடலை", "groundnut"),
];

/// Offline Tamil → English lookup. Text without Tamil script is returned
/// unchanged, mirroring what the online service does for English input.
pub struct GlossaryTranslator {
    entries: HashMap<String, String>,
}

impl GlossaryTranslator {
    pub fn new() -> Self {
        Self::with_entries(GLOSSARY)
    }

    pub fn with_entries<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl Default for GlossaryTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for GlossaryTranslator {
    fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        if source != "ta" || target != "en" {
            bail!("glossary only covers ta -> en, not {source} -> {target}");
        }
        let key = text.trim();
        if !key.chars().any(is_tamil) {
            return Ok(text.to_string());
        }
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("no glossary entry for '{key}'"))
    }
}

fn is_tamil(ch: char) -> bool {
    ('\u{0B80}'..='\u{0BFF}').contains(&ch)
}

pub fn get_default_translator(settings: &TranslateSettings) -> Result<Arc<dyn Translator>> {
    let use_fake = std::env::var("APP_USE_FAKE_TRANSLATION")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        tracing::info!("using offline glossary translator");
        return Ok(Arc::new(GlossaryTranslator::new()));
    }
    let translator = GoogleTranslator::from_settings(settings)?;
    tracing::info!(endpoint = translator.endpoint(), "using remote translator");
    Ok(Arc::new(translator))
}
