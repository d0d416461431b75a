//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates nested keys, e.g. `APP_SERVER__BIND`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::vocabulary::{CropCatalog, DEFAULT_CROPS, DEFAULT_SYNONYMS};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        settings.validate()?;
        match env {
            "prod" | "production" => {
                if settings.model.path.trim().is_empty() {
                    return Err(Error::InvalidConfig("model.path is required in production".into()).into());
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub model: ModelSettings,
    pub translate: TranslateSettings,
    pub resolver: ResolverSettings,
    /// Left out of the defaults layer: a configured catalog replaces the
    /// built-in one rather than merging into it.
    #[serde(skip_serializing)]
    pub catalog: CatalogSettings,
    pub probe: ProbeSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), Error> {
        let cutoff = self.resolver.cutoff;
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(Error::InvalidConfig(format!("resolver.cutoff must lie in [0, 1], got {cutoff}")));
        }
        if self.translate.source.trim().is_empty() || self.translate.target.trim().is_empty() {
            return Err(Error::InvalidConfig("translate.source and translate.target are required".into()));
        }
        // Catalog problems (duplicates, dangling synonyms) surface here rather than per request.
        self.catalog.build()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: "0.0.0.0:5000".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub path: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self { path: "crop_yield_model.json".to_string() }
    }
}

impl ModelSettings {
    /// Model file location; relative paths are taken from `base`.
    pub fn resolved_path(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateSettings {
    pub base_url: String,
    pub timeout_secs: u64,
    pub source: String,
    pub target: String,
}

impl Default for TranslateSettings {
    fn default() -> Self {
        Self {
            base_url: "https://translate.googleapis.com".to_string(),
            timeout_secs: 10,
            source: "ta".to_string(),
            target: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    pub cutoff: f64,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self { cutoff: 0.6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_crops")]
    pub crops: Vec<String>,
    #[serde(default = "default_synonyms")]
    pub synonyms: BTreeMap<String, String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { crops: default_crops(), synonyms: default_synonyms() }
    }
}

fn default_crops() -> Vec<String> {
    DEFAULT_CROPS.iter().map(|s| s.to_string()).collect()
}

fn default_synonyms() -> BTreeMap<String, String> {
    DEFAULT_SYNONYMS.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

impl CatalogSettings {
    pub fn build(&self) -> Result<CropCatalog, Error> {
        CropCatalog::from_lists(&self.crops, &self.synonyms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub url: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self { url: "http://127.0.0.1:5000/predict".to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
