//! Positional feature schema expected by the trained regressor.
//!
//! The model performs no schema validation, so the order and count below
//! are load-bearing: any drift silently produces wrong yields.

use serde::Serialize;

use crate::types::PredictionRequest;

pub const FEATURE_COUNT: usize = 12;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Year",
    "District_Encoded",
    "Crop_Encoded",
    "Season_Encoded",
    "Area",
    "Temp",
    "Humidity",
    "Wind",
    "PAR",
    "SW_DWN",
    "SoilWetness",
    "Rainfall",
];

pub const DEFAULT_YEAR: f64 = 2025.0;
pub const DEFAULT_DISTRICT: f64 = 1.0;
pub const DEFAULT_SEASON: f64 = 1.0;
pub const DEFAULT_AREA: f64 = 1.0;
pub const DEFAULT_TEMP: f64 = 28.0;
pub const DEFAULT_HUMIDITY: f64 = 60.0;
pub const DEFAULT_WIND: f64 = 2.0;

// Fixed regardless of what the request carries for these fields.
pub const PAR: f64 = 200.0;
pub const SW_DWN: f64 = 10.0;
pub const SOIL_WETNESS: f64 = 0.5;
pub const RAINFALL: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Assemble the model input from a request and the resolved crop code.
    /// Values are passed through unchecked.
    pub fn build(req: &PredictionRequest, crop_code: usize) -> Self {
        Self([
            req.year.unwrap_or(DEFAULT_YEAR),
            req.district_encoded.unwrap_or(DEFAULT_DISTRICT),
            crop_code as f64,
            req.season_encoded.unwrap_or(DEFAULT_SEASON),
            req.area.unwrap_or(DEFAULT_AREA),
            req.temp.unwrap_or(DEFAULT_TEMP),
            req.humidity.unwrap_or(DEFAULT_HUMIDITY),
            req.wind.unwrap_or(DEFAULT_WIND),
            PAR,
            SW_DWN,
            SOIL_WETNESS,
            RAINFALL,
        ])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.0.get(idx).copied()
    }

    pub fn crop_code(&self) -> f64 {
        self.0[2]
    }

    pub fn into_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
