//! Request and response payloads shared by the service and the HTTP layer.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// Inbound prediction payload.
///
/// Every field is optional; absent (or `null`) fields take the defaults
/// listed in `features`. Encoded and year fields take any JSON number,
/// `2025` and `2025.0` alike. `PAR`, `SW_DWN`, `SoilWetness` and `Rainfall` are
/// accepted for client compatibility but never reach the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Crop_Tamil", default, skip_serializing_if = "Option::is_none")]
    pub crop_tamil: Option<String>,
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<f64>,
    #[serde(rename = "District_Encoded", default, skip_serializing_if = "Option::is_none")]
    pub district_encoded: Option<f64>,
    #[serde(rename = "Season_Encoded", default, skip_serializing_if = "Option::is_none")]
    pub season_encoded: Option<f64>,
    #[serde(rename = "Area", default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(rename = "Temp", default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(rename = "Humidity", default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(rename = "Wind", default, skip_serializing_if = "Option::is_none")]
    pub wind: Option<f64>,
    #[serde(rename = "PAR", default, skip_serializing_if = "Option::is_none")]
    pub par: Option<f64>,
    #[serde(rename = "SW_DWN", default, skip_serializing_if = "Option::is_none")]
    pub sw_dwn: Option<f64>,
    #[serde(rename = "SoilWetness", default, skip_serializing_if = "Option::is_none")]
    pub soil_wetness: Option<f64>,
    #[serde(rename = "Rainfall", default, skip_serializing_if = "Option::is_none")]
    pub rainfall: Option<f64>,
}

impl PredictionRequest {
    /// Crop text with surrounding whitespace removed; empty when absent.
    pub fn crop_text(&self) -> &str {
        self.crop_tamil.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Successful prediction as reported to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_yield: f64,
    pub final_crop_used: String,
}

/// Failure body; exactly one error string, never a partial result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Liveness payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

/// What a model hands back: either a bare scalar or a batch holding the
/// single row that was asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrediction {
    Scalar(f64),
    Batch(Vec<f64>),
}

impl RawPrediction {
    pub fn into_scalar(self) -> anyhow::Result<f64> {
        match self {
            Self::Scalar(v) => Ok(v),
            Self::Batch(values) => values
                .first()
                .copied()
                .ok_or_else(|| anyhow!("model returned an empty prediction batch")),
        }
    }
}

impl From<f64> for RawPrediction {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}
