#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod features;
pub mod traits;
pub mod types;
pub mod vocabulary;

pub use error::{Error, Result};
pub use features::FeatureVector;
pub use types::{Prediction, PredictionRequest, RawPrediction};
pub use vocabulary::{CropCatalog, CropVocabulary, SynonymTable};
