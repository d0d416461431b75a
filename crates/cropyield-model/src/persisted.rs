use anyhow::{anyhow, ensure, Result};
use serde::{Deserialize, Serialize};

use cropyield_core::features::{FeatureVector, FEATURE_COUNT};
use cropyield_core::traits::YieldModel;
use cropyield_core::RawPrediction;

/// A trained regressor as stored on disk. Outputs are in log1p space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PersistedModel {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Averaged regression trees (random-forest style).
    Forest { trees: Vec<RegressionTree> },
    /// Additive trees on top of a base score (gradient-boosting style).
    Boosted {
        base_score: f64,
        learning_rate: f64,
        trees: Vec<RegressionTree>,
    },
}

/// Flat node array; node 0 is the root. `x[feature] <= threshold` goes left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { value: f64 },
}

impl RegressionTree {
    /// Children must sit after their parent, which rules out cycles and
    /// guarantees every walk terminates.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.nodes.is_empty(), "tree has no nodes");
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, threshold, left, right } = *node {
                ensure!(feature < FEATURE_COUNT, "node {idx} splits on feature {feature}, only {FEATURE_COUNT} exist");
                ensure!(!threshold.is_nan(), "node {idx} has a NaN threshold");
                for child in [left, right] {
                    ensure!(
                        child > idx && child < self.nodes.len(),
                        "node {idx} points at invalid child {child}"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64> {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx).ok_or_else(|| anyhow!("tree walk left the node array at {idx}"))? {
                TreeNode::Leaf { value } => return Ok(*value),
                TreeNode::Split { feature, threshold, left, right } => {
                    let v = x.get(*feature).copied().ok_or_else(|| anyhow!("missing feature {feature}"))?;
                    idx = if v <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl PersistedModel {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Linear { intercept, coefficients } => {
                ensure!(
                    coefficients.len() == FEATURE_COUNT,
                    "linear model has {} coefficients, expected {FEATURE_COUNT}",
                    coefficients.len()
                );
                ensure!(
                    intercept.is_finite() && coefficients.iter().all(|c| c.is_finite()),
                    "linear model has non-finite weights"
                );
            }
            Self::Forest { trees } => {
                ensure!(!trees.is_empty(), "forest has no trees");
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate().map_err(|e| anyhow!("tree {i}: {e}"))?;
                }
            }
            Self::Boosted { base_score, learning_rate, trees } => {
                ensure!(base_score.is_finite() && learning_rate.is_finite(), "boosted model has non-finite parameters");
                for (i, tree) in trees.iter().enumerate() {
                    tree.validate().map_err(|e| anyhow!("tree {i}: {e}"))?;
                }
            }
        }
        Ok(())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear { .. } => "linear",
            Self::Forest { .. } => "forest",
            Self::Boosted { .. } => "boosted",
        }
    }
}

impl YieldModel for PersistedModel {
    fn predict(&self, features: &FeatureVector) -> Result<RawPrediction> {
        let x = features.as_slice();
        match self {
            Self::Linear { intercept, coefficients } => {
                let dot: f64 = coefficients.iter().zip(x).map(|(w, v)| w * v).sum();
                Ok(RawPrediction::Scalar(intercept + dot))
            }
            Self::Forest { trees } => {
                let mut sum = 0.0;
                for tree in trees {
                    sum += tree.predict(x)?;
                }
                // One-row batch, the shape tabular regressors hand back.
                Ok(RawPrediction::Batch(vec![sum / trees.len() as f64]))
            }
            Self::Boosted { base_score, learning_rate, trees } => {
                let mut acc = *base_score;
                for tree in trees {
                    acc += learning_rate * tree.predict(x)?;
                }
                Ok(RawPrediction::Scalar(acc))
            }
        }
    }
}
