//! cropyield-model
//!
//! Persisted regressors behind the `YieldModel` trait: JSON model files,
//! structural validation at load time, and the startup loader that keeps
//! the service alive when no usable model is present.
pub mod persisted;
pub mod store;

pub use persisted::{PersistedModel, RegressionTree, TreeNode};
pub use store::{load_for_serving, load_model, save_model};
