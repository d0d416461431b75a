use std::fs;

use cropyield_core::features::FeatureVector;
use cropyield_core::traits::YieldModel;
use cropyield_core::{PredictionRequest, RawPrediction};
use cropyield_model::{load_for_serving, load_model, save_model, PersistedModel, RegressionTree, TreeNode};
use tempfile::TempDir;

fn stump(feature: usize, threshold: f64, low: f64, high: f64) -> RegressionTree {
    RegressionTree {
        nodes: vec![
            TreeNode::Split { feature, threshold, left: 1, right: 2 },
            TreeNode::Leaf { value: low },
            TreeNode::Leaf { value: high },
        ],
    }
}

fn defaults(crop_code: usize) -> FeatureVector {
    FeatureVector::build(&PredictionRequest::default(), crop_code)
}

#[test]
fn linear_model_is_a_dot_product() {
    let mut coefficients = vec![0.0; 12];
    coefficients[2] = 0.5; // crop code
    coefficients[4] = 2.0; // area
    let model = PersistedModel::Linear { intercept: 1.0, coefficients };
    let out = model.predict(&defaults(2)).unwrap();
    assert_eq!(out, RawPrediction::Scalar(1.0 + 0.5 * 2.0 + 2.0 * 1.0));
}

#[test]
fn forest_averages_trees_into_single_row() {
    let model = PersistedModel::Forest { trees: vec![stump(2, 0.5, 1.0, 3.0), stump(5, 30.0, 2.0, 4.0)] };
    // crop code 1 goes right in the first tree, temp 28 goes left in the second.
    let out = model.predict(&defaults(1)).unwrap();
    assert_eq!(out, RawPrediction::Batch(vec![2.5]));
}

#[test]
fn boosted_model_scales_tree_outputs() {
    let model = PersistedModel::Boosted {
        base_score: 1.0,
        learning_rate: 0.1,
        trees: vec![stump(0, 2024.5, -5.0, 5.0)],
    };
    let out = model.predict(&defaults(0)).unwrap().into_scalar().unwrap();
    assert!((out - 1.5).abs() < 1e-12);
}

#[test]
fn validation_rejects_structural_errors() {
    let wrong_width = PersistedModel::Linear { intercept: 0.0, coefficients: vec![1.0; 11] };
    assert!(wrong_width.validate().is_err());

    let bad_feature = PersistedModel::Forest { trees: vec![stump(12, 0.0, 0.0, 0.0)] };
    assert!(bad_feature.validate().is_err());

    let cyclic = PersistedModel::Forest {
        trees: vec![RegressionTree {
            nodes: vec![TreeNode::Split { feature: 0, threshold: 0.0, left: 0, right: 1 }, TreeNode::Leaf { value: 0.0 }],
        }],
    };
    assert!(cyclic.validate().is_err());

    assert!(PersistedModel::Forest { trees: vec![] }.validate().is_err());
}

#[test]
fn json_format_round_trips_through_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested/model.json");
    let model = PersistedModel::Forest { trees: vec![stump(2, 0.5, 1.0, 3.0)] };
    save_model(&model, &path).expect("save");
    assert_eq!(load_model(&path).expect("load"), model);
}

#[test]
fn hand_written_model_file_parses() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("model.json");
    fs::write(
        &path,
        r#"{"kind":"boosted","base_score":0.2,"learning_rate":1.0,
            "trees":[{"nodes":[{"feature":4,"threshold":1.0,"left":1,"right":2},{"value":0.1},{"value":0.3}]}]}"#,
    )
    .unwrap();
    let model = load_model(&path).expect("load");
    assert_eq!(model.kind(), "boosted");
}

#[test]
fn serving_loader_tolerates_missing_or_broken_files() {
    let tmp = TempDir::new().unwrap();
    assert!(load_for_serving(&tmp.path().join("absent.json")).is_none());

    let broken = tmp.path().join("broken.json");
    fs::write(&broken, "not json").unwrap();
    assert!(load_for_serving(&broken).is_none());

    let good = tmp.path().join("good.json");
    save_model(&PersistedModel::Linear { intercept: 0.0, coefficients: vec![0.0; 12] }, &good).unwrap();
    let model = load_for_serving(&good).expect("model");
    assert_eq!(model.predict(&defaults(0)).unwrap(), RawPrediction::Scalar(0.0));
}
