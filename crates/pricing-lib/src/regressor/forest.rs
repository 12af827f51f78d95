//! Random-forest regression
//!
//! Trees are stored as flat node arrays in depth-first order: every split
//! points at children with a larger index, so a walk from the root always
//! terminates. Samples with `feature <= threshold` go left. The forest
//! prediction is the mean of its tree outputs.

use super::{check_input, check_output, Regressor};
use crate::error::RegressorError;
use crate::models::NUM_FEATURES;
use serde::{Deserialize, Serialize};

/// A decision tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, tree_idx: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("tree {} has no nodes", tree_idx));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= NUM_FEATURES {
                        return Err(format!(
                            "tree {} node {} splits on feature {} (only {} features)",
                            tree_idx, idx, feature, NUM_FEATURES
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("tree {} node {} has a non-finite threshold", tree_idx, idx));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "tree {} node {} has invalid child index {}",
                                tree_idx, idx, child
                            ));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("tree {} node {} has a non-finite leaf", tree_idx, idx));
                    }
                }
            }
        }
        Ok(())
    }

    fn evaluate(&self, tree_idx: usize, features: &[f64]) -> Result<f64, RegressorError> {
        let mut idx = 0usize;
        loop {
            let node = self.nodes.get(idx).ok_or(RegressorError::MalformedTree {
                tree: tree_idx,
                node: idx,
            })?;
            match *node {
                Node::Leaf { value } => return Ok(value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(feature).ok_or(RegressorError::MalformedTree {
                        tree: tree_idx,
                        node: idx,
                    })?;
                    let next = if *value <= threshold { left } else { right };
                    if next <= idx {
                        return Err(RegressorError::MalformedTree {
                            tree: tree_idx,
                            node: idx,
                        });
                    }
                    idx = next;
                }
            }
        }
    }
}

/// Averaging ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawForest")]
pub struct RandomForestRegressor {
    trees: Vec<Tree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    feature_importances: Option<Vec<f64>>,
}

#[derive(Deserialize)]
struct RawForest {
    trees: Vec<Tree>,
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
}

impl TryFrom<RawForest> for RandomForestRegressor {
    type Error = String;

    fn try_from(raw: RawForest) -> Result<Self, Self::Error> {
        Self::new(raw.trees, raw.feature_importances)
    }
}

impl RandomForestRegressor {
    pub fn new(trees: Vec<Tree>, feature_importances: Option<Vec<f64>>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("forest has no trees".to_string());
        }
        for (idx, tree) in trees.iter().enumerate() {
            tree.validate(idx)?;
        }
        if let Some(scores) = &feature_importances {
            if scores.len() != NUM_FEATURES {
                return Err(format!(
                    "expected {} feature importances, got {}",
                    NUM_FEATURES,
                    scores.len()
                ));
            }
            if scores.iter().any(|s| !s.is_finite()) {
                return Err("feature importances contain non-finite values".to_string());
            }
        }
        Ok(Self {
            trees,
            feature_importances,
        })
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }
}

impl Regressor for RandomForestRegressor {
    fn predict(&self, features: &[f64]) -> Result<f64, RegressorError> {
        check_input(features)?;
        let mut sum = 0.0;
        for (idx, tree) in self.trees.iter().enumerate() {
            sum += tree.evaluate(idx, features)?;
        }
        check_output(sum / self.trees.len() as f64)
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        self.feature_importances.as_deref()
    }

    fn algorithm(&self) -> &'static str {
        "random_forest"
    }

    fn n_estimators(&self) -> usize {
        self.trees.len()
    }
}
