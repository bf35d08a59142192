use super::{argmax, Classifier};
use crate::features::FeatureVector;
use serde::{Deserialize, Serialize};

const LEAF: i64 = -1;

/// One node of a flattened binary decision tree. Leaves have
/// `left == right == -1` and carry per-class sample weights in `value`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TreeNode {
    #[serde(default)]
    pub feature: usize,
    #[serde(default)]
    pub threshold: f64,
    pub left: i64,
    pub right: i64,
    #[serde(default)]
    pub value: Vec<f64>,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.left == LEAF
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn leaf_for(&self, features: &FeatureVector) -> &TreeNode {
        let mut node = &self.nodes[0];
        while !node.is_leaf() {
            let next = if features.get(node.feature) <= node.threshold {
                node.left
            } else {
                node.right
            };
            node = &self.nodes[next as usize];
        }
        node
    }

    /// Normalized class distribution of the leaf reached by `features`.
    pub fn predict_proba(&self, features: &FeatureVector, n_classes: usize) -> Vec<f64> {
        let leaf = self.leaf_for(features);
        let total: f64 = leaf.value.iter().sum();
        let mut proba = vec![0.0; n_classes];

        if total > 0.0 {
            for (slot, weight) in proba.iter_mut().zip(leaf.value.iter()) {
                *slot = weight / total;
            }
        }

        proba
    }

    /// Children must point forward so traversal always terminates.
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if node.right != LEAF {
                    return Err(format!("node {} has only one child", idx));
                }
                if node.value.len() != n_classes {
                    return Err(format!(
                        "leaf {} has {} class weights, expected {}",
                        idx,
                        node.value.len(),
                        n_classes
                    ));
                }
                continue;
            }

            if node.feature >= n_features {
                return Err(format!(
                    "node {} splits on feature {} of {}",
                    idx, node.feature, n_features
                ));
            }
            for child in [node.left, node.right] {
                if child <= idx as i64 || child as usize >= self.nodes.len() {
                    return Err(format!("node {} has invalid child {}", idx, child));
                }
            }
        }

        Ok(())
    }
}

/// Averaged ensemble of decision trees.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RandomForest {
    pub n_features: usize,
    #[serde(default = "default_n_classes")]
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
}

fn default_n_classes() -> usize {
    2
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureVector) -> usize {
        argmax(&self.predict_proba(features))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        if self.trees.is_empty() {
            return proba;
        }

        for tree in &self.trees {
            for (sum, p) in proba
                .iter_mut()
                .zip(tree.predict_proba(features, self.n_classes))
            {
                *sum += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        proba
    }
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes != 2 {
            return Err(format!("expected a binary model, got {} classes", self.n_classes));
        }
        if self.trees.is_empty() {
            return Err("forest has no trees".to_string());
        }

        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.n_classes)
                .map_err(|e| format!("tree {}: {}", idx, e))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(safe: f64, phishing: f64) -> TreeNode {
        TreeNode {
            feature: 0,
            threshold: 0.0,
            left: LEAF,
            right: LEAF,
            value: vec![safe, phishing],
        }
    }

    fn split(feature: usize, threshold: f64, left: i64, right: i64) -> TreeNode {
        TreeNode {
            feature,
            threshold,
            left,
            right,
            value: vec![],
        }
    }

    /// Phishing when feature 0 (not https) is set and feature 1 (ipv4) too.
    fn forest() -> RandomForest {
        RandomForest {
            n_features: 2,
            n_classes: 2,
            trees: vec![
                DecisionTree {
                    nodes: vec![split(0, 0.5, 1, 2), leaf(9.0, 1.0), leaf(1.0, 3.0)],
                },
                DecisionTree {
                    nodes: vec![split(1, 0.5, 1, 2), leaf(4.0, 0.0), leaf(0.0, 4.0)],
                },
            ],
        }
    }

    #[test]
    fn test_forest_averages_tree_probabilities() {
        let model = forest();

        let proba = model.predict_proba(&FeatureVector::Dense(vec![1.0, 1.0]));
        assert!((proba[0] - 0.125).abs() < 1e-12);
        assert!((proba[1] - 0.875).abs() < 1e-12);
        assert_eq!(model.predict(&FeatureVector::Dense(vec![1.0, 1.0])), 1);

        let proba = model.predict_proba(&FeatureVector::Dense(vec![0.0, 0.0]));
        assert!((proba[0] - 0.95).abs() < 1e-12);
        assert_eq!(model.predict(&FeatureVector::Dense(vec![0.0, 0.0])), 0);
    }

    #[test]
    fn test_threshold_goes_left_when_equal() {
        let model = forest();
        let proba = model.trees[1].predict_proba(&FeatureVector::Dense(vec![0.0, 0.5]), 2);
        assert_eq!(proba, vec![1.0, 0.0]);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut model = forest();
        assert!(model.validate().is_ok());

        model.trees[0].nodes[0].right = 0;
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_usable_as_boxed_classifier() {
        let model: Box<dyn Classifier> = Box::new(forest());
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&FeatureVector::Dense(vec![1.0, 1.0])), 1);
    }

    #[test]
    fn test_validate_rejects_out_of_range_feature() {
        let mut model = forest();
        model.trees[1].nodes[0].feature = 7;
        assert!(model.validate().is_err());
    }
}
