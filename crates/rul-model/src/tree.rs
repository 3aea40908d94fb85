//! Regression Tree

use crate::binning::BinnedMatrix;
use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Tree node; children are indices into the owning tree's node list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Terminal node carrying an already shrunk output
    Leaf { value: f64 },
    /// `row[feature] < threshold` goes left, everything else right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Binary regression tree stored as a flat node arena rooted at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Build a tree from explicit nodes, checking that every child index
    /// points forward into the arena.
    pub fn from_nodes(nodes: Vec<Node>) -> Result<Self, ModelError> {
        let tree = Self { nodes };
        tree.validate()?;
        Ok(tree)
    }

    /// Single-leaf tree
    pub fn leaf(value: f64) -> Self {
        Self {
            nodes: vec![Node::Leaf { value }],
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::IncompatibleFormat("tree has no nodes".into()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = *node {
                let n = self.nodes.len();
                if left <= idx || right <= idx || left >= n || right >= n {
                    return Err(ModelError::IncompatibleFormat(format!(
                        "node {idx} has invalid children ({left}, {right})"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Evaluate the tree on one row
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[feature] < threshold { left } else { right };
                }
            }
        }
    }

    /// Largest feature index referenced by a split
    pub fn max_feature(&self) -> Option<usize> {
        self.nodes
            .iter()
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    /// Node arena
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }
}

/// Growth limits for a single tree
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeParams {
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub l2_regularization: f64,
    pub min_split_gain: f64,
    pub learning_rate: f64,
}

struct BestSplit {
    feature: usize,
    bin: usize,
    gain: f64,
}

/// Grows one tree on squared-error gradients (hessian is 1 per row)
pub(crate) struct TreeGrower<'a> {
    data: &'a BinnedMatrix,
    gradients: &'a [f64],
    features: &'a [usize],
    params: TreeParams,
    nodes: Vec<Node>,
}

impl<'a> TreeGrower<'a> {
    pub(crate) fn new(
        data: &'a BinnedMatrix,
        gradients: &'a [f64],
        features: &'a [usize],
        params: TreeParams,
    ) -> Self {
        Self {
            data,
            gradients,
            features,
            params,
            nodes: Vec::new(),
        }
    }

    /// Grow from the sampled rows and return the finished tree
    pub(crate) fn grow(mut self, rows: Vec<usize>) -> RegressionTree {
        self.grow_node(rows, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn grow_node(&mut self, rows: Vec<usize>, depth: usize) -> usize {
        let idx = self.nodes.len();
        let grad_sum: f64 = rows.iter().map(|&r| self.gradients[r]).sum();
        self.nodes.push(Node::Leaf {
            value: self.leaf_value(grad_sum, rows.len()),
        });

        if depth >= self.params.max_depth || rows.len() < 2 * self.params.min_samples_leaf {
            return idx;
        }

        let Some(best) = self.best_split(&rows, grad_sum) else {
            return idx;
        };

        let codes = &self.data.codes[best.feature];
        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| (codes[r] as usize) <= best.bin);

        let threshold = self.data.bins[best.feature].threshold(best.bin);
        let left = self.grow_node(left_rows, depth + 1);
        let right = self.grow_node(right_rows, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold,
            left,
            right,
        };
        idx
    }

    fn leaf_value(&self, grad_sum: f64, count: usize) -> f64 {
        -grad_sum / (count as f64 + self.params.l2_regularization) * self.params.learning_rate
    }

    fn score(&self, grad_sum: f64, count: usize) -> f64 {
        grad_sum * grad_sum / (count as f64 + self.params.l2_regularization)
    }

    fn best_split(&self, rows: &[usize], grad_sum: f64) -> Option<BestSplit> {
        let total = rows.len();
        let parent = self.score(grad_sum, total);
        let min_leaf = self.params.min_samples_leaf;
        let mut best: Option<BestSplit> = None;

        for &feature in self.features {
            let n_bins = self.data.bins[feature].len();
            if n_bins < 2 {
                continue;
            }

            let codes = &self.data.codes[feature];
            let mut hist = vec![(0.0f64, 0usize); n_bins];
            for &r in rows {
                let h = &mut hist[codes[r] as usize];
                h.0 += self.gradients[r];
                h.1 += 1;
            }

            let mut left_grad = 0.0;
            let mut left_count = 0usize;
            for (bin, &(g, c)) in hist.iter().enumerate().take(n_bins - 1) {
                left_grad += g;
                left_count += c;
                let right_count = total - left_count;
                if left_count < min_leaf {
                    continue;
                }
                if right_count < min_leaf {
                    break;
                }

                let gain = self.score(left_grad, left_count)
                    + self.score(grad_sum - left_grad, right_count)
                    - parent;
                if gain > self.params.min_split_gain
                    && best.as_ref().map_or(true, |b| gain > b.gain)
                {
                    best = Some(BestSplit { feature, bin, gain });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: 3,
            min_samples_leaf: 1,
            l2_regularization: 0.0,
            min_split_gain: 0.0,
            learning_rate: 1.0,
        }
    }

    #[test]
    fn test_fits_step_function() {
        // label 10 below x=5, 50 above; gradient = 0 - label
        let rows: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let grads: Vec<f64> = (0..10).map(|i| if i < 5 { -10.0 } else { -50.0 }).collect();
        let data = BinnedMatrix::new(&rows, 1, 256);

        let tree = TreeGrower::new(&data, &grads, &[0], params()).grow((0..10).collect());

        assert!((tree.predict(&[2.0]) - 10.0).abs() < 1e-9);
        assert!((tree.predict(&[7.0]) - 50.0).abs() < 1e-9);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.max_feature(), Some(0));
    }

    #[test]
    fn test_depth_zero_is_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
        let grads = vec![-1.0, -2.0, -3.0, -4.0];
        let data = BinnedMatrix::new(&rows, 1, 256);
        let p = TreeParams {
            max_depth: 0,
            ..params()
        };

        let tree = TreeGrower::new(&data, &grads, &[0], p).grow((0..4).collect());
        assert_eq!(tree.nodes().len(), 1);
        assert!((tree.predict(&[0.0]) - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_only_sampled_features_are_used() {
        // feature 0 is informative, feature 1 constant noise
        let rows: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64, (i % 2) as f64]).collect();
        let grads: Vec<f64> = (0..8).map(|i| if i < 4 { 1.0 } else { -1.0 }).collect();
        let data = BinnedMatrix::new(&rows, 2, 256);

        let tree = TreeGrower::new(&data, &grads, &[1], params()).grow((0..8).collect());
        assert!(tree.nodes().iter().all(|n| match n {
            Node::Split { feature, .. } => *feature == 1,
            Node::Leaf { .. } => true,
        }));
    }

    #[test]
    fn test_from_nodes_rejects_cycles() {
        let nodes = vec![
            Node::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            },
            Node::Leaf { value: 1.0 },
        ];
        assert!(RegressionTree::from_nodes(nodes).is_err());
        assert!(RegressionTree::from_nodes(vec![]).is_err());
    }

    #[test]
    fn test_hand_built_tree() {
        let tree = RegressionTree::from_nodes(vec![
            Node::Split {
                feature: 1,
                threshold: 0.5,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: -1.0 },
            Node::Leaf { value: 1.0 },
        ])
        .unwrap();
        assert_eq!(tree.predict(&[9.0, 0.0]), -1.0);
        assert_eq!(tree.predict(&[9.0, 0.5]), 1.0);
    }
}
