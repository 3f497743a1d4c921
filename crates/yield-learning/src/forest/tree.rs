//! CART regression tree.

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
}

/// One node of a fitted tree. Children are indices into [`RegressionTree::nodes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        /// Rows with `x[feature] <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A binary regression tree stored as a flat node list; the root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Number of rows going left once sorted by `feature`.
    left_count: usize,
    score: f64,
}

impl RegressionTree {
    /// Fit on the rows of `x` selected by `indices` (duplicates allowed).
    ///
    /// Splits maximize the reduction in squared error. Every feature is
    /// considered at every node. Leaves predict the mean target of their rows.
    pub fn fit(x: &[Vec<f64>], y: &[f64], indices: &[usize], params: &TreeParams) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        let mut indices = indices.to_vec();
        tree.grow(x, y, &mut indices, 0, params);
        tree
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Depth of the deepest leaf; a single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Predict one row. Missing features read as 0.0.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return *value,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = row.get(*feature).copied().unwrap_or(0.0);
                    index = if value <= *threshold { *left } else { *right };
                }
                None => return 0.0,
            }
        }
    }

    /// Check that every child index points forward to an existing node.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            if let Node::Split { left, right, .. } = node {
                for child in [*left, *right] {
                    if child <= index || child >= self.nodes.len() {
                        return Err(format!("node {index} has invalid child {child}"));
                    }
                }
            }
        }
        Ok(())
    }

    fn depth_from(&self, index: usize) -> usize {
        match &self.nodes[index] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let node_index = self.nodes.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / indices.len() as f64;
        self.nodes.push(Node::Leaf { value: mean });

        if depth >= params.max_depth || indices.len() < params.min_samples_split {
            return node_index;
        }

        let Some(split) = best_split(x, y, indices, params.min_samples_leaf) else {
            return node_index;
        };

        indices.sort_by(|&a, &b| x[a][split.feature].total_cmp(&x[b][split.feature]));
        let (left_rows, right_rows) = indices.split_at_mut(split.left_count);

        let left = self.grow(x, y, left_rows, depth + 1, params);
        let right = self.grow(x, y, right_rows, depth + 1, params);
        self.nodes[node_index] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        node_index
    }
}

/// Best variance-reducing split of `indices`, if any beats leaving the node whole.
///
/// For a partition into L and R, the squared error is minimized by
/// maximizing `sum(L)²/|L| + sum(R)²/|R|`.
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    min_samples_leaf: usize,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let total: f64 = indices.iter().map(|&i| y[i]).sum();
    let parent_score = total * total / n as f64;
    let n_features = x.get(indices[0]).map_or(0, Vec::len);

    let mut sorted = indices.to_vec();
    let mut best: Option<SplitCandidate> = None;

    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        for position in 0..n - 1 {
            left_sum += y[sorted[position]];
            let left_count = position + 1;
            let right_count = n - left_count;
            if left_count < min_samples_leaf || right_count < min_samples_leaf {
                continue;
            }

            let current = x[sorted[position]][feature];
            let next = x[sorted[position + 1]][feature];
            if current >= next {
                continue;
            }

            let right_sum = total - left_sum;
            let score = left_sum * left_sum / left_count as f64
                + right_sum * right_sum / right_count as f64;
            if best.is_none_or(|b| score > b.score) {
                best = Some(SplitCandidate {
                    feature,
                    threshold: current + (next - current) / 2.0,
                    left_count,
                    score,
                });
            }
        }
    }

    // relative tolerance: sums of large yields lose precision
    best.filter(|b| b.score > parent_score * (1.0 + 1e-12))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(max_depth: usize) -> TreeParams {
        TreeParams {
            max_depth,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }

    fn all(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_single_split_separates_step() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 9.0 }).collect();

        let tree = RegressionTree::fit(&x, &y, &all(10), &params(3));
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict(&[2.0]), 1.0);
        assert_eq!(tree.predict(&[7.0]), 9.0);
        match &tree.nodes()[0] {
            Node::Split {
                feature, threshold, ..
            } => {
                assert_eq!(*feature, 0);
                assert_eq!(*threshold, 4.5);
            }
            other => panic!("expected split, got {:?}", other),
        }
    }

    #[test]
    fn test_picks_informative_feature() {
        let x: Vec<Vec<f64>> = (0..20)
            .map(|i| vec![(i % 3) as f64, (i / 10) as f64])
            .collect();
        let y: Vec<f64> = (0..20).map(|i| if i < 10 { 0.0 } else { 100.0 }).collect();

        let tree = RegressionTree::fit(&x, &y, &all(20), &params(5));
        assert!(matches!(tree.nodes()[0], Node::Split { feature: 1, .. }));
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_constant_target_is_single_leaf() {
        let x: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64]).collect();
        let y = vec![3.5; 8];
        let tree = RegressionTree::fit(&x, &y, &all(8), &params(10));
        assert_eq!(tree.nodes(), &[Node::Leaf { value: 3.5 }]);
    }

    #[test]
    fn test_depth_limit_respected() {
        let x: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64]).collect();
        let y: Vec<f64> = (0..64).map(|i| (i * i) as f64).collect();
        let tree = RegressionTree::fit(&x, &y, &all(64), &params(3));
        assert!(tree.depth() <= 3);
        assert!(tree.n_leaves() <= 8);
    }

    #[test]
    fn test_min_samples_leaf_respected() {
        let x: Vec<Vec<f64>> = (0..10).map(|i| vec![i as f64]).collect();
        let mut y = vec![0.0; 10];
        y[0] = 100.0;
        let limits = TreeParams {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 3,
        };
        let tree = RegressionTree::fit(&x, &y, &all(10), &limits);
        // the outlier can never be isolated into a leaf of its own
        assert!(tree.predict(&[0.0]) < 100.0);
    }

    #[test]
    fn test_min_samples_split_stops_growth() {
        let x: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64]).collect();
        let y = vec![1.0, 2.0, 3.0, 4.0];
        let limits = TreeParams {
            max_depth: 10,
            min_samples_split: 5,
            min_samples_leaf: 1,
        };
        let tree = RegressionTree::fit(&x, &y, &all(4), &limits);
        assert_eq!(tree.nodes(), &[Node::Leaf { value: 2.5 }]);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = RegressionTree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 1.0,
                left: 0,
                right: 1,
            }],
        };
        assert!(tree.validate().is_err());
    }
}
