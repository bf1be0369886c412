//! CART regression tree with variance-reduction splits.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::{validate_matrix, ModelError};

/// Decision tree configuration.
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Maximum depth of tree (root is depth 0).
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
    /// Features drawn per split (None = all). More are drawn if none of the
    /// first `max_features` can split the node.
    pub max_features: Option<usize>,
    /// Random seed for feature sampling.
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Best split found for a node.
struct Split {
    feature: usize,
    threshold: f64,
    /// Sum of squares of side sums over side counts; larger is better.
    score: f64,
}

/// Regression tree predicting the mean target of its leaf.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    config: TreeConfig,
    root: Option<Node>,
    n_features: usize,
}

impl RegressionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self {
            config,
            root: None,
            n_features: 0,
        }
    }

    /// Fit on every sample.
    pub fn fit(&mut self, x: &[Vec<f64>], y: &[f64]) -> Result<(), ModelError> {
        let indices: Vec<usize> = (0..x.len()).collect();
        self.fit_indices(x, y, &indices)
    }

    /// Fit on a subset of samples. Repeated indices weight a sample more,
    /// which is how bootstrap draws are passed in.
    pub fn fit_indices(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
    ) -> Result<(), ModelError> {
        self.n_features = validate_matrix(x)?;
        if x.len() != y.len() {
            return Err(ModelError::TargetMismatch {
                samples: x.len(),
                targets: y.len(),
            });
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }
        if indices.is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut indices = indices.to_vec();
        self.root = Some(self.build(x, y, &mut indices, 0, &mut rng));
        Ok(())
    }

    fn build(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &mut [usize],
        depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        let n = indices.len();
        let sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let mean = sum / n as f64;
        let sse: f64 = indices.iter().map(|&i| (y[i] - mean).powi(2)).sum();

        if depth >= self.config.max_depth
            || n < self.config.min_samples_split
            || n < 2 * self.config.min_samples_leaf.max(1)
            || sse <= 1e-12 * n as f64
        {
            return Node::Leaf { value: mean };
        }

        let split = match self.find_best_split(x, y, indices, sum, rng) {
            Some(split) => split,
            None => return Node::Leaf { value: mean },
        };

        let mid = partition(indices, |i| x[i][split.feature] <= split.threshold);
        let (left_idx, right_idx) = indices.split_at_mut(mid);

        let left = self.build(x, y, left_idx, depth + 1, rng);
        let right = self.build(x, y, right_idx, depth + 1, rng);

        Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn find_best_split(
        &self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: &[usize],
        total: f64,
        rng: &mut StdRng,
    ) -> Option<Split> {
        let n = indices.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let max_features = self
            .config
            .max_features
            .unwrap_or(self.n_features)
            .clamp(1, self.n_features);

        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(rng);

        // A split must beat leaving the node whole.
        let parent_score = total * total / n as f64;
        let mut best: Option<Split> = None;
        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(n);

        for (visited, &feature) in features.iter().enumerate() {
            if visited >= max_features && best.is_some() {
                break;
            }

            pairs.clear();
            pairs.extend(indices.iter().map(|&i| (x[i][feature], y[i])));
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_sum = 0.0;
            for k in 0..n - 1 {
                left_sum += pairs[k].1;
                let n_left = k + 1;
                let n_right = n - n_left;

                if n_left < min_leaf || n_right < min_leaf {
                    continue;
                }
                if pairs[k].0 >= pairs[k + 1].0 {
                    continue;
                }

                let right_sum = total - left_sum;
                let score =
                    left_sum * left_sum / n_left as f64 + right_sum * right_sum / n_right as f64;

                let improves = score > parent_score + 1e-12 * parent_score.abs().max(1.0);
                let better = best.as_ref().map_or(true, |b| score > b.score);
                if improves && better {
                    let (lo, hi) = (pairs[k].0, pairs[k + 1].0);
                    let mut threshold = lo + (hi - lo) / 2.0;
                    if threshold >= hi {
                        threshold = lo;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        score,
                    });
                }
            }
        }

        best
    }

    pub fn predict_one(&self, x: &[f64]) -> Result<f64, ModelError> {
        let mut node = self.root.as_ref().ok_or(ModelError::NotFitted)?;
        if x.len() != self.n_features {
            return Err(ModelError::FeatureMismatch {
                expected: self.n_features,
                got: x.len(),
            });
        }

        loop {
            match node {
                Node::Leaf { value } => return Ok(*value),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { &**left } else { &**right };
                }
            }
        }
    }

    /// Depth of the fitted tree (a lone leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        self.root.as_ref().map_or(0, walk)
    }
}

/// Move elements matching `pred` to the front; returns how many matched.
fn partition(items: &mut [usize], pred: impl Fn(usize) -> bool) -> usize {
    let mut mid = 0;
    for i in 0..items.len() {
        if pred(items[i]) {
            items.swap(i, mid);
            mid += 1;
        }
    }
    mid
}
