//! Node desirability scores and the bottom-up flat-cluster selection.
//!
//! A node's score rewards a long branch above it (the gap between its own
//! merge distance and its parent's) and, through the stiffness exponent,
//! clusters holding roughly half of the points:
//!
//! ```text
//! score(v) = (parent_dist - v.dist) * (n_links - v.count)^stiffness * v.count^stiffness
//! ```
//!
//! Leaves use `v.dist = 0`. The root has no parent; its `parent_dist` comes
//! from the configured [`RootBaseline`]. The `n_links - v.count` base is
//! floored at zero, so the size term vanishes for the whole point set.
//!
//! Scores are computed independently of the traversal in [`ScoreTable`] so
//! the same values feed both [`TreeScorer`] and the exact set-partition
//! program in [`crate::SetPartitionProgram`].

mod select;

pub use self::select::{ScoreState, TreeScorer};

use crate::{error::InvalidConfigurationError, tree::ClusterTree};

/// Stiffness applied when none is configured.
pub const DEFAULT_STIFFNESS: f64 = 1.0;

/// Distance standing in for the root's missing parent merge.
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord, RootBaseline};
///
/// let tree = ClusterTree::build(&[LinkageRecord::new(0, 1, 2.5, 2)])?;
/// assert_eq!(RootBaseline::MaxDistance.resolve(&tree), 2.5);
/// assert_eq!(RootBaseline::Zero.resolve(&tree), 0.0);
/// assert_eq!(RootBaseline::Fixed(4.0).resolve(&tree), 4.0);
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum RootBaseline {
    /// Largest merge distance in the tree; the root scores zero on monotone
    /// input.
    #[default]
    MaxDistance,
    /// Zero; the root scores negatively, so at least two clusters are formed
    /// whenever any split scores positively.
    Zero,
    /// A caller-chosen distance.
    Fixed(f64),
}

impl RootBaseline {
    /// Returns the `parent_dist` used for the root of `tree`.
    #[must_use]
    pub fn resolve(self, tree: &ClusterTree) -> f64 {
        match self {
            Self::MaxDistance => tree.max_distance(),
            Self::Zero => 0.0,
            Self::Fixed(distance) => distance,
        }
    }
}

/// Scoring function parameterised by stiffness and root baseline.
///
/// # Examples
/// ```
/// use smartclust_core::{NodeScorer, RootBaseline};
///
/// let scorer = NodeScorer::new(1.0, RootBaseline::MaxDistance)?;
/// // A gap of 4 above a 2-point cluster in a 4-point tree (3 links).
/// assert_eq!(scorer.score(4.0, 2, 3), 8.0);
/// assert_eq!(scorer.score(4.0, 1, 0), 0.0);
/// # Ok::<(), smartclust_core::InvalidConfigurationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeScorer {
    stiffness: f64,
    baseline: RootBaseline,
}

impl Default for NodeScorer {
    fn default() -> Self {
        Self {
            stiffness: DEFAULT_STIFFNESS,
            baseline: RootBaseline::default(),
        }
    }
}

impl NodeScorer {
    /// Creates a scorer after validating its parameters.
    ///
    /// # Errors
    /// Returns [`InvalidConfigurationError::Stiffness`] for negative or
    /// non-finite stiffness and [`InvalidConfigurationError::RootDistance`]
    /// for a non-finite fixed baseline.
    pub fn new(
        stiffness: f64,
        baseline: RootBaseline,
    ) -> Result<Self, InvalidConfigurationError> {
        if !stiffness.is_finite() || stiffness < 0.0 {
            return Err(InvalidConfigurationError::Stiffness { got: stiffness });
        }
        if let RootBaseline::Fixed(distance) = baseline {
            if !distance.is_finite() {
                return Err(InvalidConfigurationError::RootDistance { got: distance });
            }
        }
        Ok(Self {
            stiffness,
            baseline,
        })
    }

    /// Configured stiffness exponent.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Configured root baseline.
    #[must_use]
    pub fn baseline(&self) -> RootBaseline {
        self.baseline
    }

    /// Scores a cluster of `count` points sitting `gap` below its parent merge
    /// in a tree with `n_links` merges.
    ///
    /// A tree without merges holds a single point and always scores zero.
    #[must_use]
    pub fn score(&self, gap: f64, count: usize, n_links: usize) -> f64 {
        if n_links == 0 {
            return 0.0;
        }
        let balance = n_links.saturating_sub(count) as f64;
        gap * balance.powf(self.stiffness) * (count as f64).powf(self.stiffness)
    }

    /// Scores node `id` of `tree`, or `None` when the id is unknown.
    #[must_use]
    pub fn node_score(&self, tree: &ClusterTree, id: usize) -> Option<f64> {
        let node = tree.node(id)?;
        let parent_dist = match node.parent() {
            Some(parent) => tree.node(parent).and_then(|p| p.dist()).unwrap_or(0.0),
            None => self.baseline.resolve(tree),
        };
        let own_dist = node.dist().unwrap_or(0.0);
        Some(self.score(parent_dist - own_dist, node.count(), tree.n_links()))
    }
}

/// Per-node scores of a tree, indexed by node id.
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord, NodeScorer, ScoreTable};
///
/// let tree = ClusterTree::build(&[
///     LinkageRecord::new(0, 1, 1.0, 2),
///     LinkageRecord::new(2, 3, 4.0, 3),
/// ])?;
/// let table = ScoreTable::compute(&tree, &NodeScorer::default());
/// assert_eq!(table.len(), tree.len());
/// // Node 3: gap 3, two points, two links -> 3 * 0 * 2.
/// assert_eq!(table.get(3), Some(0.0));
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreTable {
    scores: Vec<f64>,
}

impl ScoreTable {
    /// Scores every node of `tree` with `scorer`.
    #[must_use]
    pub fn compute(tree: &ClusterTree, scorer: &NodeScorer) -> Self {
        let scores = (0..tree.len())
            .map(|id| scorer.node_score(tree, id).unwrap_or(0.0))
            .collect();
        Self { scores }
    }

    /// Score of node `id`.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// Scores in node id order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    /// Number of scored nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Returns `true` when no node was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
