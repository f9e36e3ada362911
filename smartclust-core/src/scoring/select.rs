//! Bottom-up aggregation of node scores into a flat partition.
//!
//! Every node's `max_score` is the best total reachable inside its subtree:
//! its own score when it beats the sum of its children's `max_score`, that sum
//! otherwise. A node that strictly beats its children is selected and wins
//! every leaf below it, replacing whatever its descendants chose. Ties keep
//! the finer split.
//!
//! The winning node for a leaf is therefore its highest selected ancestor.
//! Rather than rewriting the leaves of each winner as it is found, selection
//! is resolved by one walk from the root that stops at the first selected
//! node and assigns that node's leaf span.

use tracing::{debug, instrument};

use crate::{result::FlatClustering, tree::ClusterTree};

use super::{NodeScorer, ScoreTable};

/// Relative difference tolerated between the partition sum and the root's
/// `max_score` before it is reported.
const ROOT_SUM_TOLERANCE: f64 = 1e-9;

/// Score bookkeeping attached to one node during the traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreState {
    score: f64,
    max_score: f64,
    selected: bool,
}

impl ScoreState {
    /// The node's own desirability as a flat-cluster root.
    #[rustfmt::skip]
    #[must_use]
    pub const fn score(&self) -> f64 { self.score }

    /// Best aggregate score achievable within the node's subtree.
    #[rustfmt::skip]
    #[must_use]
    pub const fn max_score(&self) -> f64 { self.max_score }

    /// Whether the node beat its children (leaves are always selected).
    #[rustfmt::skip]
    #[must_use]
    pub const fn selected(&self) -> bool { self.selected }
}

/// Selects flat clusters from a [`ClusterTree`].
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord, NodeScorer, TreeScorer};
///
/// let tree = ClusterTree::build(&[
///     LinkageRecord::new(0, 1, 1.0, 2),
///     LinkageRecord::new(2, 3, 1.0, 2),
///     LinkageRecord::new(4, 5, 5.0, 4),
/// ])?;
/// let clustering = TreeScorer::new(&tree, NodeScorer::default()).traverse();
/// let heads: Vec<usize> = clustering.assignments().iter().map(|id| id.get()).collect();
/// assert_eq!(heads, vec![4, 4, 5, 5]);
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TreeScorer<'a> {
    tree: &'a ClusterTree,
    scores: ScoreTable,
}

impl<'a> TreeScorer<'a> {
    /// Scores every node of `tree` with `scorer`.
    #[must_use]
    pub fn new(tree: &'a ClusterTree, scorer: NodeScorer) -> Self {
        let scores = ScoreTable::compute(tree, &scorer);
        Self { tree, scores }
    }

    /// Uses precomputed scores; missing entries count as zero.
    #[must_use]
    pub fn with_scores(tree: &'a ClusterTree, scores: ScoreTable) -> Self {
        Self { tree, scores }
    }

    /// The per-node scores driving the selection.
    #[must_use]
    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    /// Runs the post-order aggregation and resolves the partition.
    #[must_use]
    #[instrument(name = "core.score", level = "debug", skip(self), fields(nodes = self.tree.len()))]
    pub fn traverse(&self) -> FlatClustering {
        let states = self.aggregate();
        self.resolve(states)
    }

    fn aggregate(&self) -> Vec<ScoreState> {
        let mut states = vec![ScoreState::default(); self.tree.len()];
        for id in self.tree.post_order() {
            let score = self.scores.get(id).unwrap_or(0.0);
            states[id] = match self.tree.children(id) {
                None => ScoreState {
                    score,
                    max_score: score,
                    selected: true,
                },
                Some((left, right)) => {
                    let sub_sum = states[left].max_score + states[right].max_score;
                    if score > sub_sum {
                        ScoreState {
                            score,
                            max_score: score,
                            selected: true,
                        }
                    } else {
                        ScoreState {
                            score,
                            max_score: sub_sum,
                            selected: false,
                        }
                    }
                }
            };
        }
        states
    }

    fn resolve(&self, states: Vec<ScoreState>) -> FlatClustering {
        let root = self.tree.root();
        let mut assignments = vec![root; self.tree.n_points()];
        let mut heads = Vec::new();
        let mut total_score = 0.0;

        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let state = states[id];
            if state.selected {
                for &leaf in self.tree.leaves(id) {
                    assignments[leaf] = id;
                }
                heads.push(id);
                total_score += state.max_score;
                continue;
            }
            if let Some((left, right)) = self.tree.children(id) {
                stack.push(right);
                stack.push(left);
            }
        }

        let root_max = states[root].max_score;
        if (total_score - root_max).abs() > ROOT_SUM_TOLERANCE * root_max.abs().max(1.0) {
            debug!(
                total_score,
                root_max_score = root_max,
                "partition sum drifted from the root max_score"
            );
        }

        FlatClustering::new(assignments, heads, total_score, states)
    }
}
