//! Flattening orchestration for the smartclust library.
//!
//! Provides the [`Smartclust`] entry point, which turns a linkage sequence
//! into a [`ClusterTree`], scores it and resolves the flat partition.

use tracing::{info, instrument, warn};

use crate::{
    Result,
    linkage::{LinkageRecord, is_monotone},
    program::SetPartitionProgram,
    result::FlatClustering,
    scoring::{NodeScorer, RootBaseline, ScoreTable, TreeScorer},
    tree::ClusterTree,
};

/// Entry point for flattening linkage trees.
///
/// Instances are cheap, immutable and reusable; [`Smartclust::flatten`] is a
/// pure function of its input and the configuration.
///
/// # Examples
/// ```
/// use smartclust_core::{LinkageRecord, SmartclustBuilder};
///
/// let smartclust = SmartclustBuilder::new().build()?;
/// let clustering = smartclust.flatten(&[])?;
/// assert_eq!(clustering.assignments().len(), 1);
/// assert_eq!(clustering.assignments()[0].get(), 0);
/// assert_eq!(clustering.total_score(), 0.0);
/// # Ok::<(), smartclust_core::SmartclustError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smartclust {
    scorer: NodeScorer,
}

impl Smartclust {
    pub(crate) const fn new(scorer: NodeScorer) -> Self {
        Self { scorer }
    }

    /// Returns the stiffness exponent used for scoring.
    #[must_use]
    pub fn stiffness(&self) -> f64 {
        self.scorer.stiffness()
    }

    /// Returns the root baseline used for scoring.
    #[must_use]
    pub fn root_baseline(&self) -> RootBaseline {
        self.scorer.baseline()
    }

    /// Returns the configured scoring function.
    #[must_use]
    pub fn scorer(&self) -> NodeScorer {
        self.scorer
    }

    /// Builds the tree for `records` and selects its flat clusters.
    ///
    /// # Errors
    /// Returns [`crate::SmartclustError::MalformedTree`] when the records do
    /// not describe a valid linkage tree.
    pub fn flatten(&self, records: &[LinkageRecord]) -> Result<FlatClustering> {
        self.flatten_with_tree(records).map(|(_, clustering)| clustering)
    }

    /// Like [`Smartclust::flatten`], but also returns the built tree so
    /// callers can score it or export its program without rebuilding it.
    ///
    /// # Errors
    /// Returns [`crate::SmartclustError::MalformedTree`] when the records do
    /// not describe a valid linkage tree.
    ///
    /// # Examples
    /// ```
    /// use smartclust_core::{LinkageRecord, SmartclustBuilder};
    ///
    /// let smartclust = SmartclustBuilder::new().build()?;
    /// let (tree, clustering) = smartclust.flatten_with_tree(&[LinkageRecord::new(0, 1, 1.0, 2)])?;
    /// assert_eq!(tree.n_points(), 2);
    /// assert_eq!(clustering.assignments().len(), 2);
    /// # Ok::<(), smartclust_core::SmartclustError>(())
    /// ```
    #[instrument(
        name = "core.flatten",
        err,
        skip(self, records),
        fields(
            links = records.len(),
            stiffness = self.scorer.stiffness(),
            root_baseline = ?self.scorer.baseline(),
        ),
    )]
    pub fn flatten_with_tree(
        &self,
        records: &[LinkageRecord],
    ) -> Result<(ClusterTree, FlatClustering)> {
        if !is_monotone(records) {
            warn!("merge distances decrease along the linkage; scores may be less meaningful");
        }
        let tree = ClusterTree::build(records)?;
        let clustering = self.flatten_tree(&tree);
        info!(
            points = tree.n_points(),
            clusters = clustering.cluster_count(),
            total_score = clustering.total_score(),
            "flattened linkage tree"
        );
        Ok((tree, clustering))
    }

    /// Selects the flat clusters of an already built tree.
    #[must_use]
    pub fn flatten_tree(&self, tree: &ClusterTree) -> FlatClustering {
        TreeScorer::new(tree, self.scorer).traverse()
    }

    /// Scores every node of `tree`.
    #[must_use]
    pub fn score_table(&self, tree: &ClusterTree) -> ScoreTable {
        ScoreTable::compute(tree, &self.scorer)
    }

    /// Builds the set-partition program optimising the same objective.
    #[must_use]
    pub fn program(&self, tree: &ClusterTree) -> SetPartitionProgram {
        SetPartitionProgram::from_tree(tree, &self.score_table(tree))
    }
}
