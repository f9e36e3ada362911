//! Result types for flattening operations.
//!
//! A [`FlatClustering`] maps every point to the tree node heading its flat
//! cluster. Head ids are tree node ids, so they are neither contiguous nor
//! zero-based; [`FlatClustering::labels`] renumbers them when consecutive
//! labels are needed.

use std::collections::HashMap;

use crate::scoring::ScoreState;

/// Identifier of a cluster tree node.
///
/// # Examples
/// ```
/// use smartclust_core::NodeId;
///
/// let id = NodeId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Wraps a node id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying node id.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

/// Outcome of flattening a cluster tree.
///
/// # Examples
/// ```
/// use smartclust_core::{LinkageRecord, SmartclustBuilder};
///
/// let smartclust = SmartclustBuilder::new().build()?;
/// let clustering = smartclust.flatten(&[
///     LinkageRecord::new(0, 1, 1.0, 2),
///     LinkageRecord::new(2, 3, 1.0, 2),
///     LinkageRecord::new(4, 5, 5.0, 4),
/// ])?;
/// assert_eq!(clustering.cluster_count(), 2);
/// assert_eq!(clustering.labels(), vec![0, 0, 1, 1]);
/// assert!(clustering.total_score() > 0.0);
/// # Ok::<(), smartclust_core::SmartclustError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlatClustering {
    assignments: Vec<NodeId>,
    cluster_heads: Vec<NodeId>,
    total_score: f64,
    states: Vec<ScoreState>,
}

impl FlatClustering {
    pub(crate) fn new(
        assignments: Vec<usize>,
        cluster_heads: Vec<usize>,
        total_score: f64,
        states: Vec<ScoreState>,
    ) -> Self {
        Self {
            assignments: assignments.into_iter().map(NodeId::new).collect(),
            cluster_heads: cluster_heads.into_iter().map(NodeId::new).collect(),
            total_score,
            states,
        }
    }

    /// Cluster head of every point, indexed by point id.
    #[must_use]
    pub fn assignments(&self) -> &[NodeId] {
        &self.assignments
    }

    /// Distinct cluster heads in left-to-right tree order.
    #[must_use]
    pub fn cluster_heads(&self) -> &[NodeId] {
        &self.cluster_heads
    }

    /// Number of flat clusters.
    #[must_use]
    pub fn cluster_count(&self) -> usize {
        self.cluster_heads.len()
    }

    /// Sum of `max_score` over the cluster heads.
    #[must_use]
    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    /// Score bookkeeping of node `id`.
    #[must_use]
    pub fn state(&self, id: NodeId) -> Option<&ScoreState> {
        self.states.get(id.get())
    }

    /// Score bookkeeping of every node, indexed by node id.
    #[must_use]
    pub fn states(&self) -> &[ScoreState] {
        &self.states
    }

    /// Marks the cluster heads among all tree nodes, indexed by node id.
    ///
    /// This is the 0/1 solution vector of the matching
    /// [`crate::SetPartitionProgram`].
    #[must_use]
    pub fn selection(&self) -> Vec<bool> {
        let mut selection = vec![false; self.states.len()];
        for head in &self.cluster_heads {
            if let Some(slot) = selection.get_mut(head.get()) {
                *slot = true;
            }
        }
        selection
    }

    /// Consecutive labels `0..cluster_count`, numbered by first appearance
    /// in point order.
    #[must_use]
    pub fn labels(&self) -> Vec<usize> {
        let mut lookup = HashMap::with_capacity(self.cluster_heads.len());
        self.assignments
            .iter()
            .map(|head| {
                let next = lookup.len();
                *lookup.entry(*head).or_insert(next)
            })
            .collect()
    }
}
