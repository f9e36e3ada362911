//! Binary cluster tree reconstructed from a linkage sequence.
//!
//! Leaves occupy ids `0..n_points`; the merge recorded at index `i` becomes
//! node `n_points + i`, so every child id is smaller than its parent's id and
//! the root is always the last node. Construction fixes a left-to-right leaf
//! ordering in which the leaves of any subtree form one contiguous span, so
//! "every point under this node" is a slice lookup rather than a traversal.

mod build;
mod walk;

pub use self::walk::{Descendants, PostOrder};

/// A node of a [`ClusterTree`].
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNode {
    id: usize,
    children: Option<(usize, usize)>,
    dist: Option<f64>,
    count: usize,
    parent: Option<usize>,
    leaf_start: usize,
    leaf_end: usize,
}

impl ClusterNode {
    fn leaf(id: usize) -> Self {
        Self {
            id,
            children: None,
            dist: None,
            count: 1,
            parent: None,
            leaf_start: 0,
            leaf_end: 0,
        }
    }

    fn merge(id: usize, left: usize, right: usize, dist: f64, count: usize) -> Self {
        Self {
            id,
            children: Some((left, right)),
            dist: Some(dist),
            count,
            parent: None,
            leaf_start: 0,
            leaf_end: 0,
        }
    }

    /// Identifier of the node.
    #[rustfmt::skip]
    #[must_use]
    pub const fn id(&self) -> usize { self.id }

    /// Left and right child ids, or `None` for a leaf.
    #[rustfmt::skip]
    #[must_use]
    pub const fn children(&self) -> Option<(usize, usize)> { self.children }

    /// Merge distance, or `None` for a leaf.
    #[rustfmt::skip]
    #[must_use]
    pub const fn dist(&self) -> Option<f64> { self.dist }

    /// Number of points in the subtree.
    #[rustfmt::skip]
    #[must_use]
    pub const fn count(&self) -> usize { self.count }

    /// Id of the merge that absorbed this node, or `None` for the root.
    #[rustfmt::skip]
    #[must_use]
    pub const fn parent(&self) -> Option<usize> { self.parent }

    /// Returns `true` when the node is an original point.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

/// Read-only binary tree built from [`crate::LinkageRecord`]s.
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord};
///
/// let tree = ClusterTree::build(&[
///     LinkageRecord::new(0, 1, 1.0, 2),
///     LinkageRecord::new(2, 3, 4.0, 3),
/// ])?;
/// assert_eq!(tree.n_points(), 3);
/// assert_eq!(tree.root(), 4);
/// assert_eq!(tree.children(4), Some((2, 3)));
/// assert_eq!(tree.leaves(3), &[0, 1]);
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterTree {
    nodes: Vec<ClusterNode>,
    leaf_order: Vec<usize>,
    n_points: usize,
    max_distance: f64,
}

impl ClusterTree {
    /// Number of original points (leaves).
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of merges.
    #[must_use]
    pub fn n_links(&self) -> usize {
        self.nodes.len() - self.n_points
    }

    /// Total number of nodes, leaves included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always holds at least one point, so this is always `false`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the root: the last merge, or point `0` when there are no merges.
    #[must_use]
    pub fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Largest merge distance in the tree, `0.0` without merges.
    #[must_use]
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: usize) -> Option<&ClusterNode> {
        self.nodes.get(id)
    }

    /// All nodes in id order.
    #[must_use]
    pub fn nodes(&self) -> &[ClusterNode] {
        &self.nodes
    }

    /// Child ids of `id`, `None` for leaves and unknown ids.
    #[must_use]
    pub fn children(&self, id: usize) -> Option<(usize, usize)> {
        self.node(id).and_then(ClusterNode::children)
    }

    /// Parent id of `id`, `None` for the root and unknown ids.
    #[must_use]
    pub fn parent(&self, id: usize) -> Option<usize> {
        self.node(id).and_then(ClusterNode::parent)
    }

    /// Point ids under `id`, in the tree's left-to-right leaf order.
    ///
    /// Unknown ids yield an empty slice.
    #[must_use]
    pub fn leaves(&self, id: usize) -> &[usize] {
        self.node(id)
            .and_then(|node| self.leaf_order.get(node.leaf_start..node.leaf_end))
            .unwrap_or(&[])
    }

    /// Iterates `id` and every node below it, parents before children.
    #[must_use]
    pub fn descendants(&self, id: usize) -> Descendants<'_> {
        Descendants::new(self, id)
    }

    /// Iterates every node from the root down, children before parents.
    #[must_use]
    pub fn post_order(&self) -> PostOrder<'_> {
        PostOrder::new(self, self.root())
    }
}
