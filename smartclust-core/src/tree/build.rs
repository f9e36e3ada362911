//! Cluster tree construction from linkage records.
//!
//! Records are processed in creation order. Each record may only reference
//! points or clusters created by earlier records, and every node may be
//! absorbed by at most one merge; together these rule out cycles and make the
//! last node the unique root.

use tracing::instrument;

use crate::{error::MalformedTreeError, linkage::LinkageRecord};

use super::{ClusterNode, ClusterTree};

impl ClusterTree {
    /// Builds a tree from `records`, validating the linkage encoding.
    ///
    /// An empty slice yields a single-point tree.
    ///
    /// # Errors
    /// Returns [`MalformedTreeError`] when a record references an id outside
    /// the tree or one that is not created yet, when a node is claimed twice,
    /// when a distance is negative or non-finite, or when a count disagrees
    /// with the sizes of its children.
    #[instrument(name = "core.tree.build", level = "debug", skip(records), fields(links = records.len()))]
    pub fn build(records: &[LinkageRecord]) -> Result<Self, MalformedTreeError> {
        let n_links = records.len();
        let n_points = n_links + 1;
        let node_count = n_points + n_links;

        let mut nodes: Vec<ClusterNode> = Vec::with_capacity(node_count);
        nodes.extend((0..n_points).map(ClusterNode::leaf));

        let mut max_distance = 0.0_f64;
        for (link, record) in records.iter().enumerate() {
            let id = n_points + link;
            let distance = record.distance();
            if !distance.is_finite() || distance < 0.0 {
                return Err(MalformedTreeError::InvalidDistance { link, distance });
            }

            for child in [record.left(), record.right()] {
                claim_child(&mut nodes, link, id, child, node_count)?;
            }

            let expected = nodes[record.left()]
                .count
                .saturating_add(nodes[record.right()].count);
            if record.count() != expected {
                return Err(MalformedTreeError::CountMismatch {
                    link,
                    expected,
                    found: record.count(),
                });
            }

            max_distance = max_distance.max(distance);
            nodes.push(ClusterNode::merge(
                id,
                record.left(),
                record.right(),
                distance,
                expected,
            ));
        }

        let leaf_order = assign_leaf_spans(&mut nodes, n_points);
        Ok(Self {
            nodes,
            leaf_order,
            n_points,
            max_distance,
        })
    }
}

fn claim_child(
    nodes: &mut [ClusterNode],
    link: usize,
    id: usize,
    child: usize,
    node_count: usize,
) -> Result<(), MalformedTreeError> {
    if child >= node_count {
        return Err(MalformedTreeError::ChildOutOfRange {
            link,
            child,
            node_count,
        });
    }
    // Nodes before `id` are exactly the ones already pushed.
    let Some(node) = nodes.get_mut(child) else {
        return Err(MalformedTreeError::ChildNotYetCreated {
            link,
            node: id,
            child,
        });
    };
    if let Some(first_parent) = node.parent {
        return Err(MalformedTreeError::DuplicateChild {
            child,
            first_parent,
            second_parent: id,
        });
    }
    node.parent = Some(id);
    Ok(())
}

/// Lays the leaves out left to right and records each node's span.
fn assign_leaf_spans(nodes: &mut [ClusterNode], n_points: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(n_points);
    let Some(root) = nodes.len().checked_sub(1) else {
        return order;
    };

    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        match (nodes[id].children, expanded) {
            (None, _) => {
                let start = order.len();
                order.push(id);
                nodes[id].leaf_start = start;
                nodes[id].leaf_end = start + 1;
            }
            (Some((left, right)), false) => {
                stack.push((id, true));
                stack.push((right, false));
                stack.push((left, false));
            }
            (Some((left, right)), true) => {
                nodes[id].leaf_start = nodes[left].leaf_start;
                nodes[id].leaf_end = nodes[right].leaf_end;
            }
        }
    }
    order
}
