//! Stack-based traversals over a [`ClusterTree`].
//!
//! Chain-shaped linkages produce trees as deep as they are wide, so neither
//! traversal recurses.

use super::ClusterTree;

/// Pre-order iterator over a subtree, see [`ClusterTree::descendants`].
#[derive(Clone, Debug)]
pub struct Descendants<'a> {
    tree: &'a ClusterTree,
    stack: Vec<usize>,
}

impl<'a> Descendants<'a> {
    pub(super) fn new(tree: &'a ClusterTree, start: usize) -> Self {
        let stack = if start < tree.len() {
            vec![start]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl Iterator for Descendants<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        if let Some((left, right)) = self.tree.children(id) {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some(id)
    }
}

/// Post-order iterator over a subtree, see [`ClusterTree::post_order`].
///
/// Left subtrees are finished before right subtrees and every node is yielded
/// after both of its children.
#[derive(Clone, Debug)]
pub struct PostOrder<'a> {
    tree: &'a ClusterTree,
    stack: Vec<(usize, bool)>,
}

impl<'a> PostOrder<'a> {
    pub(super) fn new(tree: &'a ClusterTree, start: usize) -> Self {
        let stack = if start < tree.len() {
            vec![(start, false)]
        } else {
            Vec::new()
        };
        Self { tree, stack }
    }
}

impl Iterator for PostOrder<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (id, expanded) = self.stack.pop()?;
            match self.tree.children(id) {
                Some((left, right)) if !expanded => {
                    self.stack.push((id, true));
                    self.stack.push((right, false));
                    self.stack.push((left, false));
                }
                _ => return Some(id),
            }
        }
    }
}
