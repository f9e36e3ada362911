//! Link colours for drawing a flat clustering on its dendrogram.
//!
//! Renderers colour every merge inside a cluster head's subtree with that
//! head's palette entry and leave the remaining links in a neutral colour.

use crate::{result::NodeId, tree::ClusterTree};

/// Palette cycled through by cluster heads.
pub const PALETTE: [&str; 16] = [
    "#FFC312", "#C4E538", "#12CBC4", "#ED4C67", "#F79F1F", "#A3CB38", "#1289A7", "#B53471",
    "#EE5A24", "#009432", "#0652DD", "#833471", "#EA2027", "#006266", "#1B1464", "#6F1E51",
];

/// Colour of links outside every cluster head's subtree.
pub const DEFAULT_LINK_COLOUR: &str = "#5758BB";

/// Palette colour of the `index`-th cluster head.
#[must_use]
pub fn head_colour(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Colour of every node of `tree`, indexed by node id.
///
/// Internal nodes under `heads[i]` (the head included) take
/// [`head_colour`]`(i)`; everything else, leaves included, keeps
/// [`DEFAULT_LINK_COLOUR`]. Later heads win if subtrees overlap.
///
/// # Examples
/// ```
/// use smartclust_core::{ClusterTree, LinkageRecord, NodeId, colouring};
///
/// let tree = ClusterTree::build(&[
///     LinkageRecord::new(0, 1, 1.0, 2),
///     LinkageRecord::new(2, 3, 1.0, 2),
///     LinkageRecord::new(4, 5, 5.0, 4),
/// ])?;
/// let colours = colouring::link_colours(&tree, &[NodeId::new(4), NodeId::new(5)]);
/// assert_eq!(colours[4], colouring::PALETTE[0]);
/// assert_eq!(colours[5], colouring::PALETTE[1]);
/// assert_eq!(colours[6], colouring::DEFAULT_LINK_COLOUR);
/// # Ok::<(), smartclust_core::MalformedTreeError>(())
/// ```
#[must_use]
pub fn link_colours(tree: &ClusterTree, heads: &[NodeId]) -> Vec<&'static str> {
    let mut colours = vec![DEFAULT_LINK_COLOUR; tree.len()];
    for (index, head) in heads.iter().enumerate() {
        let colour = head_colour(index);
        for id in tree.descendants(head.get()) {
            if tree.children(id).is_some() {
                colours[id] = colour;
            }
        }
    }
    colours
}
