//! Smartclust core library.
//!
//! Projects a hierarchical cluster tree, given as an agglomerative linkage,
//! onto a single flat partition. Each tree node is scored from the gap between
//! its merge distance and its parent's and from how evenly it splits the
//! point set; a bottom-up pass keeps a node as a flat cluster only when it
//! strictly outscores the best partition of its subtree.
//!
//! # Examples
//! ```
//! use smartclust_core::{LinkageRecord, SmartclustBuilder};
//!
//! // Points A..D: (A, B) and (C, D) merge early, the pairs merge late.
//! let records = [
//!     LinkageRecord::new(0, 1, 1.0, 2),
//!     LinkageRecord::new(2, 3, 1.0, 2),
//!     LinkageRecord::new(4, 5, 5.0, 4),
//! ];
//! let clustering = SmartclustBuilder::new().build()?.flatten(&records)?;
//! let heads: Vec<usize> = clustering.assignments().iter().map(|id| id.get()).collect();
//! assert_eq!(heads, vec![4, 4, 5, 5]);
//! # Ok::<(), smartclust_core::SmartclustError>(())
//! ```

mod builder;
pub mod colouring;
mod error;
mod linkage;
mod program;
mod result;
mod scoring;
mod smartclust;
mod tree;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::SmartclustBuilder,
    error::{
        InvalidConfigurationError, InvalidConfigurationErrorCode, MalformedTreeError,
        MalformedTreeErrorCode, Result, SmartclustError, SmartclustErrorCode,
    },
    linkage::{LinkageRecord, is_monotone},
    program::SetPartitionProgram,
    result::{FlatClustering, NodeId},
    scoring::{
        DEFAULT_STIFFNESS, NodeScorer, RootBaseline, ScoreState, ScoreTable, TreeScorer,
    },
    smartclust::Smartclust,
    tree::{ClusterNode, ClusterTree, Descendants, PostOrder},
};
