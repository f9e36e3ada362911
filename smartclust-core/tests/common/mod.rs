use smartclust_core::LinkageRecord;
use smartclust_test_support::linkage::LinkageRow;

#[must_use]
pub fn records(rows: &[LinkageRow]) -> Vec<LinkageRecord> {
    rows.iter().copied().map(LinkageRecord::from).collect()
}

/// Cluster head id of every point.
#[must_use]
pub fn heads(clustering: &smartclust_core::FlatClustering) -> Vec<usize> {
    clustering.assignments().iter().map(|id| id.get()).collect()
}
