//! Linkage records describing agglomerative merge events.
//!
//! The encoding follows the conventional linkage matrix layout: ids
//! `0..n_points` denote the original points and id `n_points + i` denotes the
//! cluster created by record `i`.

/// One merge event of an agglomerative clustering.
///
/// # Examples
/// ```
/// use smartclust_core::LinkageRecord;
///
/// let record = LinkageRecord::new(0, 1, 0.5, 2);
/// assert_eq!(record.left(), 0);
/// assert_eq!(record.right(), 1);
/// assert_eq!(record.count(), 2);
///
/// let from_row = LinkageRecord::from((2, 3, 1.5, 2));
/// assert_eq!(from_row.distance(), 1.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkageRecord {
    left: usize,
    right: usize,
    distance: f64,
    count: usize,
}

impl LinkageRecord {
    /// Creates a record merging `left` and `right` at `distance` into a
    /// cluster of `count` points.
    #[must_use]
    pub const fn new(left: usize, right: usize, distance: f64, count: usize) -> Self {
        Self {
            left,
            right,
            distance,
            count,
        }
    }

    /// Id of the first merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn left(&self) -> usize { self.left }

    /// Id of the second merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn right(&self) -> usize { self.right }

    /// Dissimilarity at which the merge occurred.
    #[rustfmt::skip]
    #[must_use]
    pub const fn distance(&self) -> f64 { self.distance }

    /// Number of original points under the merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub const fn count(&self) -> usize { self.count }
}

impl From<(usize, usize, f64, usize)> for LinkageRecord {
    fn from((left, right, distance, count): (usize, usize, f64, usize)) -> Self {
        Self::new(left, right, distance, count)
    }
}

/// Returns `true` when merge distances never decrease along `records`.
///
/// Valid linkage output is monotone; the flattener tolerates other input but
/// the resulting scores are less meaningful.
#[must_use]
pub fn is_monotone(records: &[LinkageRecord]) -> bool {
    records
        .windows(2)
        .all(|pair| matches!(pair, [earlier, later] if earlier.distance <= later.distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::empty(vec![], true)]
    #[case::single(vec![(0, 1, 1.0, 2)], true)]
    #[case::ties(vec![(0, 1, 1.0, 2), (2, 3, 1.0, 3)], true)]
    #[case::decreasing(vec![(0, 1, 2.0, 2), (2, 3, 1.0, 3)], false)]
    fn monotone_detection(#[case] rows: Vec<(usize, usize, f64, usize)>, #[case] expected: bool) {
        let records: Vec<LinkageRecord> = rows.into_iter().map(LinkageRecord::from).collect();
        assert_eq!(is_monotone(&records), expected);
    }
}
