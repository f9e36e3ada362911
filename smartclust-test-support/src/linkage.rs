//! Linkage fixtures for flattening tests.
//!
//! Every generator returns rows in the conventional linkage layout
//! `(left, right, distance, count)`: ids below the point count are points and
//! row `i` creates cluster `n_points + i`. Merge distances never decrease.

use rand::Rng;

/// One merge row: `(left, right, distance, count)`.
pub type LinkageRow = (usize, usize, f64, usize);

/// Merges neighbouring clusters level by level, doubling cluster sizes.
///
/// Level `k` merges at distance `k + 1`; an odd cluster left over on a level
/// is carried up unchanged.
///
/// # Examples
/// ```
/// use smartclust_test_support::linkage::balanced_linkage;
///
/// let rows = balanced_linkage(4);
/// assert_eq!(rows, vec![(0, 1, 1.0, 2), (2, 3, 1.0, 2), (4, 5, 2.0, 4)]);
/// ```
#[must_use]
pub fn balanced_linkage(n_points: usize) -> Vec<LinkageRow> {
    let mut rows = Vec::with_capacity(n_points.saturating_sub(1));
    let mut level: Vec<(usize, usize)> = (0..n_points).map(|point| (point, 1)).collect();
    let mut distance = 1.0;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            match *pair {
                [(left, left_count), (right, right_count)] => {
                    let count = left_count + right_count;
                    next.push((n_points + rows.len(), count));
                    rows.push((left, right, distance, count));
                }
                [single] => next.push(single),
                _ => {}
            }
        }
        level = next;
        distance += 1.0;
    }
    rows
}

/// Absorbs one point at a time into a growing cluster, producing a tree as
/// deep as it is wide.
///
/// # Examples
/// ```
/// use smartclust_test_support::linkage::chain_linkage;
///
/// assert_eq!(chain_linkage(3), vec![(0, 1, 1.0, 2), (3, 2, 2.0, 3)]);
/// ```
#[must_use]
pub fn chain_linkage(n_points: usize) -> Vec<LinkageRow> {
    (1..n_points)
        .map(|point| {
            let left = if point == 1 { 0 } else { n_points + point - 2 };
            (left, point, point as f64, point + 1)
        })
        .collect()
}

/// Single-linkage clustering of points on a line.
///
/// On a line the minimum spanning tree joins neighbours in sorted order, so
/// merging those gaps shortest first with a union-find reproduces the
/// single-linkage dendrogram.
///
/// # Examples
/// ```
/// use smartclust_test_support::linkage::single_linkage_1d;
///
/// let rows = single_linkage_1d(&[0.0, 10.0, 1.0]);
/// assert_eq!(rows, vec![(0, 2, 1.0, 2), (3, 1, 9.0, 3)]);
/// ```
#[must_use]
pub fn single_linkage_1d(points: &[f64]) -> Vec<LinkageRow> {
    let n_points = points.len();
    let mut order: Vec<usize> = (0..n_points).collect();
    order.sort_by(|&a, &b| points[a].total_cmp(&points[b]));

    let mut gaps: Vec<(f64, usize, usize)> = order
        .windows(2)
        .filter_map(|pair| match *pair {
            [a, b] => Some(((points[b] - points[a]).abs(), a, b)),
            _ => None,
        })
        .collect();
    gaps.sort_by(|x, y| x.0.total_cmp(&y.0));

    let mut components = DisjointSet::new(n_points);
    let mut rows = Vec::with_capacity(n_points.saturating_sub(1));
    for (distance, a, b) in gaps {
        let left_root = components.find(a);
        let right_root = components.find(b);
        let left = components.cluster[left_root];
        let right = components.cluster[right_root];
        let count = components.size[left_root] + components.size[right_root];
        let merged = components.union(left_root, right_root);
        components.cluster[merged] = n_points + rows.len();
        components.size[merged] = count;
        rows.push((left, right, distance, count));
    }
    rows
}

/// Uniform points in `[0, 1)`.
#[must_use]
pub fn random_points(n_points: usize, rng: &mut impl Rng) -> Vec<f64> {
    (0..n_points).map(|_| rng.r#gen::<f64>()).collect()
}

/// Agglomerates randomly chosen clusters at randomly growing distances.
///
/// Produces arbitrary tree shapes, from chains to balanced trees, with
/// occasional tied merge distances.
#[must_use]
pub fn random_linkage(n_points: usize, rng: &mut impl Rng) -> Vec<LinkageRow> {
    let mut active: Vec<(usize, usize)> = (0..n_points).map(|point| (point, 1)).collect();
    let mut rows = Vec::with_capacity(n_points.saturating_sub(1));
    let mut distance = 0.0;
    while active.len() > 1 {
        if rng.gen_bool(0.8) {
            distance += rng.gen_range(0.0..4.0);
        }
        let (left, left_count) = active.swap_remove(rng.gen_range(0..active.len()));
        let (right, right_count) = active.swap_remove(rng.gen_range(0..active.len()));
        let count = left_count + right_count;
        active.push((n_points + rows.len(), count));
        rows.push((left, right, distance, count));
    }
    rows
}

/// Union-find over point ids, tracking the dendrogram node and size of each
/// component.
#[derive(Clone, Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
    cluster: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            cluster: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    fn union(&mut self, left: usize, right: usize) -> usize {
        let (mut keep, mut absorb) = (self.find(left), self.find(right));
        if keep == absorb {
            return keep;
        }
        if self.rank[keep] < self.rank[absorb] {
            std::mem::swap(&mut keep, &mut absorb);
        }
        self.parent[absorb] = keep;
        if self.rank[keep] == self.rank[absorb] {
            self.rank[keep] = self.rank[keep].saturating_add(1);
        }
        keep
    }
}
