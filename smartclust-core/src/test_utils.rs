//! Shared test utilities for `smartclust-core`.

use proptest::test_runner::Config as ProptestConfig;
use smartclust_test_support::{
    ci::property_test_profile::ProptestRunProfile, linkage::LinkageRow,
};

use crate::{ClusterTree, LinkageRecord, SetPartitionProgram};

/// Default upper bound on points in generated linkages.
pub(crate) const DEFAULT_MAX_POINTS: usize = 48;

/// Builds a proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = suite_profile(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Loads the run profile used by property suites.
#[must_use]
pub(crate) fn suite_profile(default_cases: u32) -> ProptestRunProfile {
    ProptestRunProfile::load(default_cases, false, DEFAULT_MAX_POINTS)
}

/// Converts fixture rows into linkage records.
#[must_use]
pub(crate) fn to_records(rows: &[LinkageRow]) -> Vec<LinkageRecord> {
    rows.iter().copied().map(LinkageRecord::from).collect()
}

/// Builds a tree from fixture rows, panicking on malformed fixtures.
#[must_use]
pub(crate) fn tree_from_rows(rows: &[LinkageRow]) -> ClusterTree {
    ClusterTree::build(&to_records(rows)).expect("fixture rows form a valid tree")
}

/// Best objective value of `program` found by trying every selection.
///
/// Only usable for programs with at most ~20 variables.
#[must_use]
pub(crate) fn exhaustive_optimum(program: &SetPartitionProgram) -> f64 {
    let variables = program.variable_count();
    assert!(variables <= 20, "exhaustive search over {variables} variables");
    let mut best = f64::INFINITY;
    let mut selection = vec![false; variables];
    for mask in 0u32..(1 << variables) {
        for (bit, slot) in selection.iter_mut().enumerate() {
            *slot = mask & (1 << bit) != 0;
        }
        if let Some(value) = program.evaluate(&selection) {
            best = best.min(value);
        }
    }
    best
}
