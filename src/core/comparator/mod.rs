//! # Comparator Module
//!
//! Groups fingerprinted files into near-duplicate clusters.
//!
//! ## How It Works
//! 1. Each record in collection order gets a turn as representative
//! 2. Every later record still in play is compared against it
//! 3. Accepted candidates join the representative's cluster and drop out
//!    of every later comparison
//!
//! The pass is greedy and order-dependent: a record consumed as a match
//! never leads a cluster of its own, even when it sits closer to some
//! later record than its representative does.

mod grouper;
mod traits;

pub use grouper::GreedyClusterer;
pub use traits::{ComparisonStrategy, ThresholdStrategy};

use crate::core::fingerprint::FileRecord;

/// One accepted candidate and its distance to the representative
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterMatch {
    pub record: FileRecord,
    pub distance: u32,
}

/// A representative plus everything judged a near-duplicate of it
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCluster {
    pub representative: FileRecord,
    /// Never empty; sorted by distance, farthest first
    pub matches: Vec<ClusterMatch>,
}

impl DuplicateCluster {
    /// Representative plus matches
    pub fn file_count(&self) -> usize {
        self.matches.len() + 1
    }
}

/// Result of clustering one collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterOutcome {
    pub clusters: Vec<DuplicateCluster>,
    /// Records never matched, in collection order
    pub uniques: Vec<FileRecord>,
}

impl ClusterOutcome {
    /// Records accounted for: representatives, matches and uniques
    pub fn record_count(&self) -> usize {
        self.clusters
            .iter()
            .map(DuplicateCluster::file_count)
            .sum::<usize>()
            + self.uniques.len()
    }
}
