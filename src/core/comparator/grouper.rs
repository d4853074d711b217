//! Greedy single-pass clustering.
//!
//! Records are never removed from the working list; a consumed marker per
//! index stands in for removal, so indices stay stable during the pass.

use super::{ClusterMatch, ClusterOutcome, ComparisonStrategy, DuplicateCluster};
use crate::core::fingerprint::FileRecord;
use crate::core::scanner::MediaKind;
use crate::events::{ClusterEvent, Event, EventSender};
use tracing::debug;

/// Clusters one media kind's collection against an accept threshold
pub struct GreedyClusterer<'a> {
    strategy: &'a dyn ComparisonStrategy,
}

impl<'a> GreedyClusterer<'a> {
    pub fn new(strategy: &'a dyn ComparisonStrategy) -> Self {
        Self { strategy }
    }

    pub fn cluster(&self, records: Vec<FileRecord>) -> ClusterOutcome {
        self.cluster_with_events(records, MediaKind::Photo, &crate::events::null_sender())
    }

    /// Cluster `records` and report each emitted cluster.
    ///
    /// `kind` only labels the events; comparability (photo vs video, equal
    /// video durations) is decided by the fingerprints themselves.
    pub fn cluster_with_events(
        &self,
        records: Vec<FileRecord>,
        kind: MediaKind,
        events: &EventSender,
    ) -> ClusterOutcome {
        let total = records.len();
        events.send(Event::Cluster(ClusterEvent::Started { kind, total }));

        let mut consumed = vec![false; total];
        // (representative, [(candidate, distance)]) by index
        let mut groups: Vec<(usize, Vec<(usize, u32)>)> = Vec::new();

        for i in 0..total {
            if consumed[i] {
                continue;
            }
            let representative = &records[i];
            let mut matches = Vec::new();

            for j in (i + 1)..total {
                if consumed[j] {
                    continue;
                }
                let candidate = &records[j];
                if representative.path == candidate.path {
                    continue;
                }
                let Some(distance) = representative
                    .fingerprint
                    .distance(&candidate.fingerprint)
                else {
                    continue;
                };
                if self.strategy.is_duplicate(distance) {
                    consumed[j] = true;
                    matches.push((j, distance));
                }
            }

            if !matches.is_empty() {
                consumed[i] = true;
                // Stable: ties keep discovery order
                matches.sort_by(|a, b| b.1.cmp(&a.1));
                debug!(
                    representative = %representative.path.display(),
                    matches = matches.len(),
                    "cluster found"
                );
                events.send(Event::Cluster(ClusterEvent::ClusterFound {
                    kind,
                    representative: representative.path.clone(),
                    match_count: matches.len(),
                }));
                groups.push((i, matches));
            }
        }

        let mut slots: Vec<Option<FileRecord>> = records.into_iter().map(Some).collect();
        let clusters: Vec<DuplicateCluster> = groups
            .into_iter()
            .filter_map(|(rep, matches)| {
                let representative = slots[rep].take()?;
                let matches = matches
                    .into_iter()
                    .filter_map(|(index, distance)| {
                        slots[index]
                            .take()
                            .map(|record| ClusterMatch { record, distance })
                    })
                    .collect();
                Some(DuplicateCluster {
                    representative,
                    matches,
                })
            })
            .collect();
        let uniques: Vec<FileRecord> = slots.into_iter().flatten().collect();

        events.send(Event::Cluster(ClusterEvent::Completed {
            kind,
            clusters: clusters.len(),
            uniques: uniques.len(),
        }));

        ClusterOutcome { clusters, uniques }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::ThresholdStrategy;
    use crate::core::fingerprint::{Fingerprint, PhotoFingerprint, VideoFingerprint};
    use crate::core::hasher::ImageHashValue;
    use std::collections::HashSet;
    use std::path::PathBuf;

    fn hash(bits: u64) -> ImageHashValue {
        ImageHashValue::new(bits.to_be_bytes().to_vec())
    }

    /// `n` low bits set, so distance between photo(a) and photo(b) is |a - b|
    fn ones(n: u32) -> u64 {
        if n == 0 {
            0
        } else {
            u64::MAX >> (64 - n)
        }
    }

    fn photo(path: &str, bits: u64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Photo(PhotoFingerprint {
                hash: hash(bits),
                width: 100,
                height: 100,
            }),
        }
    }

    fn video(path: &str, bits: u64, duration_secs: u64) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Video(VideoFingerprint {
                hashes: [hash(bits), hash(bits), hash(bits)],
                width: 640,
                height: 360,
                duration_secs,
            }),
        }
    }

    fn paths(records: &[FileRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.path.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        let strategy = ThresholdStrategy::new(10);
        let outcome = GreedyClusterer::new(&strategy).cluster(Vec::new());
        assert!(outcome.clusters.is_empty());
        assert!(outcome.uniques.is_empty());
    }

    #[test]
    fn single_record_is_unique() {
        let strategy = ThresholdStrategy::new(10);
        let outcome = GreedyClusterer::new(&strategy).cluster(vec![photo("/a.jpg", 0)]);
        assert!(outcome.clusters.is_empty());
        assert_eq!(paths(&outcome.uniques), vec!["/a.jpg"]);
    }

    #[test]
    fn identical_hashes_form_one_cluster_in_any_order() {
        let strategy = ThresholdStrategy::new(0);
        let names = ["/a.jpg", "/b.jpg", "/c.jpg", "/d.jpg", "/e.jpg"];

        for rotation in 0..names.len() {
            let mut order = names.to_vec();
            order.rotate_left(rotation);
            let records = order.iter().map(|p| photo(p, 0xABCD)).collect();

            let outcome = GreedyClusterer::new(&strategy).cluster(records);

            assert_eq!(outcome.clusters.len(), 1);
            assert_eq!(outcome.clusters[0].matches.len(), names.len() - 1);
            assert!(outcome.uniques.is_empty());
        }
    }

    #[test]
    fn no_record_is_lost_or_duplicated() {
        let strategy = ThresholdStrategy::new(3);
        let records: Vec<FileRecord> = (0..40u32)
            .map(|i| photo(&format!("/{i}.jpg"), ones((i * 7) % 13)))
            .collect();
        let original: HashSet<PathBuf> = records.iter().map(|r| r.path.clone()).collect();

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert_eq!(outcome.record_count(), original.len());
        let mut seen = HashSet::new();
        for cluster in &outcome.clusters {
            assert!(seen.insert(cluster.representative.path.clone()));
            for m in &cluster.matches {
                assert!(seen.insert(m.record.path.clone()));
            }
        }
        for unique in &outcome.uniques {
            assert!(seen.insert(unique.path.clone()));
        }
        assert_eq!(seen, original);
    }

    #[test]
    fn consumed_records_are_never_compared_again() {
        // d(A,B)=5, d(A,C)=10, d(B,C)=5: B and C would match each other,
        // but B is consumed by A first. Hamming distance obeys the triangle
        // inequality, so d(B,C) cannot drop below d(A,C) - d(A,B) = 5.
        let strategy = ThresholdStrategy::new(8);
        let records = vec![
            photo("/A.jpg", 0),
            photo("/B.jpg", ones(5)),
            photo("/C.jpg", ones(10)),
        ];
        let dist = |x: &FileRecord, y: &FileRecord| x.fingerprint.distance(&y.fingerprint);
        assert_eq!(dist(&records[0], &records[1]), Some(5));
        assert_eq!(dist(&records[0], &records[2]), Some(10));
        assert_eq!(dist(&records[1], &records[2]), Some(5));

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert_eq!(outcome.clusters.len(), 1);
        let cluster = &outcome.clusters[0];
        assert_eq!(cluster.representative.path, PathBuf::from("/A.jpg"));
        assert_eq!(cluster.matches.len(), 1);
        assert_eq!(cluster.matches[0].record.path, PathBuf::from("/B.jpg"));
        assert_eq!(cluster.matches[0].distance, 5);
        assert_eq!(paths(&outcome.uniques), vec!["/C.jpg"]);
    }

    #[test]
    fn matches_are_sorted_farthest_first() {
        let strategy = ThresholdStrategy::new(10);
        let records = vec![
            photo("/rep.jpg", 0),
            photo("/three.jpg", ones(3)),
            photo("/seven.jpg", ones(7)),
            photo("/one.jpg", ones(1)),
        ];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        let distances: Vec<u32> = outcome.clusters[0]
            .matches
            .iter()
            .map(|m| m.distance)
            .collect();
        assert_eq!(distances, vec![7, 3, 1]);
    }

    #[test]
    fn equal_distances_keep_discovery_order() {
        let strategy = ThresholdStrategy::new(10);
        let records = vec![
            photo("/rep.jpg", 0),
            photo("/first.jpg", 0b1),
            photo("/far.jpg", ones(4)),
            photo("/second.jpg", 0b10),
        ];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        let order: Vec<String> = outcome.clusters[0]
            .matches
            .iter()
            .map(|m| m.record.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(order, vec!["/far.jpg", "/first.jpg", "/second.jpg"]);
    }

    #[test]
    fn threshold_is_inclusive() {
        let strategy = ThresholdStrategy::new(4);
        let records = vec![photo("/a.jpg", 0), photo("/b.jpg", ones(4)), photo("/c.jpg", ones(5) << 20)];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(outcome.clusters[0].matches[0].distance, 4);
        assert_eq!(paths(&outcome.uniques), vec!["/c.jpg"]);
    }

    #[test]
    fn unmatched_representative_stays_unique_and_next_record_leads() {
        let strategy = ThresholdStrategy::new(2);
        let records = vec![
            photo("/lonely.jpg", u64::MAX),
            photo("/x.jpg", 0),
            photo("/y.jpg", 1),
        ];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(outcome.clusters[0].representative.path, PathBuf::from("/x.jpg"));
        assert_eq!(paths(&outcome.uniques), vec!["/lonely.jpg"]);
    }

    #[test]
    fn same_path_is_never_matched_with_itself() {
        let strategy = ThresholdStrategy::new(64);
        let records = vec![photo("/same.jpg", 0), photo("/same.jpg", 0)];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert!(outcome.clusters.is_empty());
        assert_eq!(outcome.uniques.len(), 2);
    }

    #[test]
    fn videos_of_different_length_never_cluster() {
        let strategy = ThresholdStrategy::new(u32::MAX);
        let records = vec![video("/a.mp4", 7, 60), video("/b.mp4", 7, 61)];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert!(outcome.clusters.is_empty());
        assert_eq!(outcome.uniques.len(), 2);
    }

    #[test]
    fn video_distance_is_summed_over_frames() {
        let strategy = ThresholdStrategy::new(6);
        let records = vec![video("/a.mp4", 0, 30), video("/b.mp4", ones(2), 30)];

        let outcome = GreedyClusterer::new(&strategy).cluster(records);

        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(outcome.clusters[0].matches[0].distance, 6);
    }

    #[test]
    fn events_report_each_cluster() {
        use crate::events::EventChannel;

        let (sender, receiver) = EventChannel::new();
        let strategy = ThresholdStrategy::new(0);
        let records = vec![photo("/a.jpg", 0), photo("/b.jpg", 0), photo("/c.jpg", u64::MAX)];

        GreedyClusterer::new(&strategy).cluster_with_events(records, MediaKind::Photo, &sender);
        drop(sender);

        let events: Vec<_> = receiver.iter().collect();
        match &events[0] {
            Event::Cluster(ClusterEvent::Started { total, .. }) => assert_eq!(*total, 3),
            _ => panic!("Expected Started event"),
        }
        match events.last() {
            Some(Event::Cluster(ClusterEvent::Completed {
                clusters, uniques, ..
            })) => {
                assert_eq!(*clusters, 1);
                assert_eq!(*uniques, 1);
            }
            _ => panic!("Expected Completed event"),
        }
    }
}
