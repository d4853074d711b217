//! # Reporter Module
//!
//! Assembles the run's clusters and uniques into one [`Report`] and writes
//! it out as JSON.
//!
//! ## Ordering
//! Photo clusters come before video clusters and photo uniques before video
//! uniques; each kind keeps the order the clusterer produced.

mod export;

pub use export::{write_json, write_json_to, JsonCluster, JsonFile, JsonMatch, JsonReport};

use crate::core::comparator::{ClusterOutcome, DuplicateCluster};
use crate::core::fingerprint::FileRecord;
use serde::{Deserialize, Serialize};

/// Final, immutable result of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    clusters: Vec<DuplicateCluster>,
    uniques: Vec<FileRecord>,
}

impl Report {
    /// Concatenate per-kind outcomes, photos first
    pub fn assemble(photos: ClusterOutcome, videos: ClusterOutcome) -> Self {
        let mut clusters = photos.clusters;
        clusters.extend(videos.clusters);
        let mut uniques = photos.uniques;
        uniques.extend(videos.uniques);
        Self { clusters, uniques }
    }

    pub fn clusters(&self) -> &[DuplicateCluster] {
        &self.clusters
    }

    pub fn uniques(&self) -> &[FileRecord] {
        &self.uniques
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            clusters: self.clusters.len(),
            duplicates: self.clusters.iter().map(|c| c.matches.len()).sum(),
            uniques: self.uniques.len(),
        }
    }
}

/// Counts shown once the report is written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub clusters: usize,
    /// Matches across all clusters, representatives excluded
    pub duplicates: usize,
    pub uniques: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::ClusterMatch;
    use crate::core::fingerprint::{Fingerprint, PhotoFingerprint, VideoFingerprint};
    use crate::core::hasher::ImageHashValue;
    use std::path::PathBuf;

    fn hash() -> ImageHashValue {
        ImageHashValue::new(vec![0; 8])
    }

    fn photo(path: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Photo(PhotoFingerprint {
                hash: hash(),
                width: 4,
                height: 3,
            }),
        }
    }

    fn video(path: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Video(VideoFingerprint {
                hashes: [hash(), hash(), hash()],
                width: 1920,
                height: 1080,
                duration_secs: 12,
            }),
        }
    }

    fn cluster(rep: FileRecord, matches: Vec<FileRecord>) -> DuplicateCluster {
        DuplicateCluster {
            representative: rep,
            matches: matches
                .into_iter()
                .map(|record| ClusterMatch {
                    record,
                    distance: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn photos_come_before_videos() {
        let photos = ClusterOutcome {
            clusters: vec![cluster(photo("/p1.jpg"), vec![photo("/p2.jpg")])],
            uniques: vec![photo("/p3.jpg")],
        };
        let videos = ClusterOutcome {
            clusters: vec![cluster(video("/v1.mp4"), vec![video("/v2.mp4")])],
            uniques: vec![video("/v3.mp4")],
        };

        let report = Report::assemble(photos, videos);

        let reps: Vec<_> = report
            .clusters()
            .iter()
            .map(|c| c.representative.path.clone())
            .collect();
        assert_eq!(reps, vec![PathBuf::from("/p1.jpg"), PathBuf::from("/v1.mp4")]);
        let uniques: Vec<_> = report.uniques().iter().map(|u| u.path.clone()).collect();
        assert_eq!(uniques, vec![PathBuf::from("/p3.jpg"), PathBuf::from("/v3.mp4")]);
    }

    #[test]
    fn summary_counts_matches_not_representatives() {
        let photos = ClusterOutcome {
            clusters: vec![cluster(
                photo("/a.jpg"),
                vec![photo("/b.jpg"), photo("/c.jpg")],
            )],
            uniques: vec![photo("/d.jpg")],
        };

        let summary = Report::assemble(photos, ClusterOutcome::default()).summary();

        assert_eq!(
            summary,
            ReportSummary {
                clusters: 1,
                duplicates: 2,
                uniques: 1,
            }
        );
    }
}
