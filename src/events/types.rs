//! Event type definitions for progress reporting.

use crate::core::counter::ScanTotals;
use crate::core::scanner::MediaKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the duplicate finder pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory traversal events
    Scan(ScanEvent),
    /// Per-file fingerprinting events
    Fingerprint(FingerprintEvent),
    /// Clustering phase events
    Cluster(ClusterEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during directory traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Traversal of one search root has started
    RootStarted { root: PathBuf },
    /// A directory was entered
    DirectoryEntered {
        path: PathBuf,
        depth: usize,
        totals: ScanTotals,
    },
    /// A regular file was found and classified
    FileDiscovered {
        path: PathBuf,
        kind: MediaKind,
        size: u64,
        depth: usize,
        /// Running count of files of this kind, including this one
        ordinal: usize,
    },
    /// Every root was walked and every fingerprint task has finished
    Completed { totals: ScanTotals },
}

/// Events from fingerprint tasks (emitted from worker threads)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FingerprintEvent {
    /// A record was appended to its collection
    Recorded { path: PathBuf, kind: MediaKind },
    /// The file was dropped; the error is kept for the end-of-run summary
    Failed { path: PathBuf, message: String },
}

/// Events during clustering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClusterEvent {
    /// Clustering of one media kind has started
    Started { kind: MediaKind, total: usize },
    /// A cluster was emitted
    ClusterFound {
        kind: MediaKind,
        representative: PathBuf,
        match_count: usize,
    },
    /// Clustering of one media kind finished
    Completed {
        kind: MediaKind,
        clusters: usize,
        uniques: usize,
    },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline hit a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    ProbingTool,
    Scanning,
    Clustering,
    Reporting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub totals: ScanTotals,
    pub photos_fingerprinted: usize,
    pub videos_fingerprinted: usize,
    pub clusters: usize,
    pub uniques: usize,
    pub failures: usize,
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::ProbingTool => write!(f, "Checking external tool"),
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Clustering => write!(f, "Clustering"),
            PipelinePhase::Reporting => write!(f, "Reporting"),
        }
    }
}
