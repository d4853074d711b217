//! Pipeline execution implementation.

use crate::core::comparator::{GreedyClusterer, ThresholdStrategy};
use crate::core::counter::ScanTotals;
use crate::core::fingerprint::{FfmpegTool, MediaExtractor, MediaFingerprinter};
use crate::core::hasher::ImageHasher;
use crate::core::reporter::Report;
use crate::core::scanner::{MediaKind, ScanConfig, ScanScheduler};
use crate::error::{FingerprintError, MediaDedupError};
use crate::events::{null_sender, Event, EventSender, PipelineEvent, PipelinePhase, PipelineSummary};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    pub report: Report,
    pub totals: ScanTotals,
    /// Per-file failures, in the order they happened
    pub errors: Vec<FingerprintError>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directories to scan
    pub roots: Vec<PathBuf>,
    /// Accept threshold for photo pairs
    pub photo_threshold: u32,
    /// Accept threshold for the summed three-frame video distance
    pub video_threshold: u32,
    /// External video tool
    pub tool: PathBuf,
    /// Deadline for each tool invocation
    pub tool_timeout: Duration,
    /// Scanner configuration
    pub scan_config: ScanConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            photo_threshold: 8,
            video_threshold: 24,
            tool: PathBuf::from("ffmpeg"),
            tool_timeout: Duration::from_secs(60),
            scan_config: ScanConfig::default(),
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    fingerprinter: Option<Box<dyn MediaFingerprinter>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            fingerprinter: None,
        }
    }

    /// Directories to scan
    pub fn roots(mut self, roots: Vec<PathBuf>) -> Self {
        self.config.roots = roots;
        self
    }

    pub fn photo_threshold(mut self, threshold: u32) -> Self {
        self.config.photo_threshold = threshold;
        self
    }

    pub fn video_threshold(mut self, threshold: u32) -> Self {
        self.config.video_threshold = threshold;
        self
    }

    /// Maximum fingerprint tasks alive at once
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.config.scan_config.concurrency = limit;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.config.scan_config.follow_symlinks = follow;
        self
    }

    /// Path to the ffmpeg binary
    pub fn tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.config.tool = tool.into();
        self
    }

    pub fn tool_timeout(mut self, timeout: Duration) -> Self {
        self.config.tool_timeout = timeout;
        self
    }

    /// Replace the default image/ffmpeg fingerprinter
    pub fn fingerprinter(mut self, fingerprinter: Box<dyn MediaFingerprinter>) -> Self {
        self.fingerprinter = Some(fingerprinter);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let config = self.config;
        let fingerprinter = self.fingerprinter.unwrap_or_else(|| {
            Box::new(MediaExtractor::new(
                Box::new(ImageHasher::new()),
                Box::new(FfmpegTool::new(config.tool.clone(), config.tool_timeout)),
            ))
        });

        Pipeline {
            config,
            fingerprinter,
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The duplicate detection pipeline
pub struct Pipeline {
    config: PipelineConfig,
    fingerprinter: Box<dyn MediaFingerprinter>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, MediaDedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting.
    ///
    /// A fatal error (tool unusable, unreadable directory) is reported as a
    /// [`PipelineEvent::Error`] and returned; no report is produced.
    pub fn run_with_events(&self, events: &EventSender) -> Result<PipelineResult, MediaDedupError> {
        let result = self.execute(events);
        if let Err(e) = &result {
            warn!(error = %e, "run aborted");
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn execute(&self, events: &EventSender) -> Result<PipelineResult, MediaDedupError> {
        let start_time = Instant::now();

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Tool probe
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::ProbingTool,
        }));
        self.fingerprinter.check_ready()?;

        // Phase 2: Scan and fingerprint (full barrier on return)
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));
        let scanner = ScanScheduler::new(
            self.config.scan_config.clone(),
            self.fingerprinter.as_ref(),
        );
        let scan = scanner.scan_with_events(&self.config.roots, events)?;
        let photos_fingerprinted = scan.photos.len();
        let videos_fingerprinted = scan.videos.len();

        // Phase 3: Cluster each kind against its own threshold
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Clustering,
        }));
        let photo_strategy = ThresholdStrategy::new(self.config.photo_threshold);
        let video_strategy = ThresholdStrategy::new(self.config.video_threshold);

        info!(records = photos_fingerprinted, threshold = self.config.photo_threshold, "clustering photos");
        let photo_outcome = GreedyClusterer::new(&photo_strategy).cluster_with_events(
            scan.photos,
            MediaKind::Photo,
            events,
        );
        info!(records = videos_fingerprinted, threshold = self.config.video_threshold, "clustering videos");
        let video_outcome = GreedyClusterer::new(&video_strategy).cluster_with_events(
            scan.videos,
            MediaKind::Video,
            events,
        );

        // Phase 4: Assemble
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Reporting,
        }));
        let report = Report::assemble(photo_outcome, video_outcome);
        let report_summary = report.summary();
        let duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            clusters = report_summary.clusters,
            duplicates = report_summary.duplicates,
            uniques = report_summary.uniques,
            failures = scan.errors.len(),
            duration_ms,
            "run complete"
        );

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                totals: scan.totals,
                photos_fingerprinted,
                videos_fingerprinted,
                clusters: report_summary.clusters,
                uniques: report_summary.uniques,
                failures: scan.errors.len(),
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            report,
            totals: scan.totals,
            errors: scan.errors,
            duration_ms,
        })
    }
}
