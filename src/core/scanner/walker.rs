//! Directory walking and bounded fingerprint dispatch.
//!
//! The calling thread walks the trees with walkdir; fingerprint tasks run
//! on a rayon pool sized to the concurrency limit. A [`SlotSemaphore`] with
//! the same limit is acquired before each submission, so the walk stalls
//! whenever every slot is busy and no more than `concurrency` tasks exist
//! at any moment (running or queued).

use super::filter::MediaFilter;
use super::slots::SlotSemaphore;
use super::{MediaKind, ScanOutcome};
use crate::core::counter::ScanTotals;
use crate::core::fingerprint::{FileRecord, MediaFingerprinter};
use crate::error::{FingerprintError, ScanError};
use crate::events::{Event, EventSender, FingerprintEvent, ScanEvent};
use rayon::ThreadPoolBuilder;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Configuration for the scan scheduler
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Maximum fingerprint tasks alive at once
    pub concurrency: usize,
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            follow_symlinks: false,
        }
    }
}

/// Shared accumulation target. Held only for a single push.
#[derive(Default)]
struct Collected {
    photos: Vec<FileRecord>,
    videos: Vec<FileRecord>,
    errors: Vec<FingerprintError>,
}

/// Per-scan state borrowed by every task
struct ScanContext<'a> {
    fingerprinter: &'a dyn MediaFingerprinter,
    collected: Mutex<Collected>,
    cancelled: AtomicBool,
    slots: SlotSemaphore,
    events: &'a EventSender,
}

impl ScanContext<'_> {
    fn run_task(&self, path: PathBuf, kind: MediaKind) {
        if self.cancelled.load(Ordering::SeqCst) {
            return;
        }

        match self.fingerprinter.fingerprint(&path, kind) {
            Ok(fingerprint) => {
                let record = FileRecord {
                    path: path.clone(),
                    fingerprint,
                };
                {
                    let mut collected =
                        self.collected.lock().unwrap_or_else(PoisonError::into_inner);
                    match kind {
                        MediaKind::Video => collected.videos.push(record),
                        _ => collected.photos.push(record),
                    }
                }
                self.events
                    .send(Event::Fingerprint(FingerprintEvent::Recorded { path, kind }));
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "fingerprint failed");
                let message = error.to_string();
                self.collected
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .errors
                    .push(error);
                self.events
                    .send(Event::Fingerprint(FingerprintEvent::Failed { path, message }));
            }
        }
    }
}

/// Walks search roots and fans fingerprinting out to a bounded pool
pub struct ScanScheduler<'a> {
    config: ScanConfig,
    filter: MediaFilter,
    fingerprinter: &'a dyn MediaFingerprinter,
}

impl<'a> ScanScheduler<'a> {
    pub fn new(config: ScanConfig, fingerprinter: &'a dyn MediaFingerprinter) -> Self {
        Self {
            config,
            filter: MediaFilter::new(),
            fingerprinter,
        }
    }

    pub fn scan(&self, roots: &[PathBuf]) -> Result<ScanOutcome, ScanError> {
        self.scan_with_events(roots, &crate::events::null_sender())
    }

    /// Walk every root, fingerprint every photo and video, and return once
    /// all submitted tasks have finished.
    ///
    /// An unreadable directory aborts the scan: tasks still queued skip
    /// their work, running ones drain, and the walk error is returned.
    pub fn scan_with_events(
        &self,
        roots: &[PathBuf],
        events: &EventSender,
    ) -> Result<ScanOutcome, ScanError> {
        let limit = self.config.concurrency.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(limit)
            .thread_name(|index| format!("fingerprint-{index}"))
            .build()
            .map_err(|e| ScanError::WorkerPool(e.to_string()))?;

        let context = ScanContext {
            fingerprinter: self.fingerprinter,
            collected: Mutex::new(Collected::default()),
            cancelled: AtomicBool::new(false),
            slots: SlotSemaphore::new(limit),
            events,
        };
        let mut totals = ScanTotals::default();

        info!(roots = roots.len(), concurrency = limit, "scan started");

        // in_place_scope keeps the walk on this thread and joins every
        // spawned task before returning.
        let walked = pool.in_place_scope(|scope| {
            for root in roots {
                events.send(Event::Scan(ScanEvent::RootStarted { root: root.clone() }));
                if let Err(error) = self.walk_root(root, &mut totals, events, |path, kind| {
                    let permit = context.slots.acquire();
                    let context = &context;
                    scope.spawn(move |_| {
                        let _permit = permit;
                        context.run_task(path, kind);
                    });
                }) {
                    context.cancelled.store(true, Ordering::SeqCst);
                    return Err(error);
                }
            }
            Ok(())
        });
        walked?;

        let collected = context
            .collected
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);

        info!(
            photos = collected.photos.len(),
            videos = collected.videos.len(),
            failures = collected.errors.len(),
            "scan finished: {}",
            totals
        );
        events.send(Event::Scan(ScanEvent::Completed { totals }));

        Ok(ScanOutcome {
            photos: collected.photos,
            videos: collected.videos,
            errors: collected.errors,
            totals,
        })
    }

    /// Depth-first walk of one root; `submit` is called for every photo and video
    fn walk_root<F>(
        &self,
        root: &Path,
        totals: &mut ScanTotals,
        events: &EventSender,
        mut submit: F,
    ) -> Result<(), ScanError>
    where
        F: FnMut(PathBuf, MediaKind),
    {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        for entry in WalkDir::new(root).follow_links(self.config.follow_symlinks) {
            let entry = entry.map_err(|e| walk_error(root, e))?;
            let file_type = entry.file_type();

            if file_type.is_dir() {
                totals.record_directory();
                events.send(Event::Scan(ScanEvent::DirectoryEntered {
                    path: entry.path().to_path_buf(),
                    depth: entry.depth(),
                    totals: *totals,
                }));
                continue;
            }

            if !file_type.is_file() {
                continue;
            }

            let size = entry
                .metadata()
                .map_err(|e| walk_error(root, e))?
                .len();
            let depth = entry.depth();
            let path = entry.into_path();
            let kind = self.filter.classify(&path);
            let ordinal = totals.record_file(kind, size);

            debug!(path = %path.display(), %kind, size, "file discovered");
            events.send(Event::Scan(ScanEvent::FileDiscovered {
                path: path.clone(),
                kind,
                size,
                depth,
                ordinal,
            }));

            if kind != MediaKind::Skip {
                submit(path, kind);
            }
        }

        Ok(())
    }
}

/// Map a walkdir failure to the fatal scan error it represents
fn walk_error(root: &Path, error: walkdir::Error) -> ScanError {
    let path = error
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());

    if error.io_error().map(io::Error::kind) == Some(io::ErrorKind::PermissionDenied) {
        return ScanError::PermissionDenied { path };
    }

    let message = error.to_string();
    let source = error
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    ScanError::ReadDirectory { path, source }
}
