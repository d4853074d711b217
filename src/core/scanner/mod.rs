//! # Scanner Module
//!
//! Walks directory trees and fingerprints every photo and video it finds.
//!
//! ## Supported Formats
//! - Photos: `.jpeg`, `.jpg`, `.png`, `.webp`, `.jfif`
//! - Videos: `.mp4`, `.mov`, `.webm`
//!
//! Anything else is counted and skipped.
//!
//! ## Example
//! ```rust,ignore
//! use media_dedup::core::scanner::{ScanConfig, ScanScheduler};
//!
//! let scheduler = ScanScheduler::new(ScanConfig::default(), fingerprinter.as_ref());
//! let outcome = scheduler.scan(&["/Users/media".into()])?;
//! ```

mod filter;
mod slots;
mod walker;

pub use filter::MediaFilter;
pub use slots::{SlotPermit, SlotSemaphore};
pub use walker::{ScanConfig, ScanScheduler};

use crate::core::counter::ScanTotals;
use crate::core::fingerprint::FileRecord;
use crate::error::FingerprintError;
use serde::{Deserialize, Serialize};

/// What a regular file is treated as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
    /// Counted toward totals, never fingerprinted
    Skip,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Photo => write!(f, "Photo"),
            MediaKind::Video => write!(f, "Video"),
            MediaKind::Skip => write!(f, "Skip"),
        }
    }
}

/// Everything a completed scan produced.
///
/// Collection order is the order tasks finished in and differs between
/// runs.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub photos: Vec<FileRecord>,
    pub videos: Vec<FileRecord>,
    /// Per-file failures, surfaced together at the end of the run
    pub errors: Vec<FingerprintError>,
    pub totals: ScanTotals,
}
