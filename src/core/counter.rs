//! Running totals for the scan display.
//!
//! Byte totals use decimal units (1 KB = 1000 B) and carry upward
//! exactly, so no fractional drift builds up over millions of files.

use super::scanner::MediaKind;
use serde::{Deserialize, Serialize};

const UNIT: u64 = 1000;

/// Scanned byte total split into decimal units.
///
/// `b`, `kb`, `mb` and `gb` always stay below 1000; `tb` is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteCounter {
    pub b: u64,
    pub kb: u64,
    pub mb: u64,
    pub gb: u64,
    pub tb: u64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw byte count and carry overflow into the larger units
    pub fn add(&mut self, bytes: u64) {
        self.b += bytes;
        carry(&mut self.b, &mut self.kb);
        carry(&mut self.kb, &mut self.mb);
        carry(&mut self.mb, &mut self.gb);
        carry(&mut self.gb, &mut self.tb);
    }
}

fn carry(low: &mut u64, high: &mut u64) {
    if *low >= UNIT {
        *high += *low / UNIT;
        *low %= UNIT;
    }
}

impl std::fmt::Display for ByteCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}T {}G {}M {}K {}B",
            self.tb, self.gb, self.mb, self.kb, self.b
        )
    }
}

/// Traversal counters, owned by the walking thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTotals {
    pub bytes: ByteCounter,
    pub directories: usize,
    pub photo_files: usize,
    pub video_files: usize,
    pub skipped_files: usize,
}

impl ScanTotals {
    /// Count a regular file and return the running count for its kind
    pub fn record_file(&mut self, kind: MediaKind, size: u64) -> usize {
        self.bytes.add(size);
        match kind {
            MediaKind::Photo => {
                self.photo_files += 1;
                self.photo_files
            }
            MediaKind::Video => {
                self.video_files += 1;
                self.video_files
            }
            MediaKind::Skip => {
                self.skipped_files += 1;
                self.skipped_files
            }
        }
    }

    pub fn record_directory(&mut self) {
        self.directories += 1;
    }

    /// Files of every kind, skipped ones included
    pub fn total_files(&self) -> usize {
        self.photo_files + self.video_files + self.skipped_files
    }
}

impl std::fmt::Display for ScanTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}Dir {}Files({}Photo, {}Video, {}Skip)",
            self.bytes,
            self.directories,
            self.total_files(),
            self.photo_files,
            self.video_files,
            self.skipped_files
        )
    }
}

/// Format a single file size with decimal units and two decimals
pub fn format_size(bytes: u64) -> String {
    let x = bytes as f64;
    let unit = UNIT as f64;
    if x < unit {
        format!("{:7.2} B", x)
    } else if x < unit.powi(2) {
        format!("{:7.2}KB", x / unit)
    } else if x < unit.powi(3) {
        format!("{:7.2}MB", x / unit.powi(2))
    } else if x < unit.powi(4) {
        format!("{:7.2}GB", x / unit.powi(3))
    } else {
        format!("{:7.2}TB", x / unit.powi(4))
    }
}
