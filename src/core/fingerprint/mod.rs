//! # Fingerprint Module
//!
//! Turns a classified file into the hashes and metadata used for comparison.
//!
//! - Photos: one perceptual hash over the full decoded bitmap.
//! - Videos: three hashes from frames sampled across the clip, plus the
//!   clip's duration in whole seconds. A video with any failed frame is
//!   dropped as a whole.

mod photo;
mod tool;
mod video;

pub use photo::extract_photo;
pub use tool::{parse_dimensions, parse_duration, FfmpegTool, FrameSource, VideoProbe};
pub use video::{clamp_offset, extract_video, sample_offsets, SAMPLE_COUNT};

use crate::core::hasher::{HashAlgorithm, ImageHashValue, PerceptualHash};
use crate::core::scanner::MediaKind;
use crate::error::{FingerprintError, ScanError};
use std::path::{Path, PathBuf};

/// Hash and dimensions of a photo
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoFingerprint {
    pub hash: ImageHashValue,
    pub width: u32,
    pub height: u32,
}

/// Sampled-frame hashes of a video
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFingerprint {
    /// One hash per sample offset, in offset order
    pub hashes: [ImageHashValue; SAMPLE_COUNT],
    pub width: u32,
    pub height: u32,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fingerprint {
    Photo(PhotoFingerprint),
    Video(VideoFingerprint),
}

impl Fingerprint {
    pub fn kind(&self) -> MediaKind {
        match self {
            Fingerprint::Photo(_) => MediaKind::Photo,
            Fingerprint::Video(_) => MediaKind::Video,
        }
    }

    /// (width, height) in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Fingerprint::Photo(p) => (p.width, p.height),
            Fingerprint::Video(v) => (v.width, v.height),
        }
    }

    /// Clip length for videos, `None` for photos
    pub fn duration_secs(&self) -> Option<u64> {
        match self {
            Fingerprint::Photo(_) => None,
            Fingerprint::Video(v) => Some(v.duration_secs),
        }
    }

    /// Distance to another fingerprint, or `None` when the two are not
    /// comparable at all.
    ///
    /// Videos only compare when their durations are exactly equal, and then
    /// score the unweighted sum of the per-offset distances (offset 0 vs 0,
    /// 1 vs 1, 2 vs 2). Photos and videos never compare with each other.
    pub fn distance(&self, other: &Fingerprint) -> Option<u32> {
        match (self, other) {
            (Fingerprint::Photo(a), Fingerprint::Photo(b)) => Some(a.hash.distance(&b.hash)),
            (Fingerprint::Video(a), Fingerprint::Video(b)) => {
                if a.duration_secs != b.duration_secs {
                    return None;
                }
                Some(
                    a.hashes
                        .iter()
                        .zip(b.hashes.iter())
                        .map(|(x, y)| x.distance(y))
                        .sum(),
                )
            }
            _ => None,
        }
    }
}

/// One fingerprinted file. Immutable once it enters a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// Seam between the scan scheduler and fingerprinting
pub trait MediaFingerprinter: Send + Sync {
    /// Fingerprint one file of a known kind
    fn fingerprint(&self, path: &Path, kind: MediaKind) -> Result<Fingerprint, FingerprintError>;

    /// Fail fast if a dependency (the external video tool) is unusable
    fn check_ready(&self) -> Result<(), ScanError> {
        Ok(())
    }
}

/// Production fingerprinter: image decoding for photos, a [`FrameSource`]
/// for videos
pub struct MediaExtractor {
    hasher: Box<dyn HashAlgorithm>,
    frames: Box<dyn FrameSource>,
}

impl MediaExtractor {
    pub fn new(hasher: Box<dyn HashAlgorithm>, frames: Box<dyn FrameSource>) -> Self {
        Self { hasher, frames }
    }
}

impl MediaFingerprinter for MediaExtractor {
    fn fingerprint(&self, path: &Path, kind: MediaKind) -> Result<Fingerprint, FingerprintError> {
        match kind {
            MediaKind::Photo => extract_photo(path, self.hasher.as_ref()).map(Fingerprint::Photo),
            MediaKind::Video => {
                extract_video(path, self.hasher.as_ref(), self.frames.as_ref())
                    .map(Fingerprint::Video)
            }
            MediaKind::Skip => Err(FingerprintError::UnsupportedKind {
                path: path.to_path_buf(),
            }),
        }
    }

    fn check_ready(&self) -> Result<(), ScanError> {
        self.frames.check_available()
    }
}
