//! Video fingerprinting: probe, sample three frames, hash each.

use super::tool::FrameSource;
use super::VideoFingerprint;
use crate::core::hasher::{HashAlgorithm, ImageHashValue};
use crate::error::FingerprintError;
use std::path::Path;
use tracing::debug;

/// Frames hashed per video
pub const SAMPLE_COUNT: usize = 3;

/// Seek offsets, roughly centred in each third of the clip:
/// `i * (d/3) - (d/3)/2` for `i` in `0..3` (integer division).
///
/// The first offset is negative for any clip of three seconds or more;
/// see [`clamp_offset`].
pub fn sample_offsets(duration_secs: u64) -> [i64; SAMPLE_COUNT] {
    let third = (duration_secs / SAMPLE_COUNT as u64) as i64;
    let half = third / 2;
    [0i64, 1, 2].map(|i| i * third - half)
}

/// Negative seek offsets are pinned to the start of the clip
pub fn clamp_offset(offset: i64) -> u64 {
    offset.max(0) as u64
}

/// Fingerprint a video. Any failed frame fails the whole video; partial
/// hashes are discarded.
///
/// Dimensions come from the probe's stream metadata when present, else
/// from the first decoded frame.
pub fn extract_video(
    path: &Path,
    hasher: &dyn HashAlgorithm,
    frames: &dyn FrameSource,
) -> Result<VideoFingerprint, FingerprintError> {
    let probe = frames.probe(path)?;
    let mut dimensions = probe.dimensions;
    let mut hashes: Vec<ImageHashValue> = Vec::with_capacity(SAMPLE_COUNT);

    for offset in sample_offsets(probe.duration_secs).map(clamp_offset) {
        let frame = frames.frame_at(path, offset)?;
        if dimensions.is_none() {
            dimensions = Some((frame.width(), frame.height()));
        }
        let hash = hasher
            .hash_image(&frame)
            .map_err(|e| FingerprintError::FrameExtraction {
                path: path.to_path_buf(),
                offset,
                reason: e.to_string(),
            })?;
        hashes.push(hash);
    }

    let hashes: [ImageHashValue; SAMPLE_COUNT] =
        hashes
            .try_into()
            .map_err(|_| FingerprintError::FrameExtraction {
                path: path.to_path_buf(),
                offset: 0,
                reason: "wrong number of sampled frames".to_string(),
            })?;
    let (width, height) = dimensions.unwrap_or((0, 0));

    debug!(
        video = %path.display(),
        duration_secs = probe.duration_secs,
        width,
        height,
        "video fingerprinted"
    );

    Ok(VideoFingerprint {
        hashes,
        width,
        height,
        duration_secs: probe.duration_secs,
    })
}
