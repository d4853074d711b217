//! Trait definitions for perceptual hashing.

use crate::error::FingerprintError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Hamming distance to another hash. Lower = more similar.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-decoded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, FingerprintError>;
}

/// Fixed-length bit vector produced by a [`HashAlgorithm`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHashValue {
    bytes: Vec<u8>,
}

impl ImageHashValue {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl PerceptualHash for ImageHashValue {
    fn distance(&self, other: &Self) -> u32 {
        // Hamming distance: count differing bits
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
