//! # Hasher Module
//!
//! The perceptual hash primitive and the image decoder it sits on.
//!
//! Fingerprinting only needs two operations from here: turn a decoded
//! bitmap into a fixed-length bit vector, and measure the Hamming distance
//! between two of them. Photos and extracted video frames share this path.
//!
//! ## Example
//! ```rust,ignore
//! use media_dedup::core::hasher::{FastDecoder, HashAlgorithm, ImageHasher};
//!
//! let hasher = ImageHasher::new();
//! let hash = hasher.hash_image(&FastDecoder::decode(&path)?)?;
//! ```

mod algorithms;
pub mod fast_decode;
mod traits;

pub use algorithms::ImageHasher;
pub use fast_decode::FastDecoder;
pub use traits::{HashAlgorithm, ImageHashValue, PerceptualHash};
