//! # Core Module
//!
//! The duplicate detection engine.
//!
//! ## Modules
//! - `counter` - Byte and file totals for progress display
//! - `scanner` - Walks directories and schedules fingerprinting
//! - `hasher` - Computes perceptual hashes
//! - `fingerprint` - Photo and video fingerprints, external video tool
//! - `comparator` - Greedy near-duplicate clustering
//! - `reporter` - Report assembly and JSON export
//! - `pipeline` - Orchestrates the full workflow

pub mod comparator;
pub mod counter;
pub mod fingerprint;
pub mod hasher;
pub mod pipeline;
pub mod reporter;
pub mod scanner;

// Re-export commonly used types
pub use comparator::{ClusterMatch, DuplicateCluster};
pub use fingerprint::{FileRecord, Fingerprint};
pub use hasher::PerceptualHash;
pub use reporter::Report;
pub use scanner::MediaKind;
