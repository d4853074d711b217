//! # Media Dedup
//!
//! Finds near-duplicate photos and videos across directory trees with
//! perceptual hashing and writes a JSON report of duplicate clusters and
//! unique survivors.
//!
//! ## Core Philosophy
//! - **Never touch the files** - the only output is a report
//! - **Bounded work** - at most `queueLimit` files are fingerprinted at once
//! - **Fail loud, skip quietly** - unreadable directories stop the run,
//!   unreadable files are listed at the end
//!
//! ## Architecture
//! - `core` - Scanning, fingerprinting, clustering and reporting
//! - `config` - The JSON run configuration
//! - `events` - Progress events for front ends
//! - `error` - Error taxonomy

pub mod config;
pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{MediaDedupError, Result};

/// Initialize tracing for the library
///
/// Reads the filter from `RUST_LOG`. Log lines go to stderr so they never
/// mix with report output. Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
