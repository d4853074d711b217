//! Trait definitions for comparison strategies.

/// Strategy trait for deciding whether two fingerprints are duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Determine if two files should be considered duplicates based on distance
    fn is_duplicate(&self, distance: u32) -> bool;
}

/// Accept threshold for one media kind. Acceptance is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdStrategy {
    /// Maximum distance (photo) or summed three-frame distance (video)
    threshold: u32,
}

impl ThresholdStrategy {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

impl ComparisonStrategy for ThresholdStrategy {
    fn is_duplicate(&self, distance: u32) -> bool {
        distance <= self.threshold
    }
}
