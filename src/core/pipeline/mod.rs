//! # Pipeline Module
//!
//! Orchestrates one full run.
//!
//! ## Pipeline Stages
//! 1. **Probe** - Make sure the external video tool answers
//! 2. **Scan** - Walk every root and fingerprint photos and videos on a
//!    bounded pool; returns only after every task has finished
//! 3. **Cluster** - Greedy grouping, photos then videos, single-threaded
//! 4. **Report** - Assemble clusters and uniques into one report
//!
//! Each run owns its context (collections, counters, error list), so
//! several runs can happen in one process without sharing state.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
