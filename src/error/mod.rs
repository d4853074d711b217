//! # Error Module
//!
//! Error types for the media duplicate finder.
//!
//! ## Failure Classes
//! - **Fatal** ([`ScanError`], [`ReportError`], `Config`) - the run stops and
//!   no report is written
//! - **Per file** ([`FingerprintError`]) - the file is left out of every
//!   collection, the error is collected and the scan carries on

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum MediaDedupError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Fingerprint error: {0}")]
    Fingerprint(#[from] FingerprintError),

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that abort the whole scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("External tool {tool} is not usable: {reason}")]
    ToolUnavailable { tool: PathBuf, reason: String },

    #[error("Failed to start fingerprint workers: {0}")]
    WorkerPool(String),
}

/// Errors that drop a single file from the scan
#[derive(Error, Debug)]
pub enum FingerprintError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Failed to probe video {path}: {reason}")]
    Probe { path: PathBuf, reason: String },

    #[error("Failed to extract frame at {offset}s from {path}: {reason}")]
    FrameExtraction {
        path: PathBuf,
        offset: u64,
        reason: String,
    },

    #[error("External tool timed out after {seconds}s on {path}")]
    Timeout { path: PathBuf, seconds: u64 },

    #[error("Not a photo or video: {path}")]
    UnsupportedKind { path: PathBuf },
}

impl FingerprintError {
    /// The file this failure belongs to
    pub fn path(&self) -> &std::path::Path {
        match self {
            FingerprintError::Io { path, .. }
            | FingerprintError::Decode { path, .. }
            | FingerprintError::Probe { path, .. }
            | FingerprintError::FrameExtraction { path, .. }
            | FingerprintError::Timeout { path, .. }
            | FingerprintError::UnsupportedKind { path } => path,
        }
    }
}

/// Errors while writing the report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, MediaDedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_error_includes_path() {
        let error = ScanError::DirectoryNotFound {
            path: PathBuf::from("/media/vacation"),
        };
        assert!(error.to_string().contains("/media/vacation"));
    }

    #[test]
    fn frame_error_includes_offset_and_reason() {
        let error = FingerprintError::FrameExtraction {
            path: PathBuf::from("/media/clip.mp4"),
            offset: 30,
            reason: "no frame written".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/media/clip.mp4"));
        assert!(message.contains("30s"));
        assert!(message.contains("no frame written"));
    }

    #[test]
    fn fingerprint_error_exposes_path() {
        let error = FingerprintError::Timeout {
            path: PathBuf::from("/media/hang.mov"),
            seconds: 60,
        };
        assert_eq!(error.path(), std::path::Path::new("/media/hang.mov"));
    }

    #[test]
    fn tool_unavailable_is_wrapped() {
        let error: MediaDedupError = ScanError::ToolUnavailable {
            tool: PathBuf::from("ffmpeg"),
            reason: "not found".to_string(),
        }
        .into();
        assert!(error.to_string().starts_with("Scanning error"));
    }
}
