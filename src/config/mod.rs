//! # Config Module
//!
//! The JSON run configuration.
//!
//! ```json
//! {
//!   "ffmpeg": "/usr/bin/ffmpeg",
//!   "search": ["/Users/me/Pictures", "/Volumes/Backup/DCIM"],
//!   "photoAccept": 8,
//!   "videoAccept": 24,
//!   "queueLimit": 8
//! }
//! ```
//!
//! Optional keys: `output` (default `duplicate.json`), `toolTimeoutSecs`
//! (default 60) and `followSymlinks` (default false).

use crate::core::pipeline::{Pipeline, PipelineBuilder};
use crate::error::MediaDedupError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_OUTPUT: &str = "duplicate.json";
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 60;

/// Settings for one run, as read from the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path to the ffmpeg binary
    pub ffmpeg: PathBuf,
    /// Directory trees to scan
    pub search: Vec<PathBuf>,
    /// Maximum photo hash distance still judged a duplicate
    pub photo_accept: u32,
    /// Maximum summed three-frame distance still judged a duplicate
    pub video_accept: u32,
    /// Maximum fingerprint tasks alive at once
    pub queue_limit: usize,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    #[serde(default = "default_tool_timeout")]
    pub tool_timeout_secs: u64,
    #[serde(default)]
    pub follow_symlinks: bool,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT)
}

fn default_tool_timeout() -> u64 {
    DEFAULT_TOOL_TIMEOUT_SECS
}

impl Config {
    /// Read, parse and validate a config file
    pub fn load(path: &Path) -> Result<Self, MediaDedupError> {
        let text = fs::read_to_string(path).map_err(|e| {
            MediaDedupError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
            .map_err(|e| MediaDedupError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate config text
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Config = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.search.is_empty() {
            return Err("\"search\" must name at least one directory".to_string());
        }
        if self.queue_limit == 0 {
            return Err("\"queueLimit\" must be at least 1".to_string());
        }
        if self.tool_timeout_secs == 0 {
            return Err("\"toolTimeoutSecs\" must be at least 1".to_string());
        }
        Ok(())
    }

    /// Override the concurrency limit; zero is rejected
    pub fn with_queue_limit(mut self, limit: usize) -> Result<Self, MediaDedupError> {
        if limit == 0 {
            return Err(MediaDedupError::Config(
                "queue limit must be at least 1".to_string(),
            ));
        }
        self.queue_limit = limit;
        Ok(self)
    }

    pub fn with_output(mut self, output: PathBuf) -> Self {
        self.output = output;
        self
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Pipeline builder carrying every setting in this config
    pub fn pipeline_builder(&self) -> PipelineBuilder {
        Pipeline::builder()
            .roots(self.search.clone())
            .photo_threshold(self.photo_accept)
            .video_threshold(self.video_accept)
            .concurrency(self.queue_limit)
            .follow_symlinks(self.follow_symlinks)
            .tool(self.ffmpeg.clone())
            .tool_timeout(self.tool_timeout())
    }

    /// `(label, value)` lines echoed at startup
    pub fn echo_lines(&self) -> Vec<(&'static str, String)> {
        let search = self
            .search
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        vec![
            ("FFmpeg", self.ffmpeg.display().to_string()),
            ("Search", search),
            ("Photo accept", self.photo_accept.to_string()),
            ("Video accept", self.video_accept.to_string()),
            ("Queue limit", self.queue_limit.to_string()),
            ("Tool timeout", format!("{}s", self.tool_timeout_secs)),
            ("Output", self.output.display().to_string()),
        ]
    }
}
