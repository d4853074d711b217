//! External video tool (ffmpeg) wrapper.
//!
//! Two invocation shapes are used:
//! - probe: `ffmpeg -i <file>`; duration and stream size are parsed out of
//!   the diagnostic text on stderr (the command itself exits non-zero
//!   because no output is named)
//! - frame: `ffmpeg -y -ss <secs> -i <file> -frames:v 1 <tmp.png>`
//!
//! Every invocation runs under a deadline and is killed when it overruns.

use crate::core::hasher::FastDecoder;
use crate::error::{FingerprintError, ScanError};
use crossbeam_channel::bounded;
use image::DynamicImage;
use regex::Regex;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
/// How long stderr is still read after the child was killed
const STDERR_GRACE: Duration = Duration::from_millis(200);

/// What a probe learned about a video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoProbe {
    /// Whole seconds; fractional seconds are truncated
    pub duration_secs: u64,
    /// Stream pixel size, when the tool reported one
    pub dimensions: Option<(u32, u32)>,
}

/// Source of video metadata and still frames
pub trait FrameSource: Send + Sync {
    /// Verify the tool can be run at all
    fn check_available(&self) -> Result<(), ScanError>;

    fn probe(&self, video: &Path) -> Result<VideoProbe, FingerprintError>;

    /// Decode exactly one frame at `offset_secs`
    fn frame_at(&self, video: &Path, offset_secs: u64) -> Result<DynamicImage, FingerprintError>;
}

/// [`FrameSource`] backed by an ffmpeg binary
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    program: PathBuf,
    timeout: Duration,
}

impl FfmpegTool {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    fn timeout_error(&self, video: &Path) -> FingerprintError {
        FingerprintError::Timeout {
            path: video.to_path_buf(),
            seconds: self.timeout.as_secs(),
        }
    }
}

impl FrameSource for FfmpegTool {
    fn check_available(&self) -> Result<(), ScanError> {
        let unavailable = |reason: String| ScanError::ToolUnavailable {
            tool: self.program.clone(),
            reason,
        };

        let mut command = Command::new(&self.program);
        command.arg("-h");
        match run_with_deadline(command, self.timeout) {
            Ok(Some(output)) if output.status.success() => Ok(()),
            Ok(Some(output)) => Err(unavailable(format!("exited with {}", output.status))),
            Ok(None) => Err(unavailable(format!(
                "no answer within {}s",
                self.timeout.as_secs()
            ))),
            Err(e) => Err(unavailable(e.to_string())),
        }
    }

    fn probe(&self, video: &Path) -> Result<VideoProbe, FingerprintError> {
        let mut command = Command::new(&self.program);
        command.arg("-hide_banner").arg("-i").arg(video);
        debug!(video = %video.display(), "probing video");

        let output = run_with_deadline(command, self.timeout)
            .map_err(|e| FingerprintError::Probe {
                path: video.to_path_buf(),
                reason: e.to_string(),
            })?
            .ok_or_else(|| self.timeout_error(video))?;

        let text = String::from_utf8_lossy(&output.stderr);
        let duration_secs = parse_duration(&text).ok_or_else(|| FingerprintError::Probe {
            path: video.to_path_buf(),
            reason: "no Duration in tool output".to_string(),
        })?;

        Ok(VideoProbe {
            duration_secs,
            dimensions: parse_dimensions(&text),
        })
    }

    fn frame_at(&self, video: &Path, offset_secs: u64) -> Result<DynamicImage, FingerprintError> {
        let frame_error = |reason: String| FingerprintError::FrameExtraction {
            path: video.to_path_buf(),
            offset: offset_secs,
            reason,
        };

        // Unique per extraction, so same-named videos in different folders
        // never share a frame file. Deleted when `frame` drops.
        let stem = video
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".to_string());
        let frame = tempfile::Builder::new()
            .prefix(&format!("{stem}-frame-"))
            .suffix(".png")
            .tempfile()
            .map_err(|e| frame_error(format!("cannot create temporary frame: {e}")))?
            .into_temp_path();

        let mut command = Command::new(&self.program);
        command
            .args(["-hide_banner", "-loglevel", "error", "-y", "-ss"])
            .arg(offset_secs.to_string())
            .arg("-i")
            .arg(video)
            .args(["-frames:v", "1"])
            .arg(&*frame);
        debug!(video = %video.display(), offset_secs, frame = %frame.display(), "extracting frame");

        let output = run_with_deadline(command, self.timeout)
            .map_err(|e| frame_error(e.to_string()))?
            .ok_or_else(|| self.timeout_error(video))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(frame_error(format!(
                "tool exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        FastDecoder::decode(&frame).map_err(|e| frame_error(e.to_string()))
    }
}

/// Parse `Duration: HH:MM:SS` into whole seconds
pub fn parse_duration(text: &str) -> Option<u64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"Duration:\s*(\d{2,}):(\d{2}):(\d{2})").expect("duration pattern is valid")
    });

    let caps = pattern.captures(text)?;
    let hours: u64 = caps[1].parse().ok()?;
    let minutes: u64 = caps[2].parse().ok()?;
    let seconds: u64 = caps[3].parse().ok()?;
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60)?
        .checked_add(seconds)
}

/// Parse the `WxH` size from the first video stream line
pub fn parse_dimensions(text: &str) -> Option<(u32, u32)> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"\b(\d{2,5})x(\d{2,5})\b").expect("size pattern is valid"));

    text.lines()
        .filter(|line| line.contains("Video:"))
        .find_map(|line| {
            let caps = pattern.captures(line)?;
            let width = caps[1].parse().ok()?;
            let height = caps[2].parse().ok()?;
            Some((width, height))
        })
}

struct ToolOutput {
    status: ExitStatus,
    stderr: Vec<u8>,
}

/// Run a command, killing it at the deadline. `Ok(None)` means it timed out.
///
/// Only the direct child is killed. A descendant it left behind (a shell
/// wrapper's ffmpeg, say) may keep stderr open; the reader thread is then
/// abandoned rather than joined, so the call still returns at the deadline.
fn run_with_deadline(mut command: Command, timeout: Duration) -> io::Result<Option<ToolOutput>> {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    let mut child = command.spawn()?;

    // Drain stderr concurrently so a chatty child never blocks on a full pipe
    let stderr = child.stderr.take();
    let (sender, receiver) = bounded(1);
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Some(mut stderr) = stderr {
            let _ = stderr.read_to_end(&mut buffer);
        }
        let _ = sender.send(buffer);
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break Some(status);
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            break None;
        }
        thread::sleep(POLL_INTERVAL);
    };

    let wait = match status {
        Some(_) => deadline
            .saturating_duration_since(Instant::now())
            .max(STDERR_GRACE),
        None => STDERR_GRACE,
    };
    let stderr = receiver.recv_timeout(wait).unwrap_or_default();
    Ok(status.map(|status| ToolOutput { status, stderr }))
}
