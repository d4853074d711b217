//! JSON export of a [`Report`].
//!
//! Document shape:
//! ```json
//! {
//!   "similar": [
//!     { "source": { "path": "...", "width": 1920, "height": 1080 },
//!       "duration": 65,
//!       "with": [ { "path": "...", "width": 1920, "height": 1080, "distance": 4 } ] }
//!   ],
//!   "unique": [ { "path": "...", "width": 640, "height": 480 } ]
//! }
//! ```
//! `duration` is present only for video clusters. Paths that are not valid
//! UTF-8 are written with U+FFFD in place of the bad bytes.

use super::Report;
use crate::core::fingerprint::FileRecord;
use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonReport {
    pub similar: Vec<JsonCluster>,
    pub unique: Vec<JsonFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCluster {
    pub source: JsonFile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub with: Vec<JsonMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonFile {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonMatch {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub distance: u32,
}

impl From<&FileRecord> for JsonFile {
    fn from(record: &FileRecord) -> Self {
        let (width, height) = record.fingerprint.dimensions();
        Self {
            path: record.path.to_string_lossy().into_owned(),
            width,
            height,
        }
    }
}

impl From<&Report> for JsonReport {
    fn from(report: &Report) -> Self {
        let similar = report
            .clusters()
            .iter()
            .map(|cluster| JsonCluster {
                source: JsonFile::from(&cluster.representative),
                duration: cluster.representative.fingerprint.duration_secs(),
                with: cluster
                    .matches
                    .iter()
                    .map(|m| {
                        let (width, height) = m.record.fingerprint.dimensions();
                        JsonMatch {
                            path: m.record.path.to_string_lossy().into_owned(),
                            width,
                            height,
                            distance: m.distance,
                        }
                    })
                    .collect(),
            })
            .collect();

        Self {
            similar,
            unique: report.uniques().iter().map(JsonFile::from).collect(),
        }
    }
}

/// Serialize the report as pretty-printed JSON into any writer
pub fn write_json_to<W: Write>(report: &Report, writer: W) -> Result<(), ReportError> {
    serde_json::to_writer_pretty(writer, &JsonReport::from(report))?;
    Ok(())
}

/// Write the report to `path`, replacing any existing file.
///
/// The document is serialized in memory first; the file is only touched
/// once serialization has succeeded.
pub fn write_json(report: &Report, path: &Path) -> Result<(), ReportError> {
    let mut buffer = Vec::new();
    write_json_to(report, &mut buffer)?;

    fs::write(path, &buffer).map_err(|source| ReportError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), "report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::comparator::{ClusterMatch, ClusterOutcome, DuplicateCluster};
    use crate::core::fingerprint::{Fingerprint, PhotoFingerprint, VideoFingerprint};
    use crate::core::hasher::ImageHashValue;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn hash() -> ImageHashValue {
        ImageHashValue::new(vec![0; 8])
    }

    fn photo(path: &str, width: u32, height: u32) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Photo(PhotoFingerprint {
                hash: hash(),
                width,
                height,
            }),
        }
    }

    fn video(path: &str) -> FileRecord {
        FileRecord {
            path: PathBuf::from(path),
            fingerprint: Fingerprint::Video(VideoFingerprint {
                hashes: [hash(), hash(), hash()],
                width: 1280,
                height: 720,
                duration_secs: 65,
            }),
        }
    }

    fn sample_report() -> Report {
        let photos = ClusterOutcome {
            clusters: vec![DuplicateCluster {
                representative: photo("/photos/a.jpg", 800, 600),
                matches: vec![ClusterMatch {
                    record: photo("/photos/a-copy.png", 400, 300),
                    distance: 3,
                }],
            }],
            uniques: vec![photo("/photos/b.jpg", 10, 20)],
        };
        let videos = ClusterOutcome {
            clusters: vec![DuplicateCluster {
                representative: video("/videos/x.mp4"),
                matches: vec![ClusterMatch {
                    record: video("/videos/x-reencoded.mov"),
                    distance: 11,
                }],
            }],
            uniques: Vec::new(),
        };
        Report::assemble(photos, videos)
    }

    #[test]
    fn json_uses_similar_and_unique_arrays() {
        let mut buffer = Vec::new();
        write_json_to(&sample_report(), &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["similar"].as_array().unwrap().len(), 2);
        assert_eq!(value["unique"][0]["path"], "/photos/b.jpg");
        assert_eq!(value["similar"][0]["source"]["width"], 800);
        assert_eq!(value["similar"][0]["with"][0]["distance"], 3);
        assert_eq!(value["similar"][0]["with"][0]["height"], 300);
    }

    #[test]
    fn duration_only_on_video_clusters() {
        let document = JsonReport::from(&sample_report());

        assert_eq!(document.similar[0].duration, None);
        assert_eq!(document.similar[1].duration, Some(65));

        let text = serde_json::to_string(&document.similar[0]).unwrap();
        assert!(!text.contains("duration"));
    }

    #[test]
    fn written_file_parses_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("duplicate.json");

        write_json(&sample_report(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let document: JsonReport = serde_json::from_str(&text).unwrap();
        assert_eq!(document, JsonReport::from(&sample_report()));
    }

    #[test]
    fn unwritable_path_is_a_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("duplicate.json");

        let result = write_json(&Report::default(), &path);

        assert!(matches!(result, Err(ReportError::Write { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_written_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = Path::new("/photos").join(OsStr::from_bytes(b"caf\xe9.jpg"));
        let record = FileRecord {
            path: name,
            ..photo("/unused", 4, 3)
        };
        let report = Report::assemble(
            ClusterOutcome {
                clusters: Vec::new(),
                uniques: vec![record],
            },
            ClusterOutcome::default(),
        );
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("duplicate.json");

        write_json(&report, &path).unwrap();

        let document: JsonReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document.unique[0].path, "/photos/caf\u{FFFD}.jpg");
        assert_eq!(document.unique[0].width, 4);
    }

    #[test]
    fn failed_write_leaves_target_untouched() {
        let dir = TempDir::new().unwrap();
        // A directory in the report's place makes the write itself fail
        let path = dir.path().join("duplicate.json");
        std::fs::create_dir(&path).unwrap();

        let result = write_json(&sample_report(), &path);

        assert!(matches!(result, Err(ReportError::Write { .. })));
        assert!(path.is_dir());
    }
}
