//! Extension-based classification of regular files.

use super::MediaKind;
use std::collections::HashSet;
use std::path::Path;

const PHOTO_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "webp", "jfif"];
const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mov", "webm"];

/// Maps file extensions to a [`MediaKind`]
pub struct MediaFilter {
    photo_extensions: HashSet<String>,
    video_extensions: HashSet<String>,
}

impl MediaFilter {
    /// Filter with the default photo and video extension sets
    pub fn new() -> Self {
        Self {
            photo_extensions: PHOTO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Classify a path. Matching is case-insensitive; no extension means `Skip`.
    pub fn classify(&self, path: &Path) -> MediaKind {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return MediaKind::Skip;
        };

        let ext = ext.to_lowercase();
        if self.photo_extensions.contains(&ext) {
            MediaKind::Photo
        } else if self.video_extensions.contains(&ext) {
            MediaKind::Video
        } else {
            MediaKind::Skip
        }
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_photo_extension() {
        let filter = MediaFilter::new();
        for name in ["a.jpeg", "a.jpg", "a.png", "a.webp", "a.jfif"] {
            assert_eq!(filter.classify(Path::new(name)), MediaKind::Photo, "{name}");
        }
    }

    #[test]
    fn classifies_every_video_extension() {
        let filter = MediaFilter::new();
        for name in ["a.mp4", "a.mov", "a.webm"] {
            assert_eq!(filter.classify(Path::new(name)), MediaKind::Video, "{name}");
        }
    }

    #[test]
    fn matching_ignores_case() {
        let filter = MediaFilter::new();
        assert_eq!(filter.classify(Path::new("/m/IMG_0001.JPG")), MediaKind::Photo);
        assert_eq!(filter.classify(Path::new("/m/clip.MoV")), MediaKind::Video);
    }

    #[test]
    fn everything_else_is_skipped() {
        let filter = MediaFilter::new();
        assert_eq!(filter.classify(Path::new("/m/notes.txt")), MediaKind::Skip);
        assert_eq!(filter.classify(Path::new("/m/raw.heic")), MediaKind::Skip);
        assert_eq!(filter.classify(Path::new("/m/no_extension")), MediaKind::Skip);
        assert_eq!(filter.classify(Path::new("/m/.jpg")), MediaKind::Skip);
    }
}
