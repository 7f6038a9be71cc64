//! Media type detection for previews and uploads

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    Pdf,
    Unknown,
}

impl MediaKind {
    /// Classify an object key by its extension.
    pub fn from_key(key: &str) -> Self {
        match extension(key).as_deref() {
            Some("jpg" | "jpeg" | "png" | "gif" | "webp" | "svg") => MediaKind::Image,
            // ogg plays as video first, like the browser preview does
            Some("mp4" | "webm" | "ogg" | "mov") => MediaKind::Video,
            Some("mp3" | "wav" | "aac") => MediaKind::Audio,
            Some("pdf") => MediaKind::Pdf,
            _ => MediaKind::Unknown,
        }
    }

    pub fn is_previewable(self) -> bool {
        self != MediaKind::Unknown
    }
}

/// Lowercased extension of the last path segment.
fn extension(key: &str) -> Option<String> {
    let name = key.rsplit('/').next().unwrap_or(key);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() && !name[1..].contains('.') {
        // dotfile such as ".env"
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Content type sent with an upload of `path`, guessed from its extension.
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension_case_insensitively() {
        assert_eq!(MediaKind::from_key("photos/Cat.JPG"), MediaKind::Image);
        assert_eq!(MediaKind::from_key("clip.mov"), MediaKind::Video);
        assert_eq!(MediaKind::from_key("song.ogg"), MediaKind::Video);
        assert_eq!(MediaKind::from_key("song.mp3"), MediaKind::Audio);
        assert_eq!(MediaKind::from_key("docs/report.pdf"), MediaKind::Pdf);
        assert_eq!(MediaKind::from_key("archive.tar.gz"), MediaKind::Unknown);
    }

    #[test]
    fn keys_without_extension_are_not_previewable() {
        assert!(!MediaKind::from_key("README").is_previewable());
        assert!(!MediaKind::from_key("photos/").is_previewable());
        assert!(!MediaKind::from_key(".png").is_previewable());
        assert!(MediaKind::from_key("a.webp").is_previewable());
    }

    #[test]
    fn content_type_falls_back_to_octet_stream() {
        assert_eq!(content_type_for(Path::new("/tmp/a.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("/tmp/notes.md")), "text/markdown");
        assert_eq!(content_type_for(Path::new("/tmp/noext")), "application/octet-stream");
        assert_eq!(
            content_type_for(Path::new("/tmp/blob.unknownext")),
            "application/octet-stream"
        );
    }
}
