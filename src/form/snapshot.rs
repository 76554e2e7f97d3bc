use super::field::Field;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Multipart part prefix for new uploads
    pub fn part_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
        }
    }

    /// Multipart part prefix for media kept from a previous upload
    pub fn existing_part_name(&self) -> &'static str {
        match self {
            MediaKind::Image => "existing_images",
            MediaKind::Video => "existing_videos",
        }
    }
}

/// A file picked for upload, held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("Failed to read media file: {:?}", path))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Media path has no file name")?
            .to_string();
        let mime_type = guess_mime(&file_name).to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    pub fn kind(&self) -> MediaKind {
        if self.mime_type.starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

fn guess_mime(file_name: &str) -> &'static str {
    let extension = file_name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    /// Already stored on the backend
    Existing { id: String, url: Option<String> },
    New(MediaFile),
}

/// Images and videos attached to the form, plus ids marked for deletion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaSelection {
    pub images: Vec<MediaItem>,
    pub videos: Vec<MediaItem>,
    pub removed: Vec<String>,
}

impl MediaSelection {
    pub fn add(&mut self, file: MediaFile) {
        match file.kind() {
            MediaKind::Image => self.images.push(MediaItem::New(file)),
            MediaKind::Video => self.videos.push(MediaItem::New(file)),
        }
    }

    pub fn add_existing(&mut self, kind: MediaKind, id: impl Into<String>, url: Option<String>) {
        let item = MediaItem::Existing { id: id.into(), url };
        match kind {
            MediaKind::Image => self.images.push(item),
            MediaKind::Video => self.videos.push(item),
        }
    }

    /// Drop an existing item and queue its id for deletion
    pub fn remove_existing(&mut self, id: &str) -> bool {
        let before = self.images.len() + self.videos.len();
        let keep = |item: &MediaItem| !matches!(item, MediaItem::Existing { id: existing, .. } if existing == id);
        self.images.retain(keep);
        self.videos.retain(keep);
        let removed = before != self.images.len() + self.videos.len();
        if removed && !self.removed.iter().any(|r| r == id) {
            self.removed.push(id.to_string());
        }
        removed
    }

    pub fn items(&self, kind: MediaKind) -> &[MediaItem] {
        match kind {
            MediaKind::Image => &self.images,
            MediaKind::Video => &self.videos,
        }
    }
}

/// Everything the user has entered on one form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormSnapshot {
    pub values: BTreeMap<Field, String>,
    /// Keyed by frontend field name; server errors may use names outside [`Field`]
    pub errors: BTreeMap<String, String>,
    pub touched: BTreeSet<Field>,
    pub focused_field: Option<Field>,
    /// Form-level banner
    pub api_error: Option<String>,
    pub media: MediaSelection,
    /// Backend id when editing an existing listing
    pub record_id: Option<String>,
}

impl FormSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trimmed value, `""` when unset
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(|v| v.trim()).unwrap_or_default()
    }

    pub fn is_empty(&self, field: Field) -> bool {
        self.value(field).is_empty()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self, field: Field) {
        self.values.remove(&field);
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(field.as_str()).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || self.api_error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_trimmed() {
        let mut snapshot = FormSnapshot::new();
        snapshot.set(Field::Title, "  Flat  ");
        assert_eq!(snapshot.value(Field::Title), "Flat");
        assert!(snapshot.is_empty(Field::Price));
    }

    #[test]
    fn test_remove_existing_queues_deletion_once() {
        let mut media = MediaSelection::default();
        media.add_existing(MediaKind::Image, "12", None);
        media.add(MediaFile::new("a.mp4", "video/mp4", vec![1]));

        assert!(media.remove_existing("12"));
        assert!(!media.remove_existing("12"));
        assert_eq!(media.removed, vec!["12".to_string()]);
        assert!(media.images.is_empty());
        assert_eq!(media.videos.len(), 1);
    }

    #[test]
    fn test_mime_guess() {
        assert_eq!(guess_mime("photo.JPG"), "image/jpeg");
        assert_eq!(guess_mime("clip.mov"), "video/quicktime");
        assert_eq!(guess_mime("noext"), "application/octet-stream");
    }
}
