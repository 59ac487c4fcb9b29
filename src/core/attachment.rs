//! Provider file references carried by messages.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    // Documents
    "pdf", "txt", "md",
    // Code
    "py", "js", "html", "css", "json", "xml", "yaml", "sql", "java", "cpp", "c", "h", "go", "rs",
    "php", "rb", "kt", "swift",
    // Images
    "png", "jpg", "jpeg", "gif", "webp",
    // Data
    "csv", "xlsx", "docx",
];

/// How a provider treats an uploaded file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// PDF or plain text readable as a document.
    Document,
    /// Any image type.
    Image,
    /// Everything else, handed to the code execution container.
    ContainerUpload,
}

impl AttachmentKind {
    /// Pick the attachment kind for a MIME type.
    #[must_use]
    pub fn for_mime(mime: &str) -> Self {
        match mime {
            "application/pdf" | "text/plain" => Self::Document,
            m if m.starts_with("image/") => Self::Image,
            _ => Self::ContainerUpload,
        }
    }
}

/// Reference to a file uploaded to a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attachment {
    /// How the file is presented to the model.
    pub kind: AttachmentKind,

    /// Provider-assigned file ID.
    pub file_id: String,

    /// Original filename, for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Attachment {
    /// Reference an uploaded file by MIME type.
    pub fn from_upload(file_id: impl Into<String>, filename: impl Into<String>, mime: &str) -> Self {
        Self {
            kind: AttachmentKind::for_mime(mime),
            file_id: file_id.into(),
            filename: Some(filename.into()),
        }
    }
}

/// Check whether a file's extension is accepted for upload.
#[must_use]
pub fn is_supported_upload(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_for_documents() {
        assert_eq!(AttachmentKind::for_mime("application/pdf"), AttachmentKind::Document);
        assert_eq!(AttachmentKind::for_mime("text/plain"), AttachmentKind::Document);
    }

    #[test]
    fn kind_for_images() {
        assert_eq!(AttachmentKind::for_mime("image/png"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::for_mime("image/webp"), AttachmentKind::Image);
    }

    #[test]
    fn kind_for_other_types() {
        assert_eq!(
            AttachmentKind::for_mime("text/csv"),
            AttachmentKind::ContainerUpload
        );
        assert_eq!(
            AttachmentKind::for_mime("application/json"),
            AttachmentKind::ContainerUpload
        );
    }

    #[test]
    fn supported_upload_extensions() {
        assert!(is_supported_upload("notes.txt"));
        assert!(is_supported_upload("main.py"));
        assert!(is_supported_upload("photo.JPG"));
        assert!(!is_supported_upload("archive.zip"));
        assert!(!is_supported_upload("Makefile"));
    }

    #[test]
    fn from_upload_keeps_filename() {
        let a = Attachment::from_upload("file_123", "report.pdf", "application/pdf");
        assert_eq!(a.kind, AttachmentKind::Document);
        assert_eq!(a.file_id, "file_123");
        assert_eq!(a.filename.as_deref(), Some("report.pdf"));
    }
}
