use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One inbound file exactly as the caller sent it, before classification.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Bytes,
}

/// Supported resume formats, derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

impl DocumentKind {
    /// Classifies a file name by extension, case-insensitive.
    /// Returns `None` for anything that is not a screenable document
    /// (archives included: those are containers, not documents).
    pub fn from_name(name: &str) -> Option<DocumentKind> {
        match extension_of(name)?.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }
}

/// True if the name denotes a zip archive to be expanded rather than screened.
pub fn is_archive(name: &str) -> bool {
    extension_of(name).as_deref() == Some("zip")
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
}

/// A single screenable document produced by discovery.
///
/// `name` is the relative path within the upload set and is unique within a
/// batch. Owned by the orchestrator for the duration of one run.
#[derive(Debug, Clone)]
pub struct CandidateDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_pdf_and_txt_case_insensitive() {
        assert_eq!(DocumentKind::from_name("cv.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("CV.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::from_name("notes.Txt"),
            Some(DocumentKind::PlainText)
        );
    }

    #[test]
    fn test_unsupported_and_extensionless_names_are_unclassified() {
        assert_eq!(DocumentKind::from_name("photo.jpg"), None);
        assert_eq!(DocumentKind::from_name("archive.zip"), None);
        assert_eq!(DocumentKind::from_name("README"), None);
    }

    #[test]
    fn test_archive_detection() {
        assert!(is_archive("resumes.zip"));
        assert!(is_archive("RESUMES.ZIP"));
        assert!(!is_archive("resume.pdf"));
    }
}
