//! Document Discoverer — resolves a heterogeneous upload set (files and zip
//! archives, possibly nested) into a flat, ordered list of candidate
//! documents.
//!
//! Archives are expanded into a `tempfile` scratch directory and walked with
//! `walkdir`; the scratch area is dropped (deleted) on every exit path.
//! Candidates are read into memory before the scratch dir is released, so
//! nothing downstream touches the filesystem.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::screening::document::{is_archive, CandidateDocument, DocumentKind, Upload};
use crate::screening::report::{ScreeningFailure, Stage};

/// Batch-fatal discovery failures. Any of these rejects the whole batch
/// before a single inference call is made.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no supported documents found in the upload")]
    Empty,

    #[error("batch of {count} documents exceeds the limit of {limit}")]
    CeilingExceeded { count: usize, limit: usize },

    #[error("malformed archive '{name}': {reason}")]
    Archive { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of discovery: the accepted candidates in discovery order, plus
/// failure records for top-level uploads of unsupported type. The rejected
/// uploads do not abort the batch — they are reported back by name.
#[derive(Debug)]
pub struct Discovery {
    pub documents: Vec<CandidateDocument>,
    pub rejected: Vec<ScreeningFailure>,
}

/// Expands an upload set into candidate documents.
///
/// Classification is by extension, case-insensitive: `.pdf` and `.txt`
/// become candidates, `.zip` is expanded (recursively — nested archives are
/// expanded too), anything else at the top level is recorded as a rejected
/// upload. Entries of unsupported type *inside* an archive are silently
/// skipped. Enforces `max_documents` during expansion so an oversized batch
/// fails before any extraction work.
pub fn discover(uploads: &[Upload], max_documents: usize) -> Result<Discovery, DiscoveryError> {
    let mut documents = Vec::new();
    let mut rejected = Vec::new();
    let mut seen_names = HashSet::new();

    for upload in uploads {
        if let Some(kind) = DocumentKind::from_name(&upload.name) {
            push_candidate(
                &mut documents,
                &mut seen_names,
                upload.name.clone(),
                kind,
                upload.bytes.clone(),
                max_documents,
            )?;
        } else if is_archive(&upload.name) {
            expand_archive(
                upload,
                &mut documents,
                &mut seen_names,
                max_documents,
            )?;
        } else {
            debug!("rejecting upload '{}': unsupported type", upload.name);
            rejected.push(ScreeningFailure {
                file_name: upload.name.clone(),
                stage: Stage::Extraction,
                message: "unsupported type".to_string(),
            });
        }
    }

    if documents.is_empty() {
        return Err(DiscoveryError::Empty);
    }

    Ok(Discovery {
        documents,
        rejected,
    })
}

fn push_candidate(
    documents: &mut Vec<CandidateDocument>,
    seen_names: &mut HashSet<String>,
    name: String,
    kind: DocumentKind,
    bytes: Bytes,
    max_documents: usize,
) -> Result<(), DiscoveryError> {
    if documents.len() >= max_documents {
        return Err(DiscoveryError::CeilingExceeded {
            count: documents.len() + 1,
            limit: max_documents,
        });
    }
    let name = unique_name(seen_names, name);
    documents.push(CandidateDocument { name, kind, bytes });
    Ok(())
}

/// Expands one uploaded archive, including any archives nested inside it.
///
/// All extraction happens under a single scratch `TempDir`; nested archives
/// are queued and extracted into sibling roots so each root is walked
/// exactly once. The walk is sorted for a deterministic discovery order.
fn expand_archive(
    upload: &Upload,
    documents: &mut Vec<CandidateDocument>,
    seen_names: &mut HashSet<String>,
    max_documents: usize,
) -> Result<(), DiscoveryError> {
    let scratch = tempfile::tempdir()?;

    let first_root = scratch.path().join("archive");
    extract_zip(&upload.name, &upload.bytes, &first_root)?;

    let mut roots = vec![first_root];
    let mut nested_count = 0usize;

    while let Some(root) = roots.pop() {
        for entry in WalkDir::new(&root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let entry_name = path
                .strip_prefix(&root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();

            if let Some(kind) = DocumentKind::from_name(&entry_name) {
                let data = Bytes::from(std::fs::read(path)?);
                push_candidate(
                    documents,
                    seen_names,
                    format!("{}/{}", upload.name, entry_name),
                    kind,
                    data,
                    max_documents,
                )?;
            } else if is_archive(&entry_name) {
                nested_count += 1;
                let nested_root = scratch.path().join(format!("nested-{nested_count}"));
                let data = std::fs::read(path)?;
                extract_zip(&entry_name, &data, &nested_root)?;
                roots.push(nested_root);
            }
            // Everything else (images, metadata, ...) is silently skipped.
        }
    }

    Ok(())
}

fn extract_zip(name: &str, data: &[u8], dest: &Path) -> Result<(), DiscoveryError> {
    let mut archive =
        ZipArchive::new(Cursor::new(data)).map_err(|e| DiscoveryError::Archive {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
    archive.extract(dest).map_err(|e| DiscoveryError::Archive {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Candidate names must be unique within a batch; colliding names get a
/// numeric suffix before the extension: `cv.pdf`, `cv (2).pdf`, ...
fn unique_name(seen: &mut HashSet<String>, candidate: String) -> String {
    if seen.insert(candidate.clone()) {
        return candidate;
    }
    let (stem, ext) = match candidate.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), Some(ext.to_string())),
        None => (candidate.clone(), None),
    };
    for n in 2.. {
        let alternative = match &ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        if seen.insert(alternative.clone()) {
            return alternative;
        }
    }
    unreachable!("suffix counter exhausted");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::CompressionMethod;

    fn upload(name: &str, data: &[u8]) -> Upload {
        Upload {
            name: name.to_string(),
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Builds an in-memory zip from (name, contents) pairs.
    fn make_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (name, data) in entries {
            writer.start_file(name.to_string(), options).unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_plain_uploads_become_candidates_in_order() {
        let uploads = vec![upload("a.pdf", b"%PDF"), upload("b.txt", b"hello")];
        let discovery = discover(&uploads, 200).unwrap();
        assert_eq!(discovery.documents.len(), 2);
        assert_eq!(discovery.documents[0].name, "a.pdf");
        assert_eq!(discovery.documents[0].kind, DocumentKind::Pdf);
        assert_eq!(discovery.documents[1].name, "b.txt");
        assert_eq!(discovery.documents[1].kind, DocumentKind::PlainText);
        assert!(discovery.rejected.is_empty());
    }

    #[test]
    fn test_zip_expansion_skips_unsupported_and_recurses_into_nested_zip() {
        let inner = make_zip(&[("d.pdf", b"%PDF-d")]);
        let outer = make_zip(&[
            ("a.pdf", b"%PDF-a"),
            ("b.txt", b"resume b"),
            ("c.jpg", b"\xff\xd8"),
            ("more.zip", &inner),
        ]);
        let discovery = discover(&[upload("batch.zip", &outer)], 200).unwrap();

        let mut names: Vec<&str> = discovery
            .documents
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec!["batch.zip/a.pdf", "batch.zip/b.txt", "batch.zip/d.pdf"]
        );
        assert!(discovery.rejected.is_empty());
    }

    #[test]
    fn test_zip_entry_contents_survive_expansion() {
        let archive = make_zip(&[("cv.txt", b"ten years of rust")]);
        let discovery = discover(&[upload("one.zip", &archive)], 200).unwrap();
        assert_eq!(discovery.documents.len(), 1);
        assert_eq!(&discovery.documents[0].bytes[..], b"ten years of rust");
    }

    #[test]
    fn test_unsupported_top_level_upload_is_rejected_not_fatal() {
        let uploads = vec![upload("photo.jpg", b"\xff\xd8"), upload("cv.txt", b"text")];
        let discovery = discover(&uploads, 200).unwrap();
        assert_eq!(discovery.documents.len(), 1);
        assert_eq!(discovery.rejected.len(), 1);
        assert_eq!(discovery.rejected[0].file_name, "photo.jpg");
        assert_eq!(discovery.rejected[0].stage, Stage::Extraction);
        assert_eq!(discovery.rejected[0].message, "unsupported type");
    }

    #[test]
    fn test_zero_documents_is_a_distinct_error() {
        let err = discover(&[upload("photo.jpg", b"\xff\xd8")], 200).unwrap_err();
        assert!(matches!(err, DiscoveryError::Empty));
    }

    #[test]
    fn test_ceiling_exceeded_fails_the_whole_batch() {
        let uploads: Vec<Upload> = (0..201)
            .map(|i| upload(&format!("cv-{i}.txt"), b"text"))
            .collect();
        let err = discover(&uploads, 200).unwrap_err();
        assert!(matches!(
            err,
            DiscoveryError::CeilingExceeded { limit: 200, .. }
        ));
    }

    #[test]
    fn test_ceiling_applies_to_archive_entries() {
        let entries: Vec<(String, &[u8])> = (0..4)
            .map(|i| (format!("cv-{i}.txt"), b"text".as_slice()))
            .collect();
        let borrowed: Vec<(&str, &[u8])> =
            entries.iter().map(|(n, d)| (n.as_str(), *d)).collect();
        let archive = make_zip(&borrowed);
        let err = discover(&[upload("batch.zip", &archive)], 3).unwrap_err();
        assert!(matches!(err, DiscoveryError::CeilingExceeded { .. }));
    }

    #[test]
    fn test_malformed_archive_is_fatal() {
        let err = discover(&[upload("broken.zip", b"not a zip at all")], 200).unwrap_err();
        assert!(matches!(err, DiscoveryError::Archive { .. }));
    }

    #[test]
    fn test_duplicate_names_are_uniquified() {
        let uploads = vec![upload("cv.txt", b"first"), upload("cv.txt", b"second")];
        let discovery = discover(&uploads, 200).unwrap();
        assert_eq!(discovery.documents[0].name, "cv.txt");
        assert_eq!(discovery.documents[1].name, "cv (2).txt");
    }

    #[test]
    fn test_unique_name_without_extension() {
        let mut seen = HashSet::new();
        assert_eq!(unique_name(&mut seen, "notes".into()), "notes");
        assert_eq!(unique_name(&mut seen, "notes".into()), "notes (2)");
        assert_eq!(unique_name(&mut seen, "notes".into()), "notes (3)");
    }
}
