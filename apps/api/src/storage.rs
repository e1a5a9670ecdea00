//! Local file store for uploaded résumés and rendered previews.
//!
//! Every file gets a request-unique name, so concurrent requests never write
//! to the same path. Files are served back under `/static/<name>`.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub const STATIC_ROUTE: &str = "/static";
const FALLBACK_UPLOAD_NAME: &str = "upload.pdf";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file name under the store root plus its absolute location.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    public_base_url: String,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })
    }

    /// Writes an uploaded file under a unique, sanitized name.
    pub async fn save_upload(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let file_name = format!("{}-{}", Uuid::new_v4().simple(), sanitize_filename(original_name));
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;
        debug!("Stored upload {} ({} bytes)", path.display(), bytes.len());
        Ok(StoredFile { file_name, path })
    }

    /// Reserves a request-scoped output path for a rendered preview.
    pub fn preview_file(&self) -> StoredFile {
        let file_name = format!("preview-{}.pdf", Uuid::new_v4().simple());
        let path = self.root.join(&file_name);
        StoredFile { file_name, path }
    }

    /// Public URL under which `file_name` is served.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}{}/{}", self.public_base_url, STATIC_ROUTE, file_name)
    }
}

/// Reduces a client-supplied file name to a safe basename.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_UPLOAD_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\jane\\cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("Jane Doe résumé.pdf"), "Jane_Doe_r_sum_.pdf");
    }

    #[test]
    fn test_sanitize_falls_back_when_empty() {
        assert_eq!(sanitize_filename(""), FALLBACK_UPLOAD_NAME);
        assert_eq!(sanitize_filename("dir/"), FALLBACK_UPLOAD_NAME);
        assert_eq!(sanitize_filename(".."), FALLBACK_UPLOAD_NAME);
    }

    #[test]
    fn test_public_url() {
        let store = FileStore::new("uploads", "http://127.0.0.1:8000");
        assert_eq!(
            store.public_url("preview-abc.pdf"),
            "http://127.0.0.1:8000/static/preview-abc.pdf"
        );
    }

    #[test]
    fn test_preview_files_are_unique() {
        let store = FileStore::new("uploads", "http://localhost");
        let a = store.preview_file();
        let b = store.preview_file();
        assert_ne!(a.file_name, b.file_name);
        assert!(a.file_name.starts_with("preview-") && a.file_name.ends_with(".pdf"));
        assert_eq!(a.path, Path::new("uploads").join(&a.file_name));
    }

    #[tokio::test]
    async fn test_same_upload_name_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"), "http://localhost");
        store.ensure_root().await.unwrap();

        let first = store.save_upload("cv.pdf", b"one").await.unwrap();
        let second = store.save_upload("cv.pdf", b"two").await.unwrap();

        assert_ne!(first.path, second.path);
        assert!(first.file_name.ends_with("-cv.pdf"));
        assert_eq!(tokio::fs::read(&first.path).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&second.path).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_write_into_missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent"), "http://localhost");
        let err = store.save_upload("cv.pdf", b"x").await.unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }
}
