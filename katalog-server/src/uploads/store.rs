//! Image file storage and reclamation
//!
//! Accepted uploads are written as `<unix-millis><ext>` under the upload
//! directory and recorded as `/uploads/<name>`. Reclamation is best-effort:
//! it runs on a spawned task, logs failures and never retries.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use super::config::UploadConfig;
use super::filter;
use crate::models::ImageList;

/// Public path prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/uploads";

/// An upload that passed validation and is waiting to be written
#[derive(Debug, Clone)]
pub struct PendingImage {
    /// Client-supplied file name (only its extension is kept)
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl PendingImage {
    /// Extension including the dot, reduced to ASCII alphanumerics so the
    /// stored name always resolves back inside the upload directory
    fn suffix(&self) -> String {
        let ext: String = filter::extension(&self.file_name)
            .unwrap_or_default()
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        if ext.is_empty() {
            String::new()
        } else {
            format!(".{}", ext)
        }
    }
}

/// Outcome of a reclamation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReclaimReport {
    pub removed: Vec<String>,
    pub failed: Vec<String>,
    /// Paths that do not name a file inside the upload directory
    pub skipped: Vec<String>,
}

/// Writes and removes product images on local disk
#[derive(Debug, Clone)]
pub struct ImageStore {
    config: UploadConfig,
}

impl ImageStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Write accepted images to disk, returning their public paths in order.
    ///
    /// If any write fails, files already written for this call are reclaimed
    /// before the error is returned.
    pub async fn persist(&self, images: Vec<PendingImage>) -> io::Result<ImageList> {
        if images.is_empty() {
            return Ok(ImageList::default());
        }
        tokio::fs::create_dir_all(&self.config.dir).await?;

        let mut written = Vec::with_capacity(images.len());
        for image in images {
            match self.write_new(&image.suffix(), &image.data).await {
                Ok(file_name) => {
                    tracing::debug!(
                        file = %file_name,
                        original = %image.file_name,
                        bytes = image.data.len(),
                        "Stored image"
                    );
                    written.push(format!("{}/{}", PUBLIC_PREFIX, file_name));
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to store image, reclaiming batch");
                    drop(self.reclaim(ImageList::new(written)));
                    return Err(err);
                }
            }
        }

        Ok(ImageList::new(written))
    }

    /// Create a fresh timestamp-named file. A name already taken moves on to
    /// the next millisecond.
    async fn write_new(&self, suffix: &str, data: &[u8]) -> io::Result<String> {
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let file_name = format!("{}{}", stamp, suffix);
            let path = self.config.dir.join(&file_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    stamp += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if let Err(err) = write_all(&mut file, data).await {
                let _ = tokio::fs::remove_file(&path).await;
                return Err(err);
            }
            return Ok(file_name);
        }
    }

    /// Map a recorded public path to its file inside the upload directory.
    ///
    /// Returns `None` for anything that is not `/uploads/<plain-name>`.
    pub fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let name = public_path
            .strip_prefix(PUBLIC_PREFIX)?
            .strip_prefix('/')?;
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c: char| c == '/' || c == '\\');
        plain.then(|| self.config.dir.join(name))
    }

    /// Delete the files behind `images` on a background task.
    ///
    /// Callers may drop the handle; awaiting it yields what was removed.
    pub fn reclaim(&self, images: ImageList) -> JoinHandle<ReclaimReport> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut report = ReclaimReport::default();
            for public_path in images {
                let Some(path) = store.resolve(&public_path) else {
                    tracing::warn!(path = %public_path, "Skipping image outside upload directory");
                    report.skipped.push(public_path);
                    continue;
                };

                match tokio::fs::remove_file(&path).await {
                    Ok(()) => {
                        tracing::debug!(path = %path.display(), "Removed image");
                        report.removed.push(public_path);
                    }
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "Failed to remove image");
                        report.failed.push(public_path);
                    }
                }
            }
            report
        })
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(UploadConfig::with_dir(dir.path()));
        (dir, store)
    }

    fn png(name: &str) -> PendingImage {
        PendingImage {
            file_name: name.into(),
            content_type: "image/png".into(),
            data: b"\x89PNG\r\n\x1a\n".to_vec(),
        }
    }

    #[tokio::test]
    async fn persist_writes_timestamped_files() {
        let (_dir, store) = store();
        let images = store.persist(vec![png("a.png"), png("b.PNG")]).await.unwrap();

        assert_eq!(images.len(), 2);
        assert_ne!(images.paths()[0], images.paths()[1]);
        assert!(images.paths()[0].ends_with(".png"));
        assert!(images.paths()[1].ends_with(".PNG"));

        for path in images.paths() {
            let name = path.strip_prefix("/uploads/").unwrap();
            let stem = name.split('.').next().unwrap();
            assert!(stem.parse::<i64>().is_ok(), "unexpected name {}", name);

            let file = store.resolve(path).unwrap();
            assert_eq!(std::fs::read(file).unwrap(), b"\x89PNG\r\n\x1a\n");
        }
    }

    #[tokio::test]
    async fn separators_in_the_extension_are_dropped() {
        let (_dir, store) = store();
        let images = store.persist(vec![png("a.p\\png")]).await.unwrap();

        let path = &images.paths()[0];
        assert!(path.ends_with(".ppng"), "unexpected path {}", path);
        assert!(store.resolve(path).is_some());

        let report = store.reclaim(images.clone()).await.unwrap();
        assert_eq!(report.removed, images.paths());
    }

    #[tokio::test]
    async fn persist_nothing_is_empty() {
        let (_dir, store) = store();
        assert!(store.persist(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn persist_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(UploadConfig::with_dir(dir.path().join("nested/uploads")));

        let images = store.persist(vec![png("a.png")]).await.unwrap();
        assert!(store.resolve(&images.paths()[0]).unwrap().exists());
    }

    #[tokio::test]
    async fn reclaim_removes_files() {
        let (_dir, store) = store();
        let images = store.persist(vec![png("a.png"), png("b.png")]).await.unwrap();
        let files: Vec<_> = images.paths().iter().filter_map(|p| store.resolve(p)).collect();

        let report = store.reclaim(images.clone()).await.unwrap();

        assert_eq!(report.removed, images.paths());
        assert!(report.failed.is_empty());
        assert!(files.iter().all(|f| !f.exists()));
    }

    #[tokio::test]
    async fn reclaim_reports_missing_files() {
        let (_dir, store) = store();
        let report = store
            .reclaim(ImageList::new(vec!["/uploads/404.png".into()]))
            .await
            .unwrap();

        assert_eq!(report.failed, ["/uploads/404.png"]);
        assert!(report.removed.is_empty());
    }

    #[tokio::test]
    async fn reclaim_never_leaves_upload_directory() {
        let (_dir, store) = store();
        let report = store
            .reclaim(ImageList::new(vec![
                "/uploads/../keep.png".into(),
                "/etc/passwd".into(),
                "/uploads/".into(),
            ]))
            .await
            .unwrap();

        assert_eq!(report.skipped.len(), 3);
        assert!(report.removed.is_empty());
    }

    #[test]
    fn resolve_maps_public_paths() {
        let store = ImageStore::new(UploadConfig::with_dir("/srv/uploads"));
        assert_eq!(
            store.resolve("/uploads/1718000000000.png"),
            Some(PathBuf::from("/srv/uploads/1718000000000.png"))
        );
        assert_eq!(store.resolve("/uploads/a/b.png"), None);
        assert_eq!(store.resolve("/uploadsx/b.png"), None);
        assert_eq!(store.resolve("uploads/b.png"), None);
    }
}
