//! Artifact delivery service
//!
//! Hands a finished report to the user's environment. The file-based
//! implementation saves into a directory the way a browser saves downloads:
//! the server's suggested name is used, reduced to a bare file name, and a
//! ` (n)` suffix is added when the name is taken.

use async_trait::async_trait;
use folio_core::domain::artifact::{Artifact, DEFAULT_ARTIFACT_NAME};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::DeliveryError;

/// Maximum number of ` (n)` suffixes tried before giving up
const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Where a delivered artifact ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Host-specific location (a file path for [`FileDelivery`])
    pub location: String,
    /// Name the artifact was saved under
    pub file_name: String,
    /// Payload size in bytes
    pub size: usize,
}

/// Service trait for exposing a finished artifact to the user
#[async_trait]
pub trait ArtifactDelivery: Send + Sync {
    /// Delivers the artifact once; never retries
    async fn deliver(&self, artifact: Artifact) -> Result<DeliveryReceipt, DeliveryError>;
}

/// What to do when the target file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Save as `name (1).ext`, `name (2).ext`, ...
    #[default]
    Rename,
    /// Replace the existing file
    Overwrite,
}

/// Saves artifacts into a directory
#[derive(Debug, Clone)]
pub struct FileDelivery {
    dir: PathBuf,
    collision: CollisionPolicy,
}

impl FileDelivery {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            collision: CollisionPolicy::default(),
        }
    }

    pub fn with_collision_policy(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn write_new(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        let (stem, extension) = split_name(file_name);

        for i in 0..=MAX_RENAME_ATTEMPTS {
            let candidate = match (i, extension) {
                (0, _) => file_name.to_string(),
                (_, Some(ext)) => format!("{} ({}).{}", stem, i, ext),
                (_, None) => format!("{} ({})", stem, i),
            };
            let path = self.dir.join(candidate);

            // create_new makes the existence check and the create one step
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    write_all(&mut file, &path, bytes).await?;
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next name", path.display());
                }
                Err(source) => return Err(DeliveryError::Io { path, source }),
            }
        }

        Err(DeliveryError::NoUniqueName {
            path: self.dir.join(file_name),
        })
    }
}

#[async_trait]
impl ArtifactDelivery for FileDelivery {
    async fn deliver(&self, artifact: Artifact) -> Result<DeliveryReceipt, DeliveryError> {
        let file_name = sanitize_file_name(&artifact.suggested_name);

        let path = match self.collision {
            CollisionPolicy::Rename => self.write_new(&file_name, &artifact.bytes).await?,
            CollisionPolicy::Overwrite => {
                let path = self.dir.join(&file_name);
                fs::write(&path, &artifact.bytes)
                    .await
                    .map_err(|source| DeliveryError::Io {
                        path: path.clone(),
                        source,
                    })?;
                path
            }
        };

        let saved_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or(file_name);

        info!("Saved {} byte(s) to {}", artifact.bytes.len(), path.display());

        Ok(DeliveryReceipt {
            location: path.display().to_string(),
            file_name: saved_name,
            size: artifact.bytes.len(),
        })
    }
}

async fn write_all(file: &mut fs::File, path: &Path, bytes: &[u8]) -> Result<(), DeliveryError> {
    let to_error = |source| DeliveryError::Io {
        path: path.to_path_buf(),
        source,
    };

    file.write_all(bytes).await.map_err(to_error)?;
    file.flush().await.map_err(to_error)
}

/// Reduces a server-suggested name to a bare file name
///
/// Directory components, control characters and dot-only names are dropped
/// so the result always stays inside the delivery directory.
pub fn sanitize_file_name(suggested: &str) -> String {
    let last = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        DEFAULT_ARTIFACT_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Splits `report.pdf` into `("report", Some("pdf"))`; dotfiles keep their name
fn split_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
            (&file_name[..idx], Some(&file_name[idx + 1..]))
        }
        _ => (file_name, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(name: &str, bytes: &[u8]) -> Artifact {
        Artifact::new(bytes.to_vec(), name)
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("X.pdf"), "X.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\reports\\visit.pdf"), "visit.pdf");
        assert_eq!(sanitize_file_name(".."), DEFAULT_ARTIFACT_NAME);
        assert_eq!(sanitize_file_name("reports/"), DEFAULT_ARTIFACT_NAME);
        assert_eq!(sanitize_file_name("bad\u{0}name.pdf"), "badname.pdf");
    }

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("report.pdf"), ("report", Some("pdf")));
        assert_eq!(split_name("archive.tar.gz"), ("archive.tar", Some("gz")));
        assert_eq!(split_name("README"), ("README", None));
        assert_eq!(split_name(".hidden"), (".hidden", None));
    }

    #[tokio::test]
    async fn test_deliver_writes_suggested_name() {
        let temp_dir = TempDir::new().unwrap();
        let delivery = FileDelivery::new(temp_dir.path());

        let receipt = delivery
            .deliver(artifact("X.pdf", b"%PDF-1.7"))
            .await
            .unwrap();

        assert_eq!(receipt.file_name, "X.pdf");
        assert_eq!(receipt.size, 8);
        let written = std::fs::read(temp_dir.path().join("X.pdf")).unwrap();
        assert_eq!(written, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_deliver_renames_on_collision() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("X.pdf"), b"old").unwrap();
        std::fs::write(temp_dir.path().join("X (1).pdf"), b"older").unwrap();
        let delivery = FileDelivery::new(temp_dir.path());

        let receipt = delivery.deliver(artifact("X.pdf", b"new")).await.unwrap();

        assert_eq!(receipt.file_name, "X (2).pdf");
        assert_eq!(std::fs::read(temp_dir.path().join("X.pdf")).unwrap(), b"old");
        assert_eq!(
            std::fs::read(temp_dir.path().join("X (2).pdf")).unwrap(),
            b"new"
        );
    }

    #[tokio::test]
    async fn test_deliver_overwrites_when_asked() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("X.pdf"), b"old").unwrap();
        let delivery =
            FileDelivery::new(temp_dir.path()).with_collision_policy(CollisionPolicy::Overwrite);

        let receipt = delivery.deliver(artifact("X.pdf", b"new")).await.unwrap();

        assert_eq!(receipt.file_name, "X.pdf");
        assert_eq!(std::fs::read(temp_dir.path().join("X.pdf")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_deliver_stays_inside_directory() {
        let temp_dir = TempDir::new().unwrap();
        let delivery = FileDelivery::new(temp_dir.path());

        let receipt = delivery
            .deliver(artifact("../escape.pdf", b"x"))
            .await
            .unwrap();

        assert_eq!(receipt.file_name, "escape.pdf");
        assert!(temp_dir.path().join("escape.pdf").exists());
    }

    #[tokio::test]
    async fn test_deliver_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let delivery = FileDelivery::new(temp_dir.path().join("missing"));

        let err = delivery
            .deliver(artifact("X.pdf", b"x"))
            .await
            .unwrap_err();

        assert!(matches!(err, DeliveryError::Io { .. }));
    }
}
