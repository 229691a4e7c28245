use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn save(&self, rel_path: &str, body: Bytes) -> anyhow::Result<()>;
    async fn delete(&self, rel_path: &str) -> anyhow::Result<()>;
}

/// Local-disk storage rooted at the uploads directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every stored path must stay inside the uploads root.
    fn resolve(&self, rel_path: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(rel_path);
        let escapes = rel.is_absolute()
            || rel
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));
        if rel_path.is_empty() || escapes {
            anyhow::bail!("invalid storage path: {rel_path}");
        }
        Ok(self.root.join(rel))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn save(&self, rel_path: &str, body: Bytes) -> anyhow::Result<()> {
        let path = self.resolve(rel_path)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create upload dir")?;
        }
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    async fn delete(&self, rel_path: &str) -> anyhow::Result<()> {
        let path = self.resolve(rel_path)?;
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("delete {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .save("profiles/abc/photo.jpg", Bytes::from_static(b"jpeg bytes"))
            .await
            .expect("save should succeed");
        let on_disk = dir.path().join("profiles/abc/photo.jpg");
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"jpeg bytes");

        storage
            .delete("profiles/abc/photo.jpg")
            .await
            .expect("delete should succeed");
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn delete_of_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage.delete("nope/gone.png").await.is_err());
    }

    #[tokio::test]
    async fn rejects_paths_escaping_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        assert!(storage
            .save("../outside.jpg", Bytes::from_static(b"x"))
            .await
            .is_err());
        assert!(storage
            .save("/etc/passwd", Bytes::from_static(b"x"))
            .await
            .is_err());
        assert!(storage.delete("a/../../b").await.is_err());
    }
}
