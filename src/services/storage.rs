//! Public file storage for follow-up images

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::follow_up::{client_file_name, stored_path, UploadedImage},
};

/// Byte storage addressed by paths relative to the public storage root
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, path: &str, bytes: &[u8]) -> std::io::Result<()>;

    async fn remove(&self, path: &str) -> std::io::Result<()>;
}

/// Files on local disk, served by the HTTP layer under the public prefix
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn put(&self, path: &str, bytes: &[u8]) -> std::io::Result<()> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await
    }

    async fn remove(&self, path: &str) -> std::io::Result<()> {
        tokio::fs::remove_file(self.root.join(path)).await
    }
}

/// Write every image under the school's folder and return the stored paths.
///
/// Repeated file names within one upload get a copy number so that no image
/// overwrites another. If one write fails, the images already written are removed before the
/// error is returned.
pub async fn store_images(
    store: &dyn FileStore,
    school_id: i32,
    uploaded_at: DateTime<Utc>,
    images: &[UploadedImage],
) -> AppResult<Vec<String>> {
    let mut stored = Vec::with_capacity(images.len());
    for image in images {
        let mut path = stored_path(school_id, uploaded_at, &image.file_name);
        let mut copy = 1;
        while stored.contains(&path) {
            let renamed = format!("{}_{}", copy, client_file_name(&image.file_name));
            path = stored_path(school_id, uploaded_at, &renamed);
            copy += 1;
        }
        if let Err(e) = store.put(&path, &image.bytes).await {
            discard(store, &stored).await;
            return Err(e.into());
        }
        stored.push(path);
    }
    Ok(stored)
}

/// Best-effort removal of stored files; failures are only logged
pub async fn discard(store: &dyn FileStore, paths: &[String]) {
    for path in paths {
        if let Err(e) = store.remove(path).await {
            tracing::warn!(path = %path, "Failed to remove stored file: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockall::predicate::eq;
    use tokio_test::{assert_err, assert_ok};

    fn image(name: &str) -> UploadedImage {
        UploadedImage {
            file_name: name.to_string(),
            content_type: Some("image/jpeg".to_string()),
            bytes: vec![1, 2, 3],
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_store_images_returns_paths() {
        let mut store = MockFileStore::new();
        store.expect_put().times(2).returning(|_, _| Ok(()));
        store.expect_remove().never();

        let paths = assert_ok!(store_images(&store, 7, at(), &[image("a.jpg"), image("b.jpg")]).await);

        let ts = at().timestamp();
        assert_eq!(
            paths,
            vec![
                format!("followUpEq/school_7/{}_a.jpg", ts),
                format!("followUpEq/school_7/{}_b.jpg", ts),
            ]
        );
    }

    #[tokio::test]
    async fn test_failed_write_removes_earlier_files() {
        let first = format!("followUpEq/school_7/{}_a.jpg", at().timestamp());
        let second = format!("followUpEq/school_7/{}_b.jpg", at().timestamp());

        let mut store = MockFileStore::new();
        store
            .expect_put()
            .with(eq(first.clone()), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_put()
            .with(eq(second), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
        store
            .expect_remove()
            .with(eq(first))
            .times(1)
            .returning(|_| Ok(()));

        assert_err!(store_images(&store, 7, at(), &[image("a.jpg"), image("b.jpg")]).await);
    }

    #[tokio::test]
    async fn test_same_file_name_twice_gets_distinct_paths() {
        let ts = at().timestamp();
        let mut store = MockFileStore::new();
        store
            .expect_put()
            .with(eq(format!("followUpEq/school_7/{}_a.jpg", ts)), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));
        store
            .expect_put()
            .with(eq(format!("followUpEq/school_7/{}_1_a.jpg", ts)), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Ok(()));

        let paths = assert_ok!(store_images(&store, 7, at(), &[image("a.jpg"), image("a.jpg")]).await);
        assert_eq!(paths.len(), 2);
        assert_ne!(paths[0], paths[1]);
    }

    #[tokio::test]
    async fn test_discard_keeps_going_after_errors() {
        let mut store = MockFileStore::new();
        store
            .expect_remove()
            .times(2)
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")));

        discard(&store, &["x".to_string(), "y".to_string()]).await;
    }

    #[tokio::test]
    async fn test_local_store_writes_under_root() {
        let root = std::env::temp_dir().join(format!("tvpss-store-{}", std::process::id()));
        let store = LocalFileStore::new(&root);

        assert_ok!(store.put("followUpEq/school_1/1_a.png", b"png").await);
        let written = tokio::fs::read(root.join("followUpEq/school_1/1_a.png")).await.unwrap();
        assert_eq!(written, b"png");

        assert_ok!(store.remove("followUpEq/school_1/1_a.png").await);
        assert!(!root.join("followUpEq/school_1/1_a.png").exists());

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
