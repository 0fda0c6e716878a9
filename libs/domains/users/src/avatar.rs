//! Avatar storage behind a trait.
//!
//! Uploads are JPEG or PNG only. The local filesystem implementation is
//! the default deployment target; tests use the in-memory one.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::error::{UserError, UserResult};

/// File extension for an accepted avatar content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Stores avatar images and hands back their public URL
#[async_trait]
pub trait AvatarStorage: Send + Sync {
    /// Store the avatar for a user, replacing any previous one.
    ///
    /// Fails with `InvalidFileType` for anything but JPEG or PNG.
    async fn store(&self, user_id: Uuid, content_type: &str, bytes: &[u8]) -> UserResult<String>;
}

/// Filesystem-backed avatar storage
pub struct LocalAvatarStorage {
    dir: PathBuf,
    base_url: String,
}

impl LocalAvatarStorage {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AvatarStorage for LocalAvatarStorage {
    async fn store(&self, user_id: Uuid, content_type: &str, bytes: &[u8]) -> UserResult<String> {
        let ext = extension_for(content_type)
            .ok_or_else(|| UserError::InvalidFileType(content_type.to_string()))?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| UserError::AvatarStorage(e.to_string()))?;

        let filename = format!("{}.{}", user_id, ext);
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| UserError::AvatarStorage(e.to_string()))?;

        info!(user_id = %user_id, path = %path.display(), "Avatar stored");

        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            filename
        ))
    }
}

/// In-memory avatar storage for tests
#[derive(Clone, Default)]
pub struct InMemoryAvatarStorage {
    files: Arc<RwLock<HashMap<Uuid, Vec<u8>>>>,
}

impl InMemoryAvatarStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, user_id: Uuid) -> bool {
        self.files.read().await.contains_key(&user_id)
    }
}

#[async_trait]
impl AvatarStorage for InMemoryAvatarStorage {
    async fn store(&self, user_id: Uuid, content_type: &str, bytes: &[u8]) -> UserResult<String> {
        let ext = extension_for(content_type)
            .ok_or_else(|| UserError::InvalidFileType(content_type.to_string()))?;

        self.files.write().await.insert(user_id, bytes.to_vec());
        Ok(format!("memory://avatars/{}.{}", user_id, ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_accepted_types() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/gif"), None);
        assert_eq!(extension_for("application/pdf"), None);
    }

    #[tokio::test]
    async fn test_in_memory_storage_rejects_gif() {
        let storage = InMemoryAvatarStorage::new();

        let err = storage
            .store(Uuid::now_v7(), "image/gif", b"GIF89a")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::InvalidFileType(_)));
    }

    #[tokio::test]
    async fn test_in_memory_storage_stores_png() {
        let storage = InMemoryAvatarStorage::new();
        let user_id = Uuid::now_v7();

        let url = storage
            .store(user_id, "image/png", b"\x89PNG")
            .await
            .unwrap();
        assert!(url.ends_with(&format!("{}.png", user_id)));
        assert!(storage.contains(user_id).await);
    }

    #[tokio::test]
    async fn test_local_storage_writes_file() {
        let dir = std::env::temp_dir().join(format!("avatars-{}", Uuid::now_v7()));
        let storage = LocalAvatarStorage::new(&dir, "http://localhost:8080/static/avatars");
        let user_id = Uuid::now_v7();

        let url = storage
            .store(user_id, "image/jpeg", b"\xff\xd8\xff")
            .await
            .unwrap();

        assert_eq!(
            url,
            format!("http://localhost:8080/static/avatars/{}.jpg", user_id)
        );
        let on_disk = tokio::fs::read(dir.join(format!("{}.jpg", user_id)))
            .await
            .unwrap();
        assert_eq!(on_disk, b"\xff\xd8\xff");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
