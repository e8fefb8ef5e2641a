//! Post storage module
//!
//! Single source of truth for durable post/comment state, backed by one
//! pretty-printed JSON array on disk. Every operation reads the whole
//! file, mutates the collection in memory and writes the whole file
//! back. There is deliberately no lock around the read-modify-write
//! sequence: concurrent writers race and the last write wins.

mod error;
mod types;

pub use error::StoreError;
pub use types::{Comment, Post};

use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use types::{new_id, normalize_post, now_timestamp};

/// File-backed post collection.
pub struct PostStore {
    data_file: PathBuf,
}

impl PostStore {
    /// Create a store over the given backing file. The path comes from
    /// resolved configuration; nothing here consults the environment.
    pub const fn new(data_file: PathBuf) -> Self {
        Self { data_file }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    /// Initialize the backing file with an empty collection if absent,
    /// creating parent directories as needed. Idempotent.
    pub async fn ensure_store_exists(&self) -> Result<(), StoreError> {
        if fs::try_exists(&self.data_file).await? {
            return Ok(());
        }
        if let Some(parent) = self.data_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        fs::write(&self.data_file, "[]").await?;
        Ok(())
    }

    /// Read and normalize the full collection, newest post first.
    ///
    /// A file that fails to parse is overwritten with `[]` before the
    /// error is returned, so the next read succeeds. The unreadable
    /// data is lost; callers see `StoreError::Corrupt` exactly once.
    pub async fn read_all(&self) -> Result<Vec<Post>, StoreError> {
        self.ensure_store_exists().await?;
        let raw = fs::read_to_string(&self.data_file).await?;
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => Ok(items.iter().map(normalize_post).collect()),
            Err(e) => {
                fs::write(&self.data_file, "[]").await?;
                Err(StoreError::Corrupt(e.to_string()))
            }
        }
    }

    /// Prepend a new post and persist the updated collection.
    /// Returns the whole collection with the new post first.
    pub async fn append_post(&self, title: &str, body: &str) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.read_all().await?;
        let post = Post {
            id: new_id(),
            title: title.to_string(),
            body: body.to_string(),
            created_at: now_timestamp(),
            comments: Vec::new(),
        };
        posts.insert(0, post);
        self.write_all(&posts).await?;
        Ok(posts)
    }

    /// Prepend a comment to the post with the given id and persist.
    /// Returns only the created comment. Nothing is written when the
    /// post id is unknown.
    pub async fn append_comment(
        &self,
        post_id: &str,
        content: &str,
    ) -> Result<Comment, StoreError> {
        let mut posts = self.read_all().await?;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or(StoreError::NotFound)?;

        let comment = Comment {
            id: new_id(),
            content: content.to_string(),
            created_at: now_timestamp(),
        };
        post.comments.insert(0, comment.clone());
        self.write_all(&posts).await?;
        Ok(comment)
    }

    async fn write_all(&self, posts: &[Post]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(posts)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(&self.data_file, json).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> PostStore {
        PostStore::new(dir.path().join("posts.json"))
    }

    #[tokio::test]
    async fn test_ensure_store_exists_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = PostStore::new(dir.path().join("nested/dir/posts.json"));

        store.ensure_store_exists().await.unwrap();
        let posts = store.append_post("Hi", "World").await.unwrap();
        assert_eq!(posts.len(), 1);

        // A second call must not clobber existing data.
        store.ensure_store_exists().await.unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_append_post_prepends_fresh_post() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let before = Utc::now();

        let posts = store.append_post("Hi", "World").await.unwrap();
        assert_eq!(posts.len(), 1);
        let post = &posts[0];
        assert!(!post.id.is_empty());
        assert_eq!(post.title, "Hi");
        assert_eq!(post.body, "World");
        assert!(post.comments.is_empty());

        let created = DateTime::parse_from_rfc3339(&post.created_at)
            .unwrap()
            .with_timezone(&Utc);
        // Millisecond truncation allows a hair of slack.
        assert!(created >= before - Duration::seconds(1));
        assert!(created <= Utc::now() + Duration::seconds(1));

        let posts = store.append_post("Second", "Entry").await.unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Second");
        assert_eq!(posts[1].title, "Hi");
        assert_ne!(posts[0].id, posts[1].id);
    }

    #[tokio::test]
    async fn test_read_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.append_post("Hi", "World").await.unwrap();

        let first = store.read_all().await.unwrap();
        let second = store.read_all().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_append_post_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);

        let written = store.append_post("Hi", "World").await.unwrap();
        let read_back = store.read_all().await.unwrap();
        assert_eq!(written, read_back);
    }

    #[tokio::test]
    async fn test_append_comment_unknown_id_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.append_post("Hi", "World").await.unwrap();
        let before = std::fs::read_to_string(store.data_file()).unwrap();

        let err = store.append_comment("no-such-id", "nice").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));

        let after = std::fs::read_to_string(store.data_file()).unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_append_comment_prepends_to_target_post() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        let posts = store.append_post("Hi", "World").await.unwrap();
        let post_id = posts[0].id.clone();

        let first = store.append_comment(&post_id, "first").await.unwrap();
        let second = store.append_comment(&post_id, "second").await.unwrap();
        assert_ne!(first.id, second.id);

        let posts = store.read_all().await.unwrap();
        assert_eq!(posts[0].comments.len(), 2);
        assert_eq!(posts[0].comments[0], second);
        assert_eq!(posts[0].comments[1], first);
    }

    #[tokio::test]
    async fn test_corrupt_file_resets_then_errors() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.ensure_store_exists().await.unwrap();
        std::fs::write(store.data_file(), "{ this is not json").unwrap();

        let err = store.read_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert_eq!(std::fs::read_to_string(store.data_file()).unwrap(), "[]");

        // Recovery already happened; the next read is clean.
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_all_loads_legacy_schema() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(&dir);
        store.ensure_store_exists().await.unwrap();
        std::fs::write(
            store.data_file(),
            r#"[
                {"content": "old body", "date": "2023-01-01T00:00:00.000Z",
                 "comments": [{"body": "old reply", "date": "2023-01-02T00:00:00.000Z"}]}
            ]"#,
        )
        .unwrap();

        let posts = store.read_all().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "");
        assert_eq!(posts[0].body, "old body");
        assert_eq!(posts[0].created_at, "2023-01-01T00:00:00.000Z");
        assert_eq!(posts[0].comments[0].content, "old reply");
    }
}
