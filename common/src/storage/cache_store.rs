use std::{
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::debug;
use url::Url;

use crate::error::AppError;

/// Single cached artifact on local disk.
///
/// Every operation touches only the configured path (plus a sibling temp file
/// while writing). Writes go through a temp file in the same directory that is
/// renamed over the target, so a reader sees either the old record or the new
/// one in full.
#[derive(Debug, Clone)]
pub struct CacheStore {
    path: PathBuf,
}

impl CacheStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store inside `dir`, named after the final path segment of `url`.
    pub fn for_url(dir: impl AsRef<Path>, url: &Url) -> Result<Self, AppError> {
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .ok_or_else(|| {
                AppError::Validation(format!("index URL {url} has no file name to cache under"))
            })?;

        Ok(Self::new(dir.as_ref().join(file_name)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::metadata(&self.path)
            .await
            .is_ok_and(|metadata| metadata.is_file())
    }

    pub async fn modified_at(&self) -> Result<DateTime<Utc>, AppError> {
        let metadata = match tokio::fs::metadata(&self.path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Err(AppError::CacheMissing(self.path.clone())),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(AppError::CacheMissing(self.path.clone()))
            }
            Err(err) => return Err(err.into()),
        };

        Ok(DateTime::<Utc>::from(metadata.modified()?))
    }

    /// Wall-clock time since the record was last written. A timestamp in the
    /// future counts as zero.
    pub async fn age(&self) -> Result<Duration, AppError> {
        let modified = self.modified_at().await?;
        Ok(Utc::now()
            .signed_duration_since(modified)
            .to_std()
            .unwrap_or(Duration::ZERO))
    }

    pub async fn read(&self) -> Result<Vec<u8>, AppError> {
        tokio::fs::read(&self.path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                AppError::CacheMissing(self.path.clone())
            } else {
                AppError::Io(err)
            }
        })
    }

    pub async fn write(&self, contents: &[u8]) -> Result<(), AppError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&parent).await?;

        let target = self.path.clone();
        let body = contents.to_vec();
        let size = body.len();
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            let mut staged = NamedTempFile::new_in(&parent)?;
            staged.write_all(&body)?;
            staged.as_file().sync_all()?;
            staged
                .persist(&target)
                .map_err(|err| AppError::Io(err.error))?;
            Ok(())
        })
        .await??;

        debug!(path = %self.path.display(), bytes = size, "cache record replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn missing_record_reports_not_found() {
        let dir = tempdir().expect("tempdir");
        let store = CacheStore::new(dir.path().join("xref.json"));

        assert!(!store.exists().await);
        assert!(matches!(store.age().await, Err(AppError::CacheMissing(_))));
        assert!(matches!(store.read().await, Err(AppError::CacheMissing(_))));
    }

    #[tokio::test]
    async fn write_creates_parents_and_replaces_content() {
        let dir = tempdir().expect("tempdir");
        let store = CacheStore::new(dir.path().join("nested/deeper/xref.json"));

        store.write(b"first").await.expect("first write");
        assert!(store.exists().await);
        assert_eq!(store.read().await.expect("read back"), b"first");

        // parents already exist on the second write
        store.write(b"second, longer body").await.expect("overwrite");
        assert_eq!(
            store.read().await.expect("read back"),
            b"second, longer body"
        );

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested/deeper"))
            .expect("list cache dir")
            .collect();
        assert_eq!(leftovers.len(), 1, "temp files must not be left behind");
    }

    #[tokio::test]
    async fn fresh_write_has_small_age() {
        let dir = tempdir().expect("tempdir");
        let store = CacheStore::new(dir.path().join("xref.json"));
        store.write(b"{}").await.expect("write");

        let age = store.age().await.expect("age of fresh record");
        assert!(age < Duration::from_secs(60), "unexpected age {age:?}");
    }

    #[tokio::test]
    async fn age_follows_modification_time() {
        let dir = tempdir().expect("tempdir");
        let store = CacheStore::new(dir.path().join("xref.json"));
        store.write(b"{}").await.expect("write");

        let backdated = SystemTime::now() - Duration::from_secs(20 * 60);
        std::fs::File::options()
            .write(true)
            .open(store.path())
            .and_then(|file| file.set_modified(backdated))
            .expect("backdate record");

        let age = store.age().await.expect("age");
        assert!(age >= Duration::from_secs(19 * 60), "unexpected age {age:?}");
    }

    #[tokio::test]
    async fn future_timestamp_counts_as_zero_age() {
        let dir = tempdir().expect("tempdir");
        let store = CacheStore::new(dir.path().join("xref.json"));
        store.write(b"{}").await.expect("write");

        let ahead = SystemTime::now() + Duration::from_secs(3600);
        std::fs::File::options()
            .write(true)
            .open(store.path())
            .and_then(|file| file.set_modified(ahead))
            .expect("move record into the future");

        assert_eq!(store.age().await.expect("age"), Duration::ZERO);
    }

    #[test]
    fn file_name_comes_from_url() {
        let url = Url::parse("https://example.org/data/Coverage/xref.json").expect("url");
        let store = CacheStore::for_url("/tmp/cache", &url).expect("named store");
        assert_eq!(store.path(), Path::new("/tmp/cache/xref.json"));

        let bare = Url::parse("https://example.org/").expect("url");
        assert!(matches!(
            CacheStore::for_url("/tmp/cache", &bare),
            Err(AppError::Validation(_))
        ));
    }
}
