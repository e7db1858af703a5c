use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::error::{AppError, AppResult};

/// One JSON-array file holding every record of a collection. Every access
/// goes through the file's read-write lock, so a mutating load-modify-save
/// cycle can never interleave with another writer or a concurrent read.
pub struct JsonStore<T> {
    path: PathBuf,
    lock: RwLock<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open the store, creating an empty collection file when none exists.
    /// Idempotent; an existing file is left untouched.
    pub async fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        if !fs::try_exists(&path).await? {
            fs::write(&path, b"[]").await?;
            tracing::info!(path = %path.display(), "created empty store file");
        }
        Ok(Self {
            path,
            lock: RwLock::new(()),
            _marker: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_unlocked(&self) -> AppResult<Vec<T>> {
        let bytes = fs::read(&self.path).await?;
        serde_json::from_slice(&bytes).map_err(|source| AppError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    async fn save_unlocked(&self, records: &[T]) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(records).map_err(anyhow::Error::from)?;
        // Write-then-rename so a reader never observes a partially written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load the full collection under the read lock.
    pub async fn read(&self) -> AppResult<Vec<T>> {
        let _guard = self.lock.read().await;
        self.load_unlocked().await
    }

    /// Take the write lock and load the collection for mutation. The lock is
    /// held until the returned transaction is committed or dropped; dropping
    /// without commit discards every change.
    pub async fn begin_write(&self) -> AppResult<WriteTxn<'_, T>> {
        let guard = self.lock.write().await;
        let records = self.load_unlocked().await?;
        Ok(WriteTxn {
            records,
            store: self,
            _guard: guard,
        })
    }
}

pub struct WriteTxn<'a, T>
where
    T: Serialize + DeserializeOwned,
{
    pub records: Vec<T>,
    store: &'a JsonStore<T>,
    _guard: RwLockWriteGuard<'a, ()>,
}

impl<T> WriteTxn<'_, T>
where
    T: Serialize + DeserializeOwned,
{
    /// Persist the records and release the file lock.
    pub async fn commit(self) -> AppResult<()> {
        self.store.save_unlocked(&self.records).await
    }
}
