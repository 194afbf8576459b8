//! Per-path async locks
//!
//! One `tokio` mutex per snapshot path. The lock table itself sits behind a
//! synchronous mutex that is only held while looking up or inserting an
//! entry, never across an await point.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::errors::{lock_poisoned, Result};

/// Exclusive async locks keyed by path
#[derive(Debug, Default)]
pub struct PathLocks {
    locks: Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path`. Released when the guard drops.
    ///
    /// # Errors
    ///
    /// `Concurrency` if the lock table was poisoned.
    pub async fn lock(&self, path: &Path) -> Result<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self.locks.lock().map_err(|_| lock_poisoned("path_locks"))?;
            locks.entry(path.to_path_buf()).or_default().clone()
        };
        Ok(lock.lock_owned().await)
    }

    /// Run `fut` while holding the lock for `path`.
    ///
    /// The lock is released on every exit path, including errors and panics
    /// unwinding through the future.
    ///
    /// # Errors
    ///
    /// Whatever `fut` returns, or `Concurrency` if the lock table was poisoned.
    pub async fn with_lock<F, T>(&self, path: &Path, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _guard = self.lock(path).await?;
        fut.await
    }
}
