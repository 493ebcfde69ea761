//! Descriptor file hot reload.
//!
//! A [`DescriptorWatcher`] polls the models file's modification time and
//! swaps the registry table when it changes. A file that fails to parse or
//! validate leaves the current table in place; the next change is tried
//! again.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use capitol_query::{ModelRegistry, RegistryError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The result of one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// The file is missing or has not changed since the last poll.
    Unchanged,
    /// The table was replaced; carries the new model count.
    Reloaded(usize),
    /// The file changed but was rejected; carries the reason.
    Rejected(String),
}

/// Watches a descriptor file and reloads a registry from it.
#[derive(Debug)]
pub struct DescriptorWatcher {
    registry: Arc<ModelRegistry>,
    path: PathBuf,
    last_seen: Option<SystemTime>,
}

impl DescriptorWatcher {
    /// Creates a watcher. The file's current state counts as already loaded.
    pub async fn new(registry: Arc<ModelRegistry>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let last_seen = modified_at(&path).await;
        Self {
            registry,
            path,
            last_seen,
        }
    }

    /// Returns the watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks the file once and reloads the registry if it changed.
    pub async fn poll(&mut self) -> ReloadOutcome {
        let current = modified_at(&self.path).await;
        if current.is_none() || current == self.last_seen {
            return ReloadOutcome::Unchanged;
        }
        self.last_seen = current;

        let reloaded = match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => self.registry.reload_from_json_str(&json),
            Err(source) => Err(RegistryError::Io {
                path: self.path.display().to_string(),
                source,
            }),
        };

        match reloaded {
            Ok(models) => {
                info!(path = %self.path.display(), models, "Reloaded model descriptors");
                ReloadOutcome::Reloaded(models)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Keeping previous model descriptors");
                ReloadOutcome::Rejected(e.to_string())
            }
        }
    }

    /// Polls on a fixed interval until the task is aborted.
    pub fn spawn(mut self, every: Duration) -> JoinHandle<()> {
        info!(
            path = %self.path.display(),
            interval_secs = every.as_secs(),
            "Watching model descriptors"
        );

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.poll().await;
            }
        })
    }
}

async fn modified_at(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}
