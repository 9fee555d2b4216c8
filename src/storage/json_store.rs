//! JSON-file document store with periodic auto-save
//!
//! All access to the in-memory document goes through one mutex, so a
//! background save never serializes a half-applied upsert. Saves write to a
//! sibling `.tmp` file and rename it over the target.

use crate::state::{NodeId, SiteGraph};
use crate::storage::document::{DocumentRecord, HarvestDocument};
use crate::storage::traits::{DocumentSink, StoreError, StoreResult};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default interval between background saves
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(300);

struct StoreInner {
    path: PathBuf,
    document: Mutex<HarvestDocument>,
}

impl StoreInner {
    fn lock(&self) -> StoreResult<MutexGuard<'_, HarvestDocument>> {
        self.document.lock().map_err(|_| StoreError::Poisoned)
    }

    fn flush(&self) -> StoreResult<()> {
        // held for the whole write so saves land on disk in order
        let document = self.lock()?;
        let json = document.to_json()?;
        write_atomically(&self.path, json.as_bytes())?;

        tracing::debug!(
            "Saved {} pages to {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Persistent store of harvested pages backed by a single JSON file
pub struct DocumentStore {
    inner: Arc<StoreInner>,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl DocumentStore {
    /// Creates a store that will write to `path`
    ///
    /// The containing directory is created if needed. An existing file at
    /// `path` is not read; the store always starts with an empty document
    /// and overwrites the file on the first save.
    ///
    /// # Arguments
    ///
    /// * `path` - Destination of the JSON document
    /// * `root_url` - Root URL recorded in the document metadata
    ///
    /// # Returns
    ///
    /// * `Ok(DocumentStore)` - Store ready for upserts
    /// * `Err(StoreError)` - The containing directory could not be created
    pub fn create(path: impl AsRef<Path>, root_url: &str) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let (stop_tx, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(StoreInner {
                path,
                document: Mutex::new(HarvestDocument::new(root_url)),
            }),
            stop_tx,
            task: Mutex::new(None),
        })
    }

    /// Starts saving the document every `interval` on the tokio runtime
    ///
    /// Must be called from within a runtime. Calling it again while a
    /// background task is running has no effect.
    pub fn start_auto_flush(&self, interval: Duration) {
        let mut task = match self.task.lock() {
            Ok(task) => task,
            Err(_) => {
                tracing::warn!("Auto-save not started: task handle lock poisoned");
                return;
            }
        };

        if task.is_some() {
            tracing::debug!("Auto-save already running");
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_rx = self.stop_tx.subscribe();
        *task = Some(tokio::spawn(auto_flush_loop(inner, interval, stop_rx)));

        tracing::debug!("Auto-save every {:?} to {}", interval, self.inner.path.display());
    }

    /// Stops the background task, waits for it, then saves one last time
    ///
    /// The result is the outcome of the final save.
    pub async fn close(&self) -> StoreResult<()> {
        self.shutdown().await;

        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.flush()).await?
    }

    /// Stops the background task and waits for it without saving
    ///
    /// Used when a harvest fails before producing anything worth keeping,
    /// so an existing file at the target path is left as it was.
    pub async fn abort(&self) {
        self.shutdown().await;
        tracing::debug!("Auto-save aborted, {} left untouched", self.inner.path.display());
    }

    /// Returns true while the background save task is running
    pub fn is_auto_flushing(&self) -> bool {
        self.task
            .lock()
            .map(|task| task.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    async fn shutdown(&self) {
        self.stop();

        let handle = self.task.lock().ok().and_then(|mut task| task.take());
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("Auto-save task ended abnormally: {}", e);
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    pub fn root_url(&self) -> StoreResult<String> {
        Ok(self.inner.lock()?.root_url.clone())
    }

    pub fn created_at(&self) -> StoreResult<String> {
        Ok(self.inner.lock()?.created_at.clone())
    }

    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.inner.lock()?.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.inner.lock()?.is_empty())
    }

    /// Returns a copy of the record stored under a canonical URL
    pub fn record(&self, url: &str) -> StoreResult<Option<DocumentRecord>> {
        Ok(self.inner.lock()?.get(url).cloned())
    }

    /// Returns a copy of all records in insertion order
    pub fn records(&self) -> StoreResult<Vec<DocumentRecord>> {
        Ok(self.inner.lock()?.pages().to_vec())
    }
}

impl DocumentSink for DocumentStore {
    fn upsert(&self, graph: &SiteGraph, node: NodeId, content: &str) -> StoreResult<()> {
        let record = DocumentRecord::from_node(graph, node, content);
        let url = record.url.clone();

        let mut document = self.inner.lock()?;
        let inserted = document.upsert(record);

        tracing::debug!(
            "{} record for {} ({} pages)",
            if inserted { "Added" } else { "Replaced" },
            url,
            document.len()
        );
        Ok(())
    }

    fn update_links(&self, graph: &SiteGraph, node: NodeId) -> StoreResult<()> {
        let url = graph.node(node).canonical_url();
        let links = graph.children_urls(node);

        let mut document = self.inner.lock()?;
        if document.set_links(&url, links) {
            tracing::debug!("Updated links of {}", url);
        }
        Ok(())
    }

    fn flush(&self) -> StoreResult<()> {
        self.inner.flush()
    }

    fn stop(&self) {
        self.stop_tx.send_replace(true);
    }
}

async fn auto_flush_loop(
    inner: Arc<StoreInner>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    if *stop_rx.borrow() {
        return;
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = stop_rx.changed() => {
                tracing::debug!("Auto-save stopped");
                break;
            }

            _ = ticker.tick() => {
                let inner = Arc::clone(&inner);
                match tokio::task::spawn_blocking(move || inner.flush()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!("Auto-save failed, retrying on next tick: {}", e);
                    }
                    Err(e) => {
                        tracing::warn!("Auto-save task failed: {}", e);
                    }
                }
            }
        }
    }
}

fn write_atomically(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let tmp = tmp_path(path);

    std::fs::write(&tmp, bytes).map_err(|source| StoreError::Write {
        path: tmp.clone(),
        source,
    })?;

    std::fs::rename(&tmp, path).map_err(|source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
