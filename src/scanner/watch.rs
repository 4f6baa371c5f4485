//! Document change watching
//!
//! Monitors a local HTML file and emits an event when it changes, so the
//! caller can re-scan. The watcher only reports; scheduling the re-scan
//! (including debouncing bursts of editor writes) is the caller's job,
//! via [`WatcherHandle::recv_debounced`].

use anyhow::{anyhow, Result};
use notify::{RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::warn;

/// Handle to manage the watcher lifecycle. Dropping it stops the watcher.
pub struct WatcherHandle {
    rx: async_channel::Receiver<PathBuf>,
    #[allow(dead_code)]
    watcher_handle: JoinHandle<()>,
}

impl WatcherHandle {
    /// Receive the next change event.
    pub async fn recv(&self) -> Option<PathBuf> {
        self.rx.recv().await.ok()
    }

    /// Receive a change event, then keep draining until the file has been
    /// quiet for `window`. Editors often write a file several times in
    /// quick succession; one re-scan covers the whole burst.
    pub async fn recv_debounced(&self, window: Duration) -> Option<PathBuf> {
        let first = self.recv().await?;
        let mut latest = first;
        loop {
            match tokio::time::timeout(window, self.rx.recv()).await {
                Ok(Ok(path)) => latest = path,
                Ok(Err(_)) | Err(_) => return Some(latest),
            }
        }
    }
}

/// Watches one file for modification.
pub struct DocumentWatcher;

impl DocumentWatcher {
    pub fn new() -> Self {
        Self
    }

    /// Start watching a file for changes.
    ///
    /// The parent directory is watched rather than the file itself, since
    /// many editors replace the file on save.
    pub async fn watch_file(self, path: &Path) -> Result<WatcherHandle> {
        if !path.exists() {
            return Err(anyhow!("Watch path does not exist: {:?}", path));
        }
        let file = path
            .canonicalize()
            .map_err(|e| anyhow!("Cannot resolve watch path {:?}: {}", path, e))?;
        let dir = file
            .parent()
            .ok_or_else(|| anyhow!("Watch path has no parent directory: {:?}", file))?
            .to_path_buf();

        let (tx, rx) = async_channel::unbounded::<PathBuf>();
        let tx_keepalive = tx.clone();

        let watcher_handle = tokio::task::spawn_blocking(move || {
            let target = file.clone();
            let result = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
                match res {
                    Ok(event) => {
                        use notify::EventKind;
                        if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                            for path in &event.paths {
                                if path == &target {
                                    let _ = tx.send_blocking(path.clone());
                                }
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "watch error"),
                }
            });

            match result {
                Ok(mut watcher) => {
                    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
                        warn!(error = %e, "failed to watch directory");
                        return;
                    }
                    // keep the watcher alive until the receiver is dropped
                    while !tx_keepalive.is_closed() {
                        std::thread::sleep(Duration::from_millis(500));
                    }
                }
                Err(e) => {
                    warn!(error = %e, "failed to create watcher");
                }
            }
        });

        Ok(WatcherHandle { rx, watcher_handle })
    }
}

impl Default for DocumentWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_watcher_creation_and_cleanup() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let file = dir.path().join("page.html");
        fs::write(&file, "<html></html>").unwrap();

        let watcher = DocumentWatcher::new();
        let handle = watcher.watch_file(&file).await;
        assert!(handle.is_ok());
        drop(handle.unwrap());
    }

    #[tokio::test]
    async fn test_error_on_missing_path() {
        let watcher = DocumentWatcher::new();
        let result = watcher.watch_file(Path::new("/nonexistent/page.html")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_modification_emits_event() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("page.html");
        fs::write(&file, "<html></html>").unwrap();

        let handle = DocumentWatcher::new().watch_file(&file).await.unwrap();
        // give the blocking watcher a moment to register
        tokio::time::sleep(Duration::from_millis(300)).await;
        fs::write(&file, "<html><body>changed</body></html>").unwrap();

        let received = tokio::time::timeout(Duration::from_secs(5), handle.recv()).await;
        assert!(received.is_ok(), "expected a change event");
    }
}
