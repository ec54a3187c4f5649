//! Channels file watcher for hot reload.

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use std::time::Duration;

use crate::releases::manifest::ManifestStore;

/// Refreshes a `ManifestStore` whenever its channels file changes on disk.
pub struct ManifestWatcher {
    store: Arc<ManifestStore>,
}

impl ManifestWatcher {
    pub fn new(store: Arc<ManifestStore>) -> Self {
        Self { store }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let store = self.store.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Channels file change detected, reloading...");
                        match store.refresh() {
                            Ok(releases) => {
                                tracing::info!(groups = releases.groups.len(), "Channels file reloaded");
                            }
                            Err(e) => {
                                tracing::error!("Failed to reload channels file: {}. Keeping current snapshot.", e);
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(self.store.path(), RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.store.path(), "Channels file watcher started");
        Ok(watcher)
    }
}
