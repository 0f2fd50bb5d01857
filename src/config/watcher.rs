//! Hot reload of the domain configuration.
//!
//! # Design Decisions
//! - The parent directory is watched so editors that save by rename are seen
//! - Only changes to the `[[domains]]` list are forwarded; listener and
//!   observability settings need a restart
//! - A file that fails to load or validate is ignored; the current table stays

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::{DeliveryConfig, DomainConfig};

/// Watches one configuration file and emits validated configs whose domains changed.
pub struct ConfigWatcher {
    path: PathBuf,
    current: Mutex<Vec<DomainConfig>>,
    update_tx: mpsc::UnboundedSender<DeliveryConfig>,
}

impl ConfigWatcher {
    /// Create a watcher for `path`, seeded with the domains already loaded from it.
    ///
    /// Returns the watcher and a receiver for domain updates.
    pub fn new(
        path: &Path,
        initial: &DeliveryConfig,
    ) -> (Self, mpsc::UnboundedReceiver<DeliveryConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            current: Mutex::new(initial.domains.clone()),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Reload the file and forward it when its domains differ from the last ones sent.
    ///
    /// Returns whether an update was sent.
    pub fn reload(&self) -> bool {
        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    "Config reload rejected, keeping current domain table"
                );
                return false;
            }
        };

        let Ok(mut current) = self.current.lock() else {
            return false;
        };
        if *current == config.domains {
            tracing::debug!(path = ?self.path, "Config changed without domain changes");
            return false;
        }

        *current = config.domains.clone();
        tracing::info!(domains = config.domains.len(), "Domain configuration changed");
        self.update_tx.send(config).is_ok()
    }

    fn is_relevant(&self, event: &Event) -> bool {
        matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_))
            && event.paths.iter().any(|p| p.file_name() == self.path.file_name())
    }

    /// Start watching in a background thread.
    ///
    /// Updates stop when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if self.is_relevant(&event) => {
                    self.reload();
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}
