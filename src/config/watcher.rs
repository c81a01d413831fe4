//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file itself: editors and
//! config-management tools usually replace the file by rename, which drops a
//! watch placed directly on the old inode.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config_with;
use crate::config::overrides::ConfigOverrides;
use crate::config::schema::GatewayConfig;

/// Monitors the configuration file and publishes validated replacements.
pub struct ConfigWatcher {
    path: PathBuf,
    overrides: ConfigOverrides,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                overrides: ConfigOverrides::default(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Re-apply `overrides` to every reloaded file.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as reloads are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = self.path.file_name().map(|n| n.to_os_string());
        let path = self.path.clone();
        let overrides = self.overrides;
        let tx = self.update_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                let touches_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touches_config {
                    reload(&path, &overrides, &tx);
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload(path: &Path, overrides: &ConfigOverrides, tx: &mpsc::UnboundedSender<GatewayConfig>) {
    match load_config_with(path, overrides) {
        Ok(config) => {
            tracing::info!(
                upstream = %config.upstream.base_url,
                excluded_prefixes = ?config.routing.excluded_prefixes,
                "Config reloaded"
            );
            if tx.send(config).is_err() {
                tracing::debug!("Config receiver dropped, ignoring reload");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
        }
    }
}
