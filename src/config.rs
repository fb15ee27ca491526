//! Runtime configuration and hot reload.
//!
//! The style mode is the only external control surface: a small YAML file
//! carries it, and a file watcher lets the mode change while the frame loop
//! is running. The next cycle picks the new mode up.

use crate::stylize::StyleMode;
use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use tracing::{error, info, warn};

fn default_annotate() -> bool {
    true
}

/// Processing options persisted in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mode: StyleMode,
    /// Stamp the mode and dimensions onto every output frame.
    #[serde(default = "default_annotate")]
    pub annotate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: StyleMode::default(),
            annotate: true,
        }
    }
}

impl Config {
    pub fn load(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {path:?}"))
    }
}

/// Watches the config file and surfaces updated settings between cycles.
pub struct ConfigWatcher {
    path: PathBuf,
    _watcher: RecommendedWatcher,
    rx: Receiver<std::result::Result<Event, notify::Error>>,
}

impl ConfigWatcher {
    /// Starts watching `path` if one was given. Returns None (and logs why)
    /// when watching cannot be set up; the pipeline then just keeps its
    /// startup settings.
    pub fn new(path: Option<PathBuf>) -> Option<Self> {
        let path = path?;
        let (tx, rx) = channel();

        match RecommendedWatcher::new(tx, notify::Config::default()) {
            Ok(mut watcher) => {
                if let Err(e) = watcher.watch(&path, RecursiveMode::NonRecursive) {
                    warn!("Failed to watch config file {:?}: {}", path, e);
                    return None;
                }
                info!("Watching config file {:?} for mode changes", path);
                Some(Self {
                    path,
                    _watcher: watcher,
                    rx,
                })
            }
            Err(e) => {
                warn!("Failed to create config watcher: {}", e);
                None
            }
        }
    }

    /// Drains pending filesystem events and reloads the config if it was
    /// touched. Returns the fresh settings on a successful reload.
    pub fn check_for_changes(&mut self) -> Option<Config> {
        let mut needs_reload = false;
        while let Ok(res) = self.rx.try_recv() {
            if let Ok(event) = res {
                if matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) {
                    needs_reload = true;
                }
            }
        }

        if needs_reload {
            match Config::load(&self.path) {
                Ok(config) => {
                    info!("Config reloaded: mode {:?}", config.mode);
                    return Some(config);
                }
                Err(e) => error!("Failed to reload config: {:#}", e),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: Config = serde_yaml::from_str("mode: comic\nannotate: false\n").unwrap();
        assert_eq!(config.mode, StyleMode::Comic);
        assert!(!config.annotate);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_yaml::from_str("mode: sepia\n").unwrap();
        assert_eq!(config.mode, StyleMode::Sepia);
        assert!(config.annotate);
    }

    #[test]
    fn test_round_trip() {
        let config = Config {
            mode: StyleMode::Pixelize,
            annotate: false,
        };
        let text = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back.mode, StyleMode::Pixelize);
        assert!(!back.annotate);
    }
}
