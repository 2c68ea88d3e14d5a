//! Level catalog and asynchronous level loading
//!
//! Image decode is the simulation's only suspension point. A load runs on a
//! worker thread behind a `PendingLevel` handle the state machine polls from
//! its `Loading` phase; the block field is swapped in atomically on
//! completion. Loads are single-flight: only the state machine starts them,
//! never while one is pending.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::config::Config;
use crate::mosaic::{self, LevelLoadError};
use crate::sim::field::Block;

/// One entry of the ordered, fixed level list
#[derive(Debug, Clone)]
pub struct LevelDef {
    /// Display name shown in the HUD
    pub name: String,
    /// Path of the level image
    pub image: PathBuf,
}

impl LevelDef {
    /// Build a level definition from an image path, naming it after the
    /// file stem
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let image = path.into();
        let name = image
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        Self { name, image }
    }
}

/// Handle to an in-flight level load
pub struct PendingLevel {
    path: PathBuf,
    rx: Receiver<Result<Vec<Block>, LevelLoadError>>,
}

impl PendingLevel {
    /// Start loading and converting a level image on a worker thread
    pub fn spawn(path: PathBuf, config: Config) -> Self {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let result = mosaic::build_level(&worker_path, &config);
            // Receiver may have been dropped by a reset; nothing to do then
            let _ = tx.send(result);
        });
        Self { path, rx }
    }

    /// Poll for completion without blocking. Returns `None` while the worker
    /// is still running.
    pub fn poll(&self) -> Option<Result<Vec<Block>, LevelLoadError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LevelLoadError::WorkerLost {
                path: self.path.clone(),
            })),
        }
    }

    /// The image path this load is for
    pub fn path(&self) -> &Path {
        &self.path
    }
}
