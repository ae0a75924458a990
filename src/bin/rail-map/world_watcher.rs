//! Reloads the world snapshot whenever the game (or a bridge process) rewrites it.
//!
//! Each rewrite is one simulation tick as far as the map is concerned; the new
//! snapshot is what moves the followed entity.

use crate::world::{WorldLoadError, load_world};
use eframe::egui;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rail_map::WorldData;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

/// Watches a snapshot file and hands freshly parsed worlds to the UI thread.
pub struct WorldWatcher {
    /// Receiver for reload results from the file watcher
    update_rx: Receiver<Result<WorldData, WorldLoadError>>,
    /// The watcher must be kept alive for events to fire
    _watcher: RecommendedWatcher,
}

impl WorldWatcher {
    /// Starts watching `path`.
    ///
    /// Returns `None` if the file has no parent folder or watching fails.
    pub fn new(ctx: egui::Context, path: PathBuf) -> Option<Self> {
        // Writers replace the file, so the watch goes on its folder.
        let folder = path.parent()?.to_path_buf();
        if !folder.exists() {
            log::warn!("World snapshot folder does not exist: {}", folder.display());
            return None;
        }

        let (update_tx, update_rx) = mpsc::channel();
        let watched = path.clone();

        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    log::warn!("World watcher error: {err}");
                    return;
                }
            };

            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            if !event.paths.iter().any(|p| is_same_file(p, &watched)) {
                return;
            }

            let result = load_world(&watched);
            match &result {
                Ok(world) => log::debug!(
                    "World snapshot reloaded: {} players, {} frames",
                    world.players.len(),
                    world.frames.len()
                ),
                // Half-written files are common; the next write event retries.
                Err(err) => log::debug!("World snapshot reload failed: {err}"),
            }
            if update_tx.send(result).is_ok() {
                ctx.request_repaint();
            }
        })
        .ok()?;

        watcher.watch(&folder, RecursiveMode::NonRecursive).ok()?;

        log::info!("Watching world snapshot: {}", path.display());

        Some(Self {
            update_rx,
            _watcher: watcher,
        })
    }

    /// Drains pending reloads. Returns the newest successfully parsed world and
    /// the errors seen since the last poll.
    pub fn poll(&mut self) -> (Option<WorldData>, Vec<WorldLoadError>) {
        let mut latest = None;
        let mut errors = Vec::new();

        loop {
            match self.update_rx.try_recv() {
                Ok(Ok(world)) => latest = Some(world),
                Ok(Err(err)) => errors.push(err),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("World watcher channel disconnected");
                    break;
                }
            }
        }

        // A good snapshot after a bad one means the bad one was a partial write.
        if latest.is_some() {
            errors.clear();
        }

        (latest, errors)
    }
}

fn is_same_file(candidate: &Path, watched: &Path) -> bool {
    candidate == watched || candidate.file_name() == watched.file_name()
}
