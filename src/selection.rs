use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::config::ACCEPTED_EXTENSIONS;
use crate::error::BoothError;

/// Persisted shape of the operator's last selection
#[derive(Debug, Serialize, Deserialize)]
struct SelectionState {
    slots: Vec<String>,
}

/// Three empty slots, the state used when nothing was persisted yet.
pub fn empty_slots() -> [PathBuf; 3] {
    [PathBuf::new(), PathBuf::new(), PathBuf::new()]
}

/// Returns true when a slot entry points at an existing file.
pub fn slot_is_valid(slot: &Path) -> bool {
    !slot.as_os_str().is_empty() && slot.exists()
}

/// Persists the last three chosen photos between kiosk runs
///
/// The state file is a small pretty-printed JSON object; unset slots are
/// stored as empty strings. Loading is deliberately forgiving: a missing
/// or corrupt file is the same as having no prior selection, it only
/// differs in what gets logged.
pub struct SelectionStore {
    state_file: PathBuf,
}

impl SelectionStore {
    pub fn new(state_file: PathBuf) -> Self {
        SelectionStore { state_file }
    }

    /// Loads the previous selection, falling back to empty slots
    ///
    /// Never fails: a missing state file logs at debug ("no prior
    /// selection") while an unreadable or malformed one logs at warn, so
    /// corruption stays observable in diagnostics.
    pub fn load(&self) -> [PathBuf; 3] {
        let raw = match fs::read_to_string(&self.state_file) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no prior selection at {}", self.state_file.display());
                return empty_slots();
            }
            Err(e) => {
                warn!(
                    "selection state {} unreadable, starting empty: {}",
                    self.state_file.display(),
                    e
                );
                return empty_slots();
            }
        };

        match serde_json::from_str::<SelectionState>(&raw) {
            Ok(state) => {
                let mut slots = empty_slots();
                for (slot, stored) in slots.iter_mut().zip(state.slots) {
                    *slot = PathBuf::from(stored);
                }
                slots
            }
            Err(e) => {
                warn!(
                    "selection state {} is corrupt, starting empty: {}",
                    self.state_file.display(),
                    e
                );
                empty_slots()
            }
        }
    }

    /// Overwrites the state file with the given selection
    ///
    /// Write failures propagate: losing the state degrades the next run,
    /// and the operator should know about it.
    pub fn save(&self, slots: &[PathBuf; 3]) -> Result<(), BoothError> {
        let state = SelectionState {
            slots: slots
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        };
        fs::write(&self.state_file, serde_json::to_string_pretty(&state)?)?;
        Ok(())
    }
}

fn is_accepted_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Picks the most recently modified image in the input directory
///
/// Non-recursive; only files with an accepted extension count. An empty
/// or filtered-empty directory is a `NoCandidate` error, fatal for the
/// slot being filled.
pub fn auto_pick_newest(input_dir: &Path) -> Result<PathBuf, BoothError> {
    let entries = match fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(_) => return Err(BoothError::NoCandidate(input_dir.to_path_buf())),
    };

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_accepted_image(&path) {
            continue;
        }
        let modified = match entry.metadata().and_then(|m| m.modified()) {
            Ok(t) => t,
            Err(_) => continue,
        };
        match &newest {
            Some((best, _)) if *best >= modified => {}
            _ => newest = Some((modified, path)),
        }
    }

    newest
        .map(|(_, path)| path)
        .ok_or_else(|| BoothError::NoCandidate(input_dir.to_path_buf()))
}
