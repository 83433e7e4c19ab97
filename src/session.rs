//! Session state threaded through the terminal adapter. A [`Session`] owns the
//! inventory for one run of the program along with the snapshot path it
//! loads from and saves to.

use std::num::IntErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::db::{load_snapshot, save_snapshot, LoadStatus};
use crate::error::{AllocatorAnomaly, InputError, SnapshotError};
use crate::inventory::{IdAllocation, Inventory};
use crate::models::Record;

/// The six menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Load,
    Add,
    Display,
    Delete,
    Save,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Load,
        MenuChoice::Add,
        MenuChoice::Display,
        MenuChoice::Delete,
        MenuChoice::Save,
        MenuChoice::Exit,
    ];

    /// Map a key press to a menu action, ignoring case. Anything outside the
    /// menu yields `None`.
    pub fn from_key(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'l' => Some(MenuChoice::Load),
            'a' => Some(MenuChoice::Add),
            'i' => Some(MenuChoice::Display),
            'd' => Some(MenuChoice::Delete),
            's' => Some(MenuChoice::Save),
            'x' => Some(MenuChoice::Exit),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            MenuChoice::Load => 'L',
            MenuChoice::Add => 'A',
            MenuChoice::Display => 'I',
            MenuChoice::Delete => 'D',
            MenuChoice::Save => 'S',
            MenuChoice::Exit => 'X',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Load => "Load Inventory from file",
            MenuChoice::Add => "Add CD",
            MenuChoice::Display => "Display Current Inventory",
            MenuChoice::Delete => "Delete CD from Inventory",
            MenuChoice::Save => "Save Inventory to file",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(Record),
    NotFound(u32),
}

/// Turn the text typed at the delete prompt into a CD id.
pub fn parse_delete_target(raw: &str) -> Result<u32, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyTarget);
    }
    let value = trimmed.parse::<i64>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            InputError::OutOfRange(trimmed.to_string())
        }
        _ => InputError::NotAnInteger(trimmed.to_string()),
    })?;
    u32::try_from(value)
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| InputError::OutOfRange(trimmed.to_string()))
}

/// Reloading throws away unsaved work, so it needs the full word `yes`.
pub fn confirms_reload(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

pub fn confirms_save(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

#[derive(Debug)]
pub struct Session {
    inventory: Inventory,
    data_file: PathBuf,
    dirty: bool,
}

impl Session {
    /// Empty session bound to `data_file`. Nothing is read yet.
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            inventory: Inventory::new(),
            data_file: data_file.into(),
            dirty: false,
        }
    }

    /// Session populated from the snapshot at `data_file`.
    pub fn open(data_file: impl Into<PathBuf>) -> (Self, LoadStatus) {
        let mut session = Self::new(data_file);
        let status = session.load();
        (session, status)
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn records(&self) -> &[Record] {
        self.inventory.records()
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn next_id(&self) -> IdAllocation {
        self.inventory.next_id()
    }

    /// Replace the inventory with the snapshot contents. Missing and
    /// unreadable snapshots leave an empty inventory behind.
    pub fn load(&mut self) -> LoadStatus {
        let outcome = load_snapshot(&self.data_file);
        self.inventory = Inventory::from_records(outcome.records);
        self.dirty = false;
        outcome.status
    }

    pub fn add(&mut self, title: &str, artist: &str) -> (Record, Option<AllocatorAnomaly>) {
        self.dirty = true;
        self.inventory.add(title, artist)
    }

    pub fn delete(&mut self, target_id: u32) -> DeleteOutcome {
        match self.inventory.remove(target_id) {
            Some(record) => {
                self.dirty = true;
                DeleteOutcome::Deleted(record)
            }
            None => {
                info!("delete requested for unknown CD #{target_id}");
                DeleteOutcome::NotFound(target_id)
            }
        }
    }

    /// Write the inventory to the snapshot. On failure the inventory is left
    /// as it was and still counts as unsaved.
    pub fn save(&mut self) -> Result<usize, SnapshotError> {
        let count = save_snapshot(&self.data_file, self.inventory.records())?;
        self.dirty = false;
        Ok(count)
    }
}
