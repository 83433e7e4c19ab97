//! Core library surface for the CD inventory manager.
//!
//! The `bin` target wires these pieces together; the inventory, persistence
//! and session modules have no terminal dependencies and can be driven
//! directly.
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod models;
pub mod session;
pub mod ui;

/// Convenience re-exports for the persistence layer.
pub use db::{load_snapshot, save_snapshot, LoadOutcome, LoadStatus};

pub use error::{AllocatorAnomaly, InputError, SnapshotError};
pub use inventory::{build_record, find_for_delete, next_id, IdAllocation, Inventory};
pub use models::Record;
pub use session::{DeleteOutcome, MenuChoice, Session};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
