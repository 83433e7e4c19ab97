//! Persistence gateway: the inventory is written to and read from a single
//! SQLite snapshot file.

mod connection;
mod snapshot;

pub use connection::{create_snapshot, open_snapshot, staging_path};
pub use snapshot::{load_snapshot, save_snapshot, LoadOutcome, LoadStatus};
