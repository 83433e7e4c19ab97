use std::fs;
use std::io;
use std::path::Path;

use log::{error, info, warn};
use rusqlite::params;

use crate::error::SnapshotError;
use crate::models::Record;

use super::connection::{create_snapshot, open_snapshot, staging_path};

/// What happened while reading a snapshot.
#[derive(Debug)]
pub enum LoadStatus {
    /// The snapshot was read and held this many records.
    Loaded(usize),
    /// No snapshot exists yet. The inventory starts empty.
    Missing,
    /// A snapshot exists but could not be decoded. The inventory starts
    /// empty.
    Unreadable(SnapshotError),
}

/// Records read from a snapshot together with how the read went. Loading
/// never fails; missing or unreadable snapshots simply produce no records.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub status: LoadStatus,
}

impl LoadOutcome {
    fn empty(status: LoadStatus) -> Self {
        Self {
            records: Vec::new(),
            status,
        }
    }
}

/// Read the ordered record list stored at `path`.
pub fn load_snapshot(path: &Path) -> LoadOutcome {
    match fs::metadata(path) {
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("no snapshot at {}, starting empty", path.display());
            return LoadOutcome::empty(LoadStatus::Missing);
        }
        Err(source) => {
            let err = SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            };
            warn!("snapshot unreadable, starting empty: {err}");
            return LoadOutcome::empty(LoadStatus::Unreadable(err));
        }
    }

    match read_records(path) {
        Ok(records) => {
            info!("loaded {} CDs from {}", records.len(), path.display());
            LoadOutcome {
                status: LoadStatus::Loaded(records.len()),
                records,
            }
        }
        Err(err) => {
            warn!("snapshot unreadable, starting empty: {err}");
            LoadOutcome::empty(LoadStatus::Unreadable(err))
        }
    }
}

fn read_records(path: &Path) -> Result<Vec<Record>, SnapshotError> {
    let conn = open_snapshot(path)?;
    let mut stmt = conn.prepare("SELECT id, title, artist FROM cds ORDER BY position")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut records = Vec::with_capacity(rows.len());
    for (raw_id, title, artist) in rows {
        let id = u32::try_from(raw_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| corrupt(path, format!("invalid CD id {raw_id}")))?;
        records.push(Record::new(id, title, artist));
    }
    Ok(records)
}

fn corrupt(path: &Path, reason: String) -> SnapshotError {
    SnapshotError::Corrupt {
        path: path.to_path_buf(),
        reason,
    }
}

/// Write `records` to `path`, replacing whatever snapshot was there. The new
/// snapshot is built next to the target and renamed over it once complete.
/// Returns the number of records written.
pub fn save_snapshot(path: &Path, records: &[Record]) -> Result<usize, SnapshotError> {
    let result = write_and_replace(path, records);
    match &result {
        Ok(count) => info!("saved {count} CDs to {}", path.display()),
        Err(err) => error!("failed to save inventory: {err}"),
    }
    result
}

fn write_and_replace(path: &Path, records: &[Record]) -> Result<usize, SnapshotError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SnapshotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let staging = staging_path(path);
    let written = write_staging(&staging, records).and_then(|count| {
        fs::rename(&staging, path)
            .map(|()| count)
            .map_err(|source| SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })
    });

    if written.is_err() && staging.exists() {
        if let Err(err) = fs::remove_file(&staging) {
            warn!("could not remove {}: {err}", staging.display());
        }
    }
    written
}

fn write_staging(staging: &Path, records: &[Record]) -> Result<usize, SnapshotError> {
    let mut conn = create_snapshot(staging)?;
    let tx = conn.transaction()?;
    {
        let mut stmt =
            tx.prepare("INSERT INTO cds (position, id, title, artist) VALUES (?1, ?2, ?3, ?4)")?;
        for (position, record) in records.iter().enumerate() {
            stmt.execute(params![
                position as i64,
                record.id,
                record.title,
                record.artist
            ])?;
        }
    }
    tx.commit()?;
    conn.close().map_err(|(_, err)| err)?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rusqlite::Connection;

    use crate::inventory::Inventory;

    fn sample() -> Vec<Record> {
        vec![
            Record::new(1, "Abbey Road", "The Beatles"),
            Record::new(4, "Blue", "Joni Mitchell"),
            Record::new(2, "", ""),
        ]
    }

    #[test]
    fn missing_snapshot_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_snapshot(&dir.path().join("nothing-here.dat"));
        assert!(outcome.records.is_empty());
        assert!(matches!(outcome.status, LoadStatus::Missing));
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");

        assert_eq!(save_snapshot(&path, &sample()).unwrap(), 3);
        let outcome = load_snapshot(&path);

        assert_eq!(outcome.records, sample());
        assert!(matches!(outcome.status, LoadStatus::Loaded(3)));
        assert!(!staging_path(&path).exists());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");

        save_snapshot(&path, &sample()).unwrap();
        save_snapshot(&path, &[Record::new(9, "Only", "One")]).unwrap();

        assert_eq!(load_snapshot(&path).records, vec![Record::new(9, "Only", "One")]);
    }

    #[test]
    fn empty_inventory_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");

        save_snapshot(&path, &[]).unwrap();
        let outcome = load_snapshot(&path);
        assert!(outcome.records.is_empty());
        assert!(matches!(outcome.status, LoadStatus::Loaded(0)));
    }

    #[test]
    fn garbage_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");
        fs::write(&path, b"this is definitely not sqlite, just some text padding it out")
            .unwrap();

        let outcome = load_snapshot(&path);
        assert!(outcome.records.is_empty());
        assert!(matches!(outcome.status, LoadStatus::Unreadable(_)));
    }

    #[test]
    fn database_without_cds_table_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("other.sqlite");
        let conn = Connection::open(&path).unwrap();
        conn.execute("CREATE TABLE albums (id INTEGER)", []).unwrap();
        drop(conn);

        assert!(matches!(
            load_snapshot(&path).status,
            LoadStatus::Unreadable(SnapshotError::Sqlite(_))
        ));
    }

    #[test]
    fn repeated_ids_load_as_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repeats.dat");
        let conn = create_snapshot(&path).unwrap();
        conn.execute(
            "INSERT INTO cds (position, id, title, artist) VALUES (0, 5, 'a', 'b'), (1, 5, 'c', 'd')",
            [],
        )
        .unwrap();
        drop(conn);

        let outcome = load_snapshot(&path);
        assert!(matches!(outcome.status, LoadStatus::Loaded(2)));
        assert_eq!(
            outcome.records,
            vec![Record::new(5, "a", "b"), Record::new(5, "c", "d")]
        );
    }

    #[test]
    fn inventory_after_allocator_fallback_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");
        let mut inventory = Inventory::from_records(vec![
            Record::new(1, "A", "B"),
            Record::new(u32::MAX, "C", "D"),
        ]);
        save_snapshot(&path, inventory.records()).unwrap();

        let (added, anomaly) = inventory.add("E", "F");
        assert_eq!(added.id, 1);
        assert!(anomaly.is_some());
        save_snapshot(&path, inventory.records()).unwrap();

        let outcome = load_snapshot(&path);
        assert!(matches!(outcome.status, LoadStatus::Loaded(3)));
        assert_eq!(outcome.records, inventory.records());
    }

    #[test]
    fn non_positive_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.dat");
        let conn = create_snapshot(&path).unwrap();
        conn.execute(
            "INSERT INTO cds (position, id, title, artist) VALUES (0, 0, 'a', 'b')",
            [],
        )
        .unwrap();
        drop(conn);

        assert!(matches!(
            load_snapshot(&path).status,
            LoadStatus::Unreadable(SnapshotError::Corrupt { .. })
        ));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("CDInventory.dat");

        save_snapshot(&path, &sample()).unwrap();
        assert_eq!(load_snapshot(&path).records, sample());
    }

    #[test]
    fn save_replaces_corrupt_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CDInventory.dat");
        fs::write(&path, b"garbage").unwrap();

        save_snapshot(&path, &sample()).unwrap();
        assert_eq!(load_snapshot(&path).records, sample());
    }

    #[test]
    fn save_reports_failure_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();

        let err = save_snapshot(&blocker.join("CDInventory.dat"), &sample()).unwrap_err();
        assert!(matches!(err, SnapshotError::Io { .. }));
    }
}
