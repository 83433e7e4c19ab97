use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::error::SnapshotError;

/// Open an existing snapshot without ever creating it.
pub fn open_snapshot(path: &Path) -> Result<Connection, SnapshotError> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    Ok(conn)
}

/// Create an empty snapshot at `path` with the `cds` table in place. Any file
/// already at `path` is removed first so the result never mixes old rows in.
pub fn create_snapshot(path: &Path) -> Result<Connection, SnapshotError> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SnapshotError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    let conn = Connection::open(path)?;
    conn.execute(
        "CREATE TABLE cds (
            position INTEGER PRIMARY KEY,
            id INTEGER NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL
        )",
        [],
    )?;
    Ok(conn)
}

/// Sibling path a snapshot is written to before it replaces the target.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_path_appends_suffix() {
        assert_eq!(
            staging_path(Path::new("/data/CDInventory.dat")),
            PathBuf::from("/data/CDInventory.dat.tmp")
        );
    }

    #[test]
    fn open_snapshot_does_not_create_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.dat");
        assert!(open_snapshot(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn create_snapshot_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.dat");
        fs::write(&path, b"not a database").unwrap();

        let conn = create_snapshot(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cds", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
