use std::fs;

use cd_inventory::{
    load_snapshot, save_snapshot, DeleteOutcome, Inventory, LoadStatus, Record, Session,
};
use tempfile::TempDir;

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CDInventory.dat");
    (dir, path)
}

#[test]
fn test_full_session_survives_restart() {
    let (_dir, path) = setup();

    let (mut session, status) = Session::open(&path);
    assert!(matches!(status, LoadStatus::Missing));

    session.add("Abbey Road", "The Beatles");
    session.add("Rumours", "Fleetwood Mac");
    session.add("Blue", "Joni Mitchell");
    assert_eq!(
        session.delete(2),
        DeleteOutcome::Deleted(Record::new(2, "Rumours", "Fleetwood Mac"))
    );
    session.save().unwrap();

    let (mut reopened, status) = Session::open(&path);
    assert!(matches!(status, LoadStatus::Loaded(2)));
    assert_eq!(
        reopened.records(),
        &[
            Record::new(1, "Abbey Road", "The Beatles"),
            Record::new(3, "Blue", "Joni Mitchell"),
        ]
    );

    let (added, anomaly) = reopened.add("Hunky Dory", "David Bowie");
    assert_eq!(added.id, 4);
    assert!(anomaly.is_none());
}

#[test]
fn test_snapshot_round_trip_through_public_api() {
    let (_dir, path) = setup();
    let mut inventory = Inventory::new();
    inventory.add("X", "Y");
    inventory.add("A", "B");

    save_snapshot(&path, inventory.records()).unwrap();
    let outcome = load_snapshot(&path);

    assert_eq!(Inventory::from_records(outcome.records), inventory);
}

#[test]
fn test_corrupt_snapshot_does_not_end_session() {
    let (_dir, path) = setup();
    fs::write(&path, vec![0xAB; 4096]).unwrap();

    let (mut session, status) = Session::open(&path);
    assert!(matches!(status, LoadStatus::Unreadable(_)));
    assert!(session.records().is_empty());

    session.add("Fresh", "Start");
    session.save().unwrap();
    assert_eq!(load_snapshot(&path).records, vec![Record::new(1, "Fresh", "Start")]);
}
