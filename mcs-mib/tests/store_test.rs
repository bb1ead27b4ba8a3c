use mcs_mib::{is_reserved_label, MibKind, MibRecord, MibStore};

#[test]
fn test_store_and_fetch() {
    let store = MibStore::open_in_memory().unwrap();
    let mut record = MibRecord::new(MibKind::Value, "1.1", "a7", "a7");
    record.set_text("NORMAL");
    store.store("SUMMARY", &mut record).unwrap();

    let back = store.fetch("SUMMARY").unwrap();
    assert_eq!(back.kind, MibKind::Value);
    assert_eq!(back.index, "1.1");
    assert_eq!(back.text(), "NORMAL");
    assert_eq!(back.type_store, "a7");
    assert_eq!(back.last_change, record.last_change);
}

#[test]
fn test_fetch_missing_label() {
    let store = MibStore::open_in_memory().unwrap();
    assert!(store.fetch("NOPE").is_err());
}

#[test]
fn test_store_replaces_and_bumps_last_change() {
    let store = MibStore::open_in_memory().unwrap();
    let mut record = MibRecord::new(MibKind::Value, "1.1", "a7", "a7");
    record.set_text("NORMAL");
    store.store("SUMMARY", &mut record).unwrap();
    let first = store.fetch("SUMMARY").unwrap().last_change;

    std::thread::sleep(std::time::Duration::from_millis(5));
    let mut record = store.fetch("SUMMARY").unwrap();
    record.set_text("WARNING");
    store.store("SUMMARY", &mut record).unwrap();

    let back = store.fetch("SUMMARY").unwrap();
    assert_eq!(back.text(), "WARNING");
    assert!(back.last_change > first);
}

#[test]
fn test_raw_values_preserve_interior_nuls() {
    let store = MibStore::open_in_memory().unwrap();
    let mut record = MibRecord::new(MibKind::Value, "2.4", "r8", "r8");
    record.set_bytes(&[1, 0, 2, 0, 3, 0, 4, 0]);
    store.store("TBW_RAW", &mut record).unwrap();

    let back = store.fetch("TBW_RAW").unwrap();
    assert_eq!(&back.value[..8], &[1, 0, 2, 0, 3, 0, 4, 0]);
}

#[test]
fn test_iterate_sees_every_entry() {
    let store = MibStore::open_in_memory().unwrap();
    for (label, value) in [("SUMMARY", "NORMAL"), ("SET-POINT", "70.00"), ("INFO", "-")] {
        let mut record = MibRecord::new(MibKind::Value, "1.1", "a32", "a32");
        record.set_text(value);
        store.store(label, &mut record).unwrap();
    }
    let mut labels: Vec<String> = store.iterate().unwrap().into_iter().map(|(l, _)| l).collect();
    labels.sort();
    assert_eq!(labels, ["INFO", "SET-POINT", "SUMMARY"]);
}

#[test]
fn test_open_rw_requires_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("NUX.mib");
    assert!(MibStore::open_rw(&path).is_err());
}

#[test]
fn test_on_disk_create_write_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SHL.mib");
    {
        let store = MibStore::create(&path).unwrap();
        let mut record = MibRecord::new(MibKind::Value, "2.1", "a5", "a5");
        record.set_text("70.00");
        store.store("SET-POINT", &mut record).unwrap();
    }
    let viewer = MibStore::open_ro(&path).unwrap();
    assert_eq!(viewer.fetch("SET-POINT").unwrap().text(), "70.00");
}

#[test]
fn test_reserved_labels() {
    for label in ["SUMMARY", "INFO", "LASTLOG", "SUBSYSTEM", "SERIALNO", "VERSION"] {
        assert!(is_reserved_label(label));
    }
    assert!(!is_reserved_label("SET-POINT"));
    assert!(!is_reserved_label("MCH_IP_ADDRESS"));
}
