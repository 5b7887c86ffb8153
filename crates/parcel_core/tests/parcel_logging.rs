use parcel_core::db::open_db_in_memory;
use parcel_core::{logging_status, ParcelService, ServiceError, SqliteParcelStore, TrackerConfig};
use std::fs;
use std::path::Path;

const ADDRESS_MARKER: &str = "Kastanienallee 77 Hinterhaus";

// Logging is process-wide, so this file holds a single test.
#[test]
fn workflow_logs_never_contain_addresses() {
    TrackerConfig::default().init_logging().unwrap();
    assert!(logging_status().is_none());

    let log_dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig {
        log_level: "trace",
        log_dir: Some(log_dir.path().to_path_buf()),
        ..TrackerConfig::default()
    };
    config.init_logging().unwrap();
    assert_eq!(logging_status().unwrap().0, "trace");

    let conn = open_db_in_memory().unwrap();
    let service = ParcelService::new(SqliteParcelStore::try_new(&conn).unwrap());

    let number = service
        .register(1000, format!("{ADDRESS_MARKER} registered"))
        .unwrap()
        .number;
    service
        .change_address(number, &format!("{ADDRESS_MARKER} changed"))
        .unwrap();
    service.dispatch(number).unwrap();
    let err = service
        .change_address(number, &format!("{ADDRESS_MARKER} rejected"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::AddressLocked { .. }));

    log::logger().flush();

    let contents = read_log_files(log_dir.path());
    assert!(contents.contains("event=parcel_register"), "logs: {contents}");
    assert!(contents.contains("event=parcel_transition"), "logs: {contents}");
    assert!(contents.contains("status=rejected"), "logs: {contents}");
    assert!(!contents.contains(ADDRESS_MARKER), "address leaked: {contents}");
}

fn read_log_files(dir: &Path) -> String {
    let mut contents = String::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_file() {
            contents.push_str(&fs::read_to_string(&path).unwrap());
        }
    }
    contents
}
