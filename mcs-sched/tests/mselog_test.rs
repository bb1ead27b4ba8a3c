use std::fs;
use std::sync::Arc;
use std::time::Instant;

use chrono::{TimeZone, Utc};
use mcs_proto::{CommandId, ManualClock, Progress, SubsystemId, Timestamp};
use mcs_sched::TaskLog;

fn clock_at_known_time() -> Arc<ManualClock> {
    let dt = Utc.with_ymd_and_hms(2009, 8, 25, 12, 34, 56).unwrap();
    let ts = Timestamp {
        micros: 789_000,
        ..Timestamp::from_utc(dt)
    };
    Arc::new(ManualClock::new(Instant::now(), ts))
}

#[test]
fn test_task_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mselog.txt");
    let mut log = TaskLog::create(&path, clock_at_known_time()).unwrap();

    log.task(
        42,
        Progress::Success,
        SubsystemId::Shl,
        CommandId::Png,
        b"A-OK\0",
        -1,
    );

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "090825 12:34:56 55068 45296789 T        42 3 SHL PNG A-OK|\n"
    );
}

#[test]
fn test_info_line_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mselog.txt");
    let mut log = TaskLog::create(&path, clock_at_known_time()).unwrap();

    log.info("Starting shutdown...");

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "090825 12:34:56 55068 45296789 N Starting shutdown...\n"
    );
}

#[test]
fn test_raw_payload_renders_as_uppercase_hex() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mselog.txt");
    let mut log = TaskLog::create(&path, clock_at_known_time()).unwrap();

    log.task(
        7,
        Progress::Success,
        SubsystemId::Dp,
        CommandId::Rpt,
        &[0xDE, 0xAD, 0x00, 0xBE],
        4,
    );

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(" T         7 3 DP_ RPT DEAD00BE|"), "{text}");
}

#[test]
fn test_oversized_raw_payload_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mselog.txt");
    let mut log = TaskLog::create(&path, clock_at_known_time()).unwrap();

    let raw = [0xAB; 200];
    log.task(1, Progress::Success, SubsystemId::Dp, CommandId::Rpt, &raw, 200);

    let text = fs::read_to_string(&path).unwrap();
    let comment = text
        .trim_end()
        .rsplit(' ')
        .next()
        .unwrap()
        .trim_end_matches('|');
    assert_eq!(comment.len(), 90);
}

#[test]
fn test_create_clobbers_existing_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mselog.txt");
    fs::write(&path, "old contents\n").unwrap();

    let mut log = TaskLog::create(&path, clock_at_known_time()).unwrap();
    log.info("fresh");

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("old contents"));
}
