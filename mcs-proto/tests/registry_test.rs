use mcs_proto::{CommandId, Progress, Summary, SubsystemId};

#[test]
fn test_subsystem_codes_round_trip() {
    for sid in SubsystemId::ALL {
        assert_eq!(SubsystemId::from_code(sid.code()).unwrap(), sid);
        assert_eq!(SubsystemId::from_id(sid.id()).unwrap(), sid);
        assert_eq!(sid.code().len(), 3);
    }
}

#[test]
fn test_subsystem_ids_are_unique_and_positive() {
    let mut ids: Vec<u16> = SubsystemId::ALL.iter().map(|s| s.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), SubsystemId::ALL.len());
    assert!(ids.iter().all(|&id| id > 0));
}

#[test]
fn test_mock_subsystems() {
    assert!(SubsystemId::Nu1.is_mock());
    assert!(SubsystemId::Nu9.is_mock());
    assert!(!SubsystemId::Mcs.is_mock());
    assert!(!SubsystemId::Shl.is_mock());
}

#[test]
fn test_unknown_subsystem_code_is_rejected() {
    assert!(SubsystemId::from_code("XXX").is_err());
    assert!(SubsystemId::from_id(0).is_err());
    assert!(SubsystemId::from_id(14).is_err());
}

#[test]
fn test_command_codes_round_trip() {
    for id in 1..=20 {
        let cmd = CommandId::from_id(id).unwrap();
        assert_eq!(CommandId::from_code(cmd.code()).unwrap(), cmd);
    }
}

#[test]
fn test_terminate_is_internal_only() {
    // Terminate renders as SHT on the wire but SHT parses to the real
    // shutdown command, never the internal terminate signal.
    assert_eq!(CommandId::Terminate.code(), "SHT");
    assert_eq!(CommandId::from_code("SHT").unwrap(), CommandId::Sht);
    assert_eq!(CommandId::from_id(0).unwrap(), CommandId::Terminate);
}

#[test]
fn test_summary_token_parsing() {
    assert_eq!(Summary::from_token("NORMAL "), Summary::Normal);
    assert_eq!(Summary::from_token("  WARNING"), Summary::Warning);
    assert_eq!(Summary::from_token("SHUTDWN"), Summary::Shutdwn);
    assert_eq!(Summary::from_token("GIBBER "), Summary::Null);
    assert_eq!(Summary::from_token(""), Summary::Null);
}

#[test]
fn test_progress_digits() {
    assert_eq!(Progress::Avail.digit(), '0');
    assert_eq!(Progress::Queued.digit(), '1');
    assert_eq!(Progress::DonePtqTimeout.digit(), '8');
    assert!(!Progress::Queued.is_terminal());
    assert!(!Progress::Sent.is_terminal());
    assert!(Progress::Success.is_terminal());
    assert!(Progress::DonePtqTimeout.is_terminal());
}
