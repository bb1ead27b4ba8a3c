use mcs_proto::{
    CommandId, Envelope, MibErrorMask, Progress, Summary, SubsystemId, Timestamp,
    ENVELOPE_WIRE_LEN,
};

#[test]
fn test_envelope_binary_round_trip() {
    let mut env = Envelope::new(SubsystemId::Asp, CommandId::Fil);
    env.reference = 999_999_999;
    env.scheduled = true;
    env.when = Timestamp {
        secs: 1_756_000_000,
        micros: 250_000,
    };
    env.progress = Progress::Queued;
    env.summary = Summary::Booting;
    env.mib_error = MibErrorMask::REF_UNKNOWN | MibErrorMask::OTHER;
    env.set_str_data("00103");

    let bytes = env.to_bytes();
    assert_eq!(bytes.len(), ENVELOPE_WIRE_LEN);
    let back = Envelope::from_bytes(&bytes).unwrap();
    assert_eq!(back, env);
}

#[test]
fn test_raw_data_round_trip_preserves_length() {
    let mut env = Envelope::new(SubsystemId::Dp, CommandId::Tbn);
    // Raw payload with interior NULs; data_len is what keeps it intact.
    env.set_raw_data(&[1, 0, 2, 0, 3]);
    let back = Envelope::from_bytes(&env.to_bytes()).unwrap();
    assert_eq!(back.data_len, 5);
    assert_eq!(back.data_bytes(), &[1, 0, 2, 0, 3]);
}

#[test]
fn test_string_data_helpers() {
    let mut env = Envelope::new(SubsystemId::Shl, CommandId::Rpt);
    env.set_str_data("SET-POINT");
    assert_eq!(env.data_len, -1);
    assert_eq!(env.data_bytes(), b"SET-POINT");
    assert_eq!(env.data_str(), "SET-POINT");

    // Oversized strings truncate and keep the trailing NUL.
    let long = "x".repeat(400);
    env.set_str_data(&long);
    assert_eq!(env.data_bytes().len(), 255);
}

#[test]
fn test_bad_length_is_rejected() {
    let env = Envelope::new(SubsystemId::Nu1, CommandId::Png);
    let bytes = env.to_bytes();
    assert!(Envelope::from_bytes(&bytes[..bytes.len() - 1]).is_err());
}

#[test]
fn test_unknown_destination_is_rejected() {
    let env = Envelope::new(SubsystemId::Nu1, CommandId::Png);
    let mut bytes = env.to_bytes();
    bytes[0] = 0xFF;
    bytes[1] = 0xFF;
    assert!(Envelope::from_bytes(&bytes).is_err());
}
