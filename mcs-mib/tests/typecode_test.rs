use mcs_mib::TypeCode;

#[test]
fn test_parse_codes() {
    assert_eq!(TypeCode::parse("NUL").unwrap(), TypeCode::Nul);
    assert_eq!(TypeCode::parse("a15").unwrap(), TypeCode::Ascii(15));
    assert_eq!(TypeCode::parse("r1024").unwrap(), TypeCode::Raw(1024));
    assert_eq!(TypeCode::parse("r256").unwrap(), TypeCode::Raw(256));
    assert_eq!(TypeCode::parse("i1u").unwrap(), TypeCode::U8);
    assert_eq!(TypeCode::parse("i2u").unwrap(), TypeCode::U16);
    assert_eq!(TypeCode::parse("i4u").unwrap(), TypeCode::U32);
    assert_eq!(TypeCode::parse("f4").unwrap(), TypeCode::F32);
    assert!(TypeCode::parse("a0").is_err());
    assert!(TypeCode::parse("q9").is_err());
    assert!(TypeCode::parse("").is_err());
}

#[test]
fn test_format_round_trip() {
    for code in [
        TypeCode::Nul,
        TypeCode::Ascii(3),
        TypeCode::Raw(64),
        TypeCode::U8,
        TypeCode::U16,
        TypeCode::U32,
        TypeCode::F32,
    ] {
        assert_eq!(TypeCode::parse(&code.format()).unwrap(), code);
    }
}

#[test]
fn test_numeric_values_are_big_endian() {
    let buf = TypeCode::U16.encode_value("513").unwrap();
    assert_eq!(&buf[..2], &[0x02, 0x01]);

    let buf = TypeCode::U32.encode_value("16909060").unwrap();
    assert_eq!(&buf[..4], &[0x01, 0x02, 0x03, 0x04]);

    let buf = TypeCode::U8.encode_value("200").unwrap();
    assert_eq!(buf[0], 200);

    let buf = TypeCode::F32.encode_value("1.0").unwrap();
    assert_eq!(&buf[..4], &1.0f32.to_be_bytes());
}

#[test]
fn test_decode_round_trip() {
    let buf = TypeCode::U32.encode_value("4294967295").unwrap();
    assert_eq!(TypeCode::U32.decode_value(&buf), "4294967295");

    let buf = TypeCode::Ascii(9).encode_value("SET-POINT").unwrap();
    assert_eq!(TypeCode::Ascii(9).decode_value(&buf), "SET-POINT");

    let buf = TypeCode::Raw(16).encode_value("ignored").unwrap();
    assert_eq!(TypeCode::Raw(16).decode_value(&buf), "@...");

    let buf = TypeCode::Nul.encode_value("whatever").unwrap();
    assert_eq!(TypeCode::Nul.decode_value(&buf), "NUL");
}

#[test]
fn test_bad_numeric_text_is_rejected() {
    assert!(TypeCode::U8.encode_value("256").is_err());
    assert!(TypeCode::U16.encode_value("65536").is_err());
    assert!(TypeCode::U32.encode_value("-1").is_err());
    assert!(TypeCode::F32.encode_value("not-a-float").is_err());
}
