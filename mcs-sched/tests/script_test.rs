use mcs_proto::SubsystemId;
use mcs_sched::script::{parse, Directive};

#[test]
fn test_parses_directives_in_order() {
    let text = "\
# bring up the shelter
mibinit SHL 127.0.0.1 1738 1739
mcic SHL

mibinit NU1 127.0.0.1 1740 1741
mcic NU1
";
    let directives = parse(text).unwrap();
    assert_eq!(directives.len(), 4);
    assert_eq!(
        directives[0],
        Directive::MibInit {
            code: "SHL".to_owned(),
            ip_address: "127.0.0.1".to_owned(),
            tx_port: 1738,
            rx_port: 1739,
        }
    );
    assert_eq!(
        directives[1],
        Directive::Client {
            sid: SubsystemId::Shl
        }
    );
    assert_eq!(
        directives[3],
        Directive::Client {
            sid: SubsystemId::Nu1
        }
    );
}

#[test]
fn test_blank_and_comment_lines_are_skipped() {
    let text = "\n   \n# mcic SHL\n#mcic SHL\n";
    assert!(parse(text).unwrap().is_empty());
}

#[test]
fn test_unknown_directives_are_skipped() {
    let text = "frobnicate SHL\nmcic SHL\n";
    let directives = parse(text).unwrap();
    assert_eq!(directives.len(), 1);
}

#[test]
fn test_malformed_mibinit_is_fatal() {
    let err = parse("mibinit SHL 127.0.0.1 1738\n").unwrap_err();
    assert!(err.to_string().contains("line 1"), "{err}");

    let err = parse("mcic SHL\nmibinit SHL 127.0.0.1 notaport 1739\n").unwrap_err();
    assert!(err.to_string().contains("line 2"), "{err}");
}

#[test]
fn test_unknown_subsystem_code_is_fatal() {
    assert!(parse("mcic XYZ\n").is_err());
}
