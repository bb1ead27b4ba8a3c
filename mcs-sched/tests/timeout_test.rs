//! Timeout ordering: a silent subsystem is reported by its client's
//! pending-task timeout first; the executive's own sent-task age-out never
//! fires for the same reference.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{free_udp_port, inject, test_config, wait_for_log, write_mib_dat};
use mcs_proto::{CommandId, Progress, SubsystemId, SystemClock};
use mcs_sched::Supervisor;

#[test]
fn test_silent_subsystem_times_out_at_client_first() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = test_config(dir.path());
    let addr = cfg.listen_addr;
    let log_path = cfg.log_path.clone();
    let sent_timeout = cfg.sent_timeout;

    // No mock responder: NU1 stays silent. The UDP send itself still lands.
    let tx_port = free_udp_port();
    let rx_port = free_udp_port();
    write_mib_dat(dir.path(), "NU1", "");

    let script = format!("mibinit NU1 127.0.0.1 {tx_port} {rx_port}\nmcic NU1\n");
    let executive = Supervisor::new(cfg, Arc::new(SystemClock))
        .start(&script)
        .unwrap();
    let exec_thread = std::thread::spawn(move || executive.run());

    let reply = inject(addr, SubsystemId::Nu1, CommandId::Png, "");
    assert_eq!(reply.progress, Progress::Queued);
    let reference = reply.reference;

    // The client's pending-task timeout reports the task done, under the
    // command type that actually timed out.
    let log = wait_for_log(&log_path, Duration::from_secs(5), |log| {
        log.contains(&format!("{reference} 8 NU1 PNG"))
    });
    assert!(log.contains("Timed out at subsystem"), "{log}");

    // Give the executive's own timeout a chance to fire; the slot was
    // already freed by the client's report, so no duplicate FAIL_CLIENT
    // line may appear for this reference.
    std::thread::sleep(sent_timeout + Duration::from_millis(200));
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(
        !log.contains(&format!("{reference} 5 NU1")),
        "duplicate age-out for {reference}:\n{log}"
    );
    // The timeout report carries the OTHER diagnostic bit.
    assert!(log.contains("MIB error mask = 64"), "{log}");

    inject(addr, SubsystemId::Mcs, CommandId::Sht, "");
    exec_thread.join().unwrap().unwrap();
}
