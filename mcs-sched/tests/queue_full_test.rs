//! Ring overflow policy: a full task ring is a FAIL_EXEC reply to the
//! injector, never a block.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{free_udp_port, inject, test_config, write_mib_dat};
use mcs_proto::{CommandId, Progress, SubsystemId, SystemClock};
use mcs_sched::Supervisor;

#[test]
fn test_full_ring_rejects_with_fail_exec() {
    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(dir.path());
    cfg.ring_capacity = 1;
    // Keep the lone slot occupied long enough to observe the overflow.
    cfg.ptq_timeout = Duration::from_secs(2);
    cfg.sent_timeout = Duration::from_secs(3);
    let addr = cfg.listen_addr;

    let tx_port = free_udp_port();
    let rx_port = free_udp_port();
    write_mib_dat(dir.path(), "NU1", "");

    let script = format!("mibinit NU1 127.0.0.1 {tx_port} {rx_port}\nmcic NU1\n");
    let executive = Supervisor::new(cfg, Arc::new(SystemClock))
        .start(&script)
        .unwrap();
    let exec_thread = std::thread::spawn(move || executive.run());

    // First command occupies the only slot (the subsystem is silent, so it
    // stays SENT until the client's timeout).
    let first = inject(addr, SubsystemId::Nu1, CommandId::Png, "");
    assert_eq!(first.progress, Progress::Queued);

    let second = inject(addr, SubsystemId::Nu1, CommandId::Png, "");
    assert_eq!(second.progress, Progress::FailExec);
    assert_eq!(second.reference, 0);
    assert_eq!(second.data_str(), "Task queue full");

    // Shutdown still drains: the occupied slot resolves via the client's
    // timeout report, after which the executive exits.
    inject(addr, SubsystemId::Mcs, CommandId::Sht, "");
    exec_thread.join().unwrap().unwrap();
}
