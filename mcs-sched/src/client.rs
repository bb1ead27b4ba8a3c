//! The subsystem client: one long-lived worker per subsystem.
//!
//! Each client owns its subsystem's MIB (sole writer), a UDP socket pair
//! read from that MIB's endpoint entries, and a pending-task queue. The
//! loop pumps commands from its inbox out to the subsystem, correlates
//! responses back by reference, ages out silent tasks, and reports every
//! outcome to the executive on the central bus.

use std::net::UdpSocket;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mcs_mib::{is_reserved_label, MibStore};
use mcs_proto::{
    Clock, CommandFrame, CommandId, Envelope, MibErrorMask, Progress, ResponseFrame, ResponseKind,
    SubsystemId, Summary, Timestamp, MAX_FRAME_LEN,
};
use tracing::{debug, info, warn};

use crate::bus::{BusRx, BusTx};
use crate::config::SchedConfig;
use crate::error::{SchedError, SchedResult};
use crate::handlers;
use crate::ptq::PendingTaskQueue;

/// How long the client waits for the supervisor's handshake ping.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle yield between loop passes.
const LOOP_YIELD: Duration = Duration::from_micros(1);

pub struct SubsystemClient {
    sid: SubsystemId,
    store: MibStore,
    rx_socket: UdpSocket,
    tx_socket: UdpSocket,
    inbox: BusRx,
    upstream: BusTx,
    ptq: PendingTaskQueue,
    ptq_timeout: Duration,
    clock: Arc<dyn Clock>,
}

impl SubsystemClient {
    /// Opens the MIB, reads the subsystem's endpoint out of it, and binds
    /// the UDP socket pair. Any failure here is fatal to startup.
    pub fn connect(
        sid: SubsystemId,
        cfg: &SchedConfig,
        inbox: BusRx,
        upstream: BusTx,
        clock: Arc<dyn Clock>,
    ) -> SchedResult<SubsystemClient> {
        let store = MibStore::open_rw(&cfg.mib_store_path(sid.code()))?;
        let ip_address = store
            .fetch("MCH_IP_ADDRESS")
            .map_err(|_| SchedError::MissingEndpoint {
                sid,
                label: "MCH_IP_ADDRESS",
            })?
            .text();
        let tx_port = fetch_port(&store, sid, "MCH_TX_PORT")?;
        let rx_port = fetch_port(&store, sid, "MCH_RX_PORT")?;

        let rx_socket = UdpSocket::bind(("0.0.0.0", rx_port))?;
        rx_socket.set_nonblocking(true)?;
        let tx_socket = UdpSocket::bind(("0.0.0.0", 0))?;
        tx_socket.connect((ip_address.as_str(), tx_port))?;
        info!(%sid, %ip_address, tx_port, rx_port, "subsystem client connected");

        Ok(SubsystemClient {
            sid,
            store,
            rx_socket,
            tx_socket,
            inbox,
            upstream,
            ptq: PendingTaskQueue::new(cfg.ptq_capacity),
            ptq_timeout: cfg.ptq_timeout,
            clock,
        })
    }

    pub fn spawn(self) -> SchedResult<JoinHandle<()>> {
        let name = format!("mcic-{}", self.sid.code());
        let handle = thread::Builder::new().name(name).spawn(move || {
            let sid = self.sid;
            if let Err(e) = self.run() {
                warn!(%sid, error = %e, "subsystem client exited with error");
            }
        })?;
        Ok(handle)
    }

    fn run(mut self) -> SchedResult<()> {
        // Liveness handshake: announce, then answer the supervisor's ping
        // before entering the main loop.
        self.report(self.hello("I'm up and running"))?;
        match self.inbox.recv_timeout(HANDSHAKE_TIMEOUT)? {
            env if env.command == CommandId::Terminate => return Ok(()),
            _ => self.report(self.hello("I saw a PNG"))?,
        }

        loop {
            match self.inbox.try_recv() {
                Ok(Some(env)) => {
                    if env.command == CommandId::Terminate {
                        debug!(sid = %self.sid, "directed to shut down");
                        return Ok(());
                    }
                    self.send_command(env);
                }
                Ok(None) => {}
                // The executive dropped our inbox; nothing more will come.
                Err(_) => {
                    debug!(sid = %self.sid, "inbox closed, shutting down");
                    return Ok(());
                }
            }

            let mut buf = [0u8; MAX_FRAME_LEN];
            match self.rx_socket.recv_from(&mut buf) {
                Ok((n, _)) => self.handle_datagram(&buf[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => warn!(sid = %self.sid, error = %e, "UDP receive failed"),
            }

            let now = self.clock.now_instant();
            for (reference, command) in self.ptq.age_out(now, self.ptq_timeout) {
                debug!(sid = %self.sid, reference, "pending task timed out");
                let mut report = Envelope::new(self.sid, command);
                report.reference = reference;
                report.when = self.clock.now();
                report.progress = Progress::DonePtqTimeout;
                report.summary = Summary::Null;
                report.mib_error = MibErrorMask::OTHER;
                report.set_str_data("Timed out at subsystem");
                let _ = self.report(report);
            }

            thread::sleep(LOOP_YIELD);
        }
    }

    /// Encodes and ships one command to the subsystem, claiming a pending
    /// slot on success.
    fn send_command(&mut self, env: Envelope) {
        let (mjd, mpm) = self.clock.now().to_mjd_mpm().unwrap_or((0, 0));
        let frame = CommandFrame::from_envelope(&env, mjd, mpm);
        let (buf, len) = frame.encode();

        if let Err(e) = self.tx_socket.send(&buf[..len]) {
            warn!(sid = %self.sid, reference = env.reference, error = %e, "UDP send failed");
            let mut report = env;
            report.progress = Progress::FailClient;
            report.summary = Summary::Null;
            report.set_str_data("UDP send failed");
            let _ = self.report(report);
            return;
        }

        let claimed = self.ptq.claim(
            env.reference,
            env.command,
            self.clock.now_instant(),
            env.data,
            env.data_len,
        );
        if !claimed {
            // The command is on the wire but cannot be tracked, so its
            // response will look like an orphan and the MIB may drift.
            warn!(sid = %self.sid, reference = env.reference, "pending task queue full");
            let mut report = env;
            report.progress = Progress::FailClient;
            report.summary = Summary::Null;
            report.mib_error = MibErrorMask::REF_UNKNOWN;
            report.set_str_data("Pending task queue full");
            let _ = self.report(report);
        }
    }

    /// Parses one inbound datagram, updates the MIB, and reports progress
    /// upstream.
    fn handle_datagram(&mut self, raw: &[u8]) {
        let frame = match ResponseFrame::parse(raw) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(sid = %self.sid, error = %e, "dropping unparseable datagram");
                return;
            }
        };

        let progress = frame.kind.progress();
        let mut mask = MibErrorMask::empty();
        let cmdata = match self.ptq.take(frame.reference) {
            Some(pending) => pending.as_str(),
            None => {
                info!(sid = %self.sid, reference = frame.reference, "response reference not pending");
                mask |= MibErrorMask::REF_UNKNOWN;
                String::new()
            }
        };

        // DP report payloads for non-reserved labels are raw binary; keep
        // the significant byte count instead of treating them as text.
        let data_len = if self.sid == SubsystemId::Dp
            && frame.command == CommandId::Rpt
            && frame.kind != ResponseKind::Rejected
            && !is_reserved_label(&cmdata)
        {
            frame.comment_len as i16
        } else {
            -1
        };

        mask |= handlers::apply_response(
            &self.store,
            self.sid,
            frame.command,
            progress,
            frame.summary,
            frame.comment_bytes(),
            data_len,
            &cmdata,
        );

        let mut report = Envelope::new(self.sid, frame.command);
        report.reference = frame.reference;
        report.when = Timestamp::from_mjd_mpm(frame.mjd, frame.mpm).unwrap_or(self.clock.now());
        report.progress = progress;
        report.summary = frame.summary;
        report.mib_error = mask;
        report.data = frame.comment;
        report.data_len = data_len;
        let _ = self.report(report);
    }

    fn hello(&self, text: &str) -> Envelope {
        let mut env = Envelope::new(self.sid, CommandId::Png);
        env.when = self.clock.now();
        env.set_str_data(text);
        env
    }

    fn report(&self, env: Envelope) -> SchedResult<()> {
        self.upstream.send(env).map_err(|e| {
            warn!(sid = %self.sid, error = %e, "could not report to executive");
            e
        })
    }
}

fn fetch_port(store: &MibStore, sid: SubsystemId, label: &'static str) -> SchedResult<u16> {
    store
        .fetch(label)
        .ok()
        .and_then(|record| record.text().trim().parse().ok())
        .ok_or(SchedError::MissingEndpoint { sid, label })
}
