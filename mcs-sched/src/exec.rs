//! The executive: central task-queue server.
//!
//! A single cooperative loop that accepts externally injected commands on a
//! loopback stream socket, assigns references, queues tasks into the ring,
//! dispatches them to the subsystem clients' buses, correlates progress
//! reports back by reference, ages out silent tasks, and logs every
//! transition. On SHT it queues one terminate task per live client, lets
//! everything drain or age out, and exits once the ring is idle.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use mcs_proto::{
    Clock, CommandId, Envelope, Progress, SubsystemId, Summary, ENVELOPE_WIRE_LEN, MAX_REFERENCE,
};
use tracing::{debug, info, warn};

use crate::bus::{BusRx, BusTx};
use crate::config::SchedConfig;
use crate::error::SchedResult;
use crate::mselog::TaskLog;
use crate::ring::TaskRing;

/// Idle yield between loop passes.
const LOOP_YIELD: Duration = Duration::from_micros(1);

/// How long an injector may dribble its envelope in before the connection
/// is dropped.
const INJECT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// An accepted injector connection whose fixed-size envelope has not fully
/// arrived yet. The read is resumed a little at a time, one loop pass per
/// attempt, so a stalled injector never blocks the executive.
struct PendingInjection {
    stream: TcpStream,
    buf: [u8; ENVELOPE_WIRE_LEN],
    filled: usize,
    accepted_at: Instant,
}

pub struct Executive {
    cfg: SchedConfig,
    listener: TcpListener,
    inbox: BusRx,
    clients: Vec<(SubsystemId, BusTx)>,
    handles: Vec<(SubsystemId, JoinHandle<()>)>,
    ring: TaskRing,
    pending: Option<PendingInjection>,
    last_reference: u32,
    summary: Summary,
    log: TaskLog,
    clock: Arc<dyn Clock>,
}

impl Executive {
    pub fn new(
        cfg: SchedConfig,
        inbox: BusRx,
        clients: Vec<(SubsystemId, BusTx)>,
        handles: Vec<(SubsystemId, JoinHandle<()>)>,
        clock: Arc<dyn Clock>,
    ) -> SchedResult<Executive> {
        cfg.validate()?;
        let mut log = TaskLog::create(&cfg.log_path, clock.clone())?;
        log.info("MCS executive starting");
        log.info(&format!("Added subsystem {}", SubsystemId::Mcs));
        for (sid, _) in &clients {
            log.info(&format!("Added subsystem {sid}"));
        }

        let listener = TcpListener::bind(cfg.listen_addr)?;
        listener.set_nonblocking(true)?;
        info!(addr = %cfg.listen_addr, "executive listening");

        let ring = TaskRing::new(cfg.ring_capacity);
        Ok(Executive {
            cfg,
            listener,
            inbox,
            clients,
            handles,
            ring,
            pending: None,
            last_reference: 0,
            summary: Summary::Normal,
            log,
            clock,
        })
    }

    /// Runs until an orderly SHT has fully drained, then removes every bus
    /// endpoint and joins the client threads.
    pub fn run(mut self) -> SchedResult<()> {
        loop {
            self.drain_progress();
            self.accept_injection();
            self.dispatch_one();
            self.age_out();

            if self.summary == Summary::Shutdwn && self.ring.is_idle() {
                break;
            }
            thread::sleep(LOOP_YIELD);
        }

        drop(self.listener);
        for (sid, _) in &self.clients {
            self.log.info(&format!("Removing bus for {sid}"));
        }
        self.clients.clear();
        for (sid, handle) in self.handles {
            if handle.join().is_err() {
                self.log.info(&format!("Client for {sid} panicked"));
            }
        }
        self.log.info("Executive shutdown complete");
        Ok(())
    }

    /// Drains one progress envelope from the central bus.
    fn drain_progress(&mut self) {
        // A closed central bus just means every client is gone; the loop can
        // still serve MCS commands.
        let Ok(Some(report)) = self.inbox.try_recv() else {
            return;
        };
        match self.ring.complete_by_reference(report.reference) {
            Some(slot) => {
                // The ring slot names what was actually dispatched; reports
                // for timed-out tasks cannot always reconstruct it.
                self.log.task(
                    report.reference,
                    report.progress,
                    slot.envelope.dest,
                    slot.envelope.command,
                    &report.data,
                    report.data_len,
                );
                if !report.mib_error.is_empty() {
                    self.log.info(&format!(
                        "Previous task: MIB error mask = {}",
                        report.mib_error.bits()
                    ));
                }
            }
            None => {
                self.log.info(&format!(
                    "Client used an unrecognized REF: {} (ignoring it)",
                    report.reference
                ));
            }
        }
    }

    /// Accepts at most one injector connection per pass (one envelope in,
    /// one reply out, close) and pumps whatever connection is mid-read.
    /// Nothing here blocks.
    fn accept_injection(&mut self) {
        if self.pending.is_none() {
            match self.listener.accept() {
                Ok((stream, _)) => {
                    if let Err(e) = stream.set_nonblocking(true) {
                        warn!(error = %e, "could not make injector stream nonblocking");
                        return;
                    }
                    self.pending = Some(PendingInjection {
                        stream,
                        buf: [0u8; ENVELOPE_WIRE_LEN],
                        filled: 0,
                        accepted_at: self.clock.now_instant(),
                    });
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                Err(e) => warn!(error = %e, "accept failed"),
            }
        }
        self.pump_injection();
    }

    /// Advances the in-flight envelope read without blocking; the connection
    /// is dropped if the injector goes quiet or dribbles past the deadline.
    fn pump_injection(&mut self) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };
        loop {
            match pending.stream.read(&mut pending.buf[pending.filled..]) {
                Ok(0) => {
                    warn!("injector closed before sending a full envelope");
                    return;
                }
                Ok(n) => {
                    pending.filled += n;
                    if pending.filled == ENVELOPE_WIRE_LEN {
                        let PendingInjection { mut stream, buf, .. } = pending;
                        self.handle_injection(&buf, &mut stream);
                        return;
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    let waited = self
                        .clock
                        .now_instant()
                        .saturating_duration_since(pending.accepted_at);
                    if waited >= INJECT_READ_TIMEOUT {
                        warn!("injector stalled mid-envelope; dropping connection");
                    } else {
                        self.pending = Some(pending);
                    }
                    return;
                }
                Err(e) => {
                    warn!(error = %e, "injector read failed");
                    return;
                }
            }
        }
    }

    /// Validates and executes one fully-read injected envelope.
    fn handle_injection(&mut self, buf: &[u8; ENVELOPE_WIRE_LEN], stream: &mut TcpStream) {
        let mut env = match Envelope::from_bytes(buf) {
            Ok(env) => env,
            Err(e) => {
                warn!(error = %e, "malformed injection");
                let mut reply = Envelope::new(SubsystemId::Mcs, CommandId::Png);
                reply.progress = Progress::FailExec;
                reply.summary = self.summary;
                reply.set_str_data("Malformed command envelope");
                send_reply(stream, &reply);
                return;
            }
        };

        let registered = env.dest == SubsystemId::Mcs
            || self.clients.iter().any(|(sid, _)| *sid == env.dest);

        if !registered || self.summary == Summary::Shutdwn {
            env.reference = 0;
            env.progress = Progress::FailExec;
            env.summary = self.summary;
            env.set_str_data("Invalid destination or shutting down");
            self.log
                .task(0, Progress::FailExec, env.dest, env.command, &env.data, -1);
            send_reply(stream, &env);
            return;
        }

        if env.dest == SubsystemId::Mcs {
            let reply = self.handle_mcs_command(env);
            send_reply(stream, &reply);
            return;
        }

        if env.scheduled {
            // The scheduled-at fields are carried but not honored.
            self.log.info(&format!(
                "Scheduled execution not supported; running {} {} as time permits",
                env.dest, env.command
            ));
        }

        if self.ring.is_full() {
            env.reference = 0;
            env.progress = Progress::FailExec;
            env.summary = Summary::Null;
            env.set_str_data("Task queue full");
            self.log
                .task(0, Progress::FailExec, env.dest, env.command, &env.data, -1);
            send_reply(stream, &env);
            return;
        }

        env.reference = self.next_reference();
        if self.ring.insert(env.clone()).is_none() {
            // Cannot happen after the fullness check; keep the reply honest
            // anyway.
            warn!("ring rejected insert after fullness check");
            return;
        }
        self.log.task(
            env.reference,
            Progress::Queued,
            env.dest,
            env.command,
            &env.data,
            env.data_len,
        );

        env.progress = Progress::Queued;
        env.summary = Summary::Null;
        env.set_str_data("Task has been queued");
        send_reply(stream, &env);
    }

    /// Commands addressed to the scheduler itself execute immediately and
    /// never enter the ring.
    fn handle_mcs_command(&mut self, mut env: Envelope) -> Envelope {
        env.reference = 0;
        env.when = self.clock.now();
        match env.command {
            CommandId::Sht => {
                self.summary = Summary::Shutdwn;
                self.log.info("Starting shutdown...");

                let sids: Vec<SubsystemId> = self.clients.iter().map(|(sid, _)| *sid).collect();
                for sid in sids {
                    let reference = self.next_reference();
                    let mut task = Envelope::new(sid, CommandId::Terminate);
                    task.reference = reference;
                    task.when = env.when;
                    task.set_str_data("Request client shutdown");
                    match self.ring.insert(task.clone()) {
                        Some(_) => self.log.task(
                            reference,
                            Progress::Queued,
                            sid,
                            CommandId::Terminate,
                            &task.data,
                            -1,
                        ),
                        None => self.log.info("Task queue full"),
                    }
                }

                env.progress = Progress::Queued;
                env.summary = Summary::Shutdwn;
                env.set_str_data("Starting shutdown");
            }
            _ => {
                self.log.info("Unimplemented MCS command; no action taken");
                env.progress = Progress::Queued;
                env.summary = self.summary;
                env.set_str_data("Unimplemented MCS command");
            }
        }
        env
    }

    /// Advances the circular dispatch cursor and posts one queued task to
    /// its client's bus.
    fn dispatch_one(&mut self) {
        let Some(idx) = self.ring.dispatch_next() else {
            return;
        };
        let Some(task) = self.ring.get(idx).map(|slot| slot.envelope.clone()) else {
            return;
        };

        let tx = self
            .clients
            .iter()
            .find(|(sid, _)| *sid == task.dest)
            .map(|(_, tx)| tx.clone());
        let posted = match tx {
            Some(tx) => tx.send(task.clone()),
            None => Err(crate::error::SchedError::BusClosed(task.dest)),
        };

        match posted {
            Ok(()) => {
                self.ring.mark_sent(idx, self.clock.now_instant());
                self.log.task(
                    task.reference,
                    Progress::Sent,
                    task.dest,
                    task.command,
                    &task.data,
                    task.data_len,
                );
            }
            Err(e) => {
                debug!(error = %e, reference = task.reference, "bus post failed");
                self.ring.release(idx);
                self.log.task(
                    task.reference,
                    Progress::FailExec,
                    task.dest,
                    task.command,
                    &task.data,
                    task.data_len,
                );
            }
        }
    }

    /// Ages out `Sent` slots. The timeout is strictly longer than the
    /// clients' pending-task timeout, so a live client always reports first
    /// and this only fires for dead ones.
    fn age_out(&mut self) {
        let now = self.clock.now_instant();
        for env in self.ring.age_out(now, self.cfg.sent_timeout) {
            self.log.task(
                env.reference,
                Progress::FailClient,
                env.dest,
                env.command,
                b"Timed out at client",
                -1,
            );
        }
    }

    fn next_reference(&mut self) -> u32 {
        self.last_reference = if self.last_reference >= MAX_REFERENCE {
            1
        } else {
            self.last_reference + 1
        };
        self.last_reference
    }
}

fn send_reply(stream: &mut TcpStream, env: &Envelope) {
    if let Err(e) = stream.write_all(&env.to_bytes()) {
        warn!(error = %e, "could not reply to injector");
    }
}
