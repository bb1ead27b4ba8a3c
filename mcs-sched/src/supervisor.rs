//! Startup supervisor.
//!
//! Walks the init script in order: builds MIB stores (`mibinit`), spawns one
//! subsystem client per `mcic` directive with a liveness handshake over the
//! central bus, then hands the registered client list to the executive.

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use mcs_mib::init_from_text;
use mcs_proto::{Clock, CommandId, Envelope, SubsystemId, SystemClock};
use tracing::{info, warn};

use crate::bus::{self, BusTx};
use crate::client::SubsystemClient;
use crate::config::SchedConfig;
use crate::error::{SchedError, SchedResult};
use crate::exec::Executive;
use crate::script::{self, Directive};

/// How long to wait for each half of a client's liveness handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct Supervisor {
    cfg: SchedConfig,
    clock: Arc<dyn Clock>,
}

impl Supervisor {
    pub fn new(cfg: SchedConfig, clock: Arc<dyn Clock>) -> Supervisor {
        Supervisor { cfg, clock }
    }

    /// Executes the init script and returns the ready-to-run executive.
    /// Any failure here aborts startup.
    pub fn start(self, script_text: &str) -> SchedResult<Executive> {
        self.cfg.validate()?;
        let directives = script::parse(script_text)?;

        let (central_tx, central_rx) = bus::bounded(SubsystemId::Mcs, self.cfg.bus_depth);
        let mut clients: Vec<(SubsystemId, BusTx)> = Vec::new();
        let mut handles: Vec<(SubsystemId, JoinHandle<()>)> = Vec::new();

        for directive in directives {
            match directive {
                Directive::MibInit {
                    code,
                    ip_address,
                    tx_port,
                    rx_port,
                } => {
                    let entries = init_from_text(
                        &self.cfg.mib_init_path(&code),
                        &self.cfg.mib_store_path(&code),
                        &ip_address,
                        tx_port,
                        rx_port,
                    )?;
                    info!(%code, entries, "MIB store built");
                }
                Directive::Client { sid } => {
                    let (client_tx, client_rx) = bus::bounded(sid, self.cfg.bus_depth);
                    let client = SubsystemClient::connect(
                        sid,
                        &self.cfg,
                        client_rx,
                        central_tx.clone(),
                        self.clock.clone(),
                    )?;
                    let handle = client.spawn()?;

                    // Wait for the client's hello, ping it, wait for the
                    // reply. Both halves run before the executive exists, so
                    // the central bus carries only handshake traffic.
                    wait_for_hello(&central_rx, sid)?;
                    let mut ping = Envelope::new(sid, CommandId::Png);
                    ping.when = self.clock.now();
                    ping.set_str_data("ping!");
                    client_tx.send(ping)?;
                    wait_for_hello(&central_rx, sid)?;
                    info!(%sid, "subsystem client is live");

                    clients.push((sid, client_tx));
                    handles.push((sid, handle));
                }
            }
        }

        info!("init script complete, handing off to executive");
        Executive::new(self.cfg, central_rx, clients, handles, self.clock)
    }
}

fn wait_for_hello(central_rx: &crate::bus::BusRx, sid: SubsystemId) -> SchedResult<()> {
    // Bounded scan: tolerate stray reports from already-running clients
    // without waiting forever.
    for _ in 0..64 {
        let env = central_rx
            .recv_timeout(HANDSHAKE_TIMEOUT)
            .map_err(|_| SchedError::HandshakeTimeout(sid))?;
        if env.dest == sid && env.reference == 0 && env.command == CommandId::Png {
            info!(%sid, msg = %env.data_str(), "handshake message");
            return Ok(());
        }
        warn!(from = %env.dest, "unexpected message during handshake (dropped)");
    }
    Err(SchedError::HandshakeTimeout(sid))
}

/// Reads the init script, starts everything, and runs the executive until
/// an orderly SHT.
pub fn run_daemon(cfg: SchedConfig, script_path: &Path) -> SchedResult<()> {
    let text = std::fs::read_to_string(script_path)?;
    let executive = Supervisor::new(cfg, Arc::new(SystemClock)).start(&text)?;
    executive.run()
}
