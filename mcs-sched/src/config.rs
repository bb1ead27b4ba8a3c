use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{SchedError, SchedResult};

/// Tunables for the scheduler fabric.
///
/// The defaults are the sized constants the system was designed around; they
/// are configuration, not architecture, and the integration tests shrink the
/// timeouts.
#[derive(Debug, Clone)]
pub struct SchedConfig {
    /// Loopback address the executive accepts command injections on.
    pub listen_addr: SocketAddr,
    /// Executive task ring capacity.
    pub ring_capacity: usize,
    /// Per-client pending-task queue capacity.
    pub ptq_capacity: usize,
    /// How long a client waits for a subsystem response before reporting a
    /// pending-task timeout.
    pub ptq_timeout: Duration,
    /// How long the executive keeps a SENT slot before ageing it out. Must
    /// exceed `ptq_timeout` so the client always reports first.
    pub sent_timeout: Duration,
    /// Depth of each bounded bus.
    pub bus_depth: usize,
    /// Directory holding `<CODE>_MIB_init.dat` files and `<CODE>.mib` stores.
    pub mib_dir: PathBuf,
    /// Task log file path.
    pub log_path: PathBuf,
}

impl Default for SchedConfig {
    fn default() -> Self {
        SchedConfig {
            listen_addr: "127.0.0.1:9734".parse().unwrap(),
            ring_capacity: 740,
            ptq_capacity: 500,
            ptq_timeout: Duration::from_secs(4),
            sent_timeout: Duration::from_secs(6),
            bus_depth: 64,
            mib_dir: PathBuf::from("."),
            log_path: PathBuf::from("mselog.txt"),
        }
    }
}

impl SchedConfig {
    pub fn validate(&self) -> SchedResult<()> {
        if self.ring_capacity == 0 || self.ptq_capacity == 0 || self.bus_depth == 0 {
            return Err(SchedError::BadConfig("capacities must be non-zero"));
        }
        if self.ptq_timeout >= self.sent_timeout {
            return Err(SchedError::BadConfig(
                "client pending-task timeout must be shorter than the executive sent timeout",
            ));
        }
        Ok(())
    }

    pub fn mib_store_path(&self, code: &str) -> PathBuf {
        self.mib_dir.join(format!("{code}.mib"))
    }

    pub fn mib_init_path(&self, code: &str) -> PathBuf {
        self.mib_dir.join(format!("{code}_MIB_init.dat"))
    }
}
