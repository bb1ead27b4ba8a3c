//! # MCS Scheduler
//!
//! The scheduler/dispatcher fabric of the Monitor & Control Scheduler: the
//! executive (central task-queue server accepting injected commands over a
//! loopback stream socket), one long-lived subsystem client per configured
//! subsystem (each owning a UDP socket pair, a pending-task queue, and its
//! subsystem's MIB), and the typed bounded message bus tying them together.
//!
//! ## Architecture
//!
//! - **Supervisor**: reads the init script, builds MIB stores, spawns the
//!   client threads with a liveness handshake, then hands off to the
//!   executive loop.
//! - **Executive**: single-threaded cooperative loop; fixed-capacity task
//!   ring with a circular dispatch cursor; every task transition goes to the
//!   task log file.
//! - **Clients**: cooperative loops pumping commands out over UDP,
//!   correlating responses by reference, ageing out pending tasks, and
//!   updating the MIB.
//!
//! All capacities and timeouts live in [`SchedConfig`]; the client
//! pending-task timeout is strictly shorter than the executive's sent-task
//! timeout so the client always reports first.

pub mod bus;
pub mod client;
pub mod config;
pub mod error;
pub mod exec;
pub mod handlers;
pub mod mselog;
pub mod ptq;
pub mod ring;
pub mod script;
pub mod supervisor;

pub use bus::{BusRx, BusTx};
pub use client::SubsystemClient;
pub use config::SchedConfig;
pub use error::{SchedError, SchedResult};
pub use exec::Executive;
pub use mselog::TaskLog;
pub use ptq::{PendingData, PendingTaskQueue};
pub use ring::TaskRing;
pub use supervisor::{run_daemon, Supervisor};
