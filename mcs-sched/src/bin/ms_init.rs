use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mcs_sched::{run_daemon, SchedConfig};
use tracing_subscriber::EnvFilter;

/// MCS scheduler daemon: builds MIB stores, spawns subsystem clients, and
/// runs the executive until an orderly SHT.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Init script (mibinit / mcic directives)
    script: PathBuf,

    /// Directory holding <CODE>_MIB_init.dat files and <CODE>.mib stores
    #[arg(long, default_value = ".")]
    mib_dir: PathBuf,

    /// Task log file (clobbered at startup)
    #[arg(long, default_value = "mselog.txt")]
    log: PathBuf,

    /// Loopback address to accept command injections on
    #[arg(long, default_value = "127.0.0.1:9734")]
    listen: SocketAddr,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = SchedConfig {
        listen_addr: args.listen,
        mib_dir: args.mib_dir,
        log_path: args.log,
        ..SchedConfig::default()
    };

    match run_daemon(cfg, &args.script) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ms-init: {e}");
            ExitCode::FAILURE
        }
    }
}
