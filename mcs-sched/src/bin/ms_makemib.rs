use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mcs_mib::init_from_text;

/// Builds a subsystem MIB store from its text initialization file,
/// inserting the subsystem's endpoint entries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 3-character subsystem code; reads <CODE>_MIB_init.dat and writes
    /// <CODE>.mib
    code: String,

    /// Subsystem IP address (dotted quad)
    ip_address: String,

    /// Subsystem transmit port
    tx_port: u16,

    /// Subsystem receive port
    rx_port: u16,

    /// Directory for both files
    #[arg(long, default_value = ".")]
    dir: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let dat = args.dir.join(format!("{}_MIB_init.dat", args.code));
    let store = args.dir.join(format!("{}.mib", args.code));
    match init_from_text(&dat, &store, &args.ip_address, args.tx_port, args.rx_port) {
        Ok(entries) => {
            println!("{}: {entries} entries", store.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ms-makemib: {e}");
            ExitCode::FAILURE
        }
    }
}
