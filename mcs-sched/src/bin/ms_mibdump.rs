use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use mcs_mib::{dump, MibStore};

/// Prints every entry of a subsystem MIB store, decoding values per their
/// local type codes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a <CODE>.mib store
    store: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let result = MibStore::open_ro(&args.store)
        .and_then(|store| dump(&store, &mut std::io::stdout().lock()));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ms-mibdump: {e}");
            ExitCode::FAILURE
        }
    }
}
