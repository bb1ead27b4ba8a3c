use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::process::ExitCode;

use clap::Parser;
use mcs_proto::{
    Clock, CommandId, Envelope, Progress, SubsystemId, SystemClock, ENVELOPE_WIRE_LEN,
};

/// Injects one command into a running MCS executive and prints the reply.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Destination subsystem code (e.g. SHL, ASP, DP_, MCS, NU1)
    dest: String,

    /// Command type code (e.g. PNG, RPT, SHT)
    command: String,

    /// DATA field (printable string; defaults to empty)
    data: Option<String>,

    /// Executive address
    #[arg(long, default_value = "127.0.0.1:9734")]
    addr: SocketAddr,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match inject(&args) {
        Ok(reply) => {
            println!(
                "accept_state={:?} reference={} comment=<{}>",
                reply.progress,
                reply.reference,
                reply.data_str()
            );
            if reply.progress == Progress::Queued {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("ms-inject: {e}");
            ExitCode::FAILURE
        }
    }
}

fn inject(args: &Args) -> Result<Envelope, Box<dyn std::error::Error>> {
    let dest = SubsystemId::from_code(&args.dest)?;
    let command = CommandId::from_code(&args.command)?;

    let mut env = Envelope::new(dest, command);
    env.when = SystemClock.now();
    env.set_str_data(args.data.as_deref().unwrap_or(""));

    let mut stream = TcpStream::connect(args.addr)?;
    stream.write_all(&env.to_bytes())?;

    let mut buf = [0u8; ENVELOPE_WIRE_LEN];
    stream.read_exact(&mut buf)?;
    Ok(Envelope::from_bytes(&buf)?)
}
