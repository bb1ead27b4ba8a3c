//! Shared harness for the end-to-end tests: a UDP mock subsystem, an
//! injector, and log polling.

#![allow(dead_code)]

use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, UdpSocket};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use mcs_proto::{
    Clock, CommandFrame, CommandId, Envelope, ResponseFrame, ResponseKind, SubsystemId, Summary,
    SystemClock, ENVELOPE_WIRE_LEN,
};
use mcs_sched::SchedConfig;

pub fn free_udp_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

pub fn free_tcp_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A config with short timeouts so age-outs resolve in test time.
pub fn test_config(dir: &Path) -> SchedConfig {
    SchedConfig {
        listen_addr: free_tcp_addr(),
        ptq_timeout: Duration::from_millis(250),
        sent_timeout: Duration::from_millis(500),
        mib_dir: dir.to_path_buf(),
        log_path: dir.join("mselog.txt"),
        ..SchedConfig::default()
    }
}

/// Minimal MIB init file contents for a subsystem under test.
pub fn write_mib_dat(dir: &Path, code: &str, extra_rows: &str) {
    let text = format!("V 1.1 SUMMARY UNK a7 a7\nV 1.2 INFO - a32 a32\n{extra_rows}");
    fs::write(dir.join(format!("{code}_MIB_init.dat")), text).unwrap();
}

/// A scripted UDP responder standing in for a real subsystem.
pub struct MockSubsystem {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl MockSubsystem {
    /// Listens on `tx_port` (where the client sends commands) and answers to
    /// `rx_port` (where the client listens).
    pub fn spawn(tx_port: u16, rx_port: u16) -> MockSubsystem {
        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = std::thread::spawn(move || {
            let socket = UdpSocket::bind(("127.0.0.1", tx_port)).unwrap();
            socket
                .set_read_timeout(Some(Duration::from_millis(50)))
                .unwrap();
            let mut buf = [0u8; 512];
            while flag.load(Ordering::Relaxed) {
                let n = match socket.recv_from(&mut buf) {
                    Ok((n, _)) => n,
                    Err(_) => continue,
                };
                let Ok(frame) = CommandFrame::parse(&buf[..n]) else {
                    continue;
                };
                let (kind, summary, comment): (ResponseKind, Summary, &[u8]) =
                    match frame.command {
                        CommandId::Png => (ResponseKind::Accepted, Summary::Normal, b""),
                        CommandId::Sht => (ResponseKind::Accepted, Summary::Shutdwn, b""),
                        CommandId::Rpt => {
                            if &frame.data[..frame.data_len] == b"SET-POINT" {
                                (ResponseKind::Accepted, Summary::Normal, b"72.50")
                            } else {
                                (ResponseKind::Rejected, Summary::Warning, b"unknown label")
                            }
                        }
                        CommandId::Fil => {
                            (ResponseKind::Rejected, Summary::Warning, b"out-of-range")
                        }
                        _ => (ResponseKind::Accepted, Summary::Normal, b""),
                    };
                let mut body = [0u8; 256];
                body[..comment.len()].copy_from_slice(comment);
                let response = ResponseFrame {
                    dest: SubsystemId::Mcs,
                    src: frame.dest,
                    command: frame.command,
                    reference: frame.reference,
                    mjd: frame.mjd,
                    mpm: frame.mpm,
                    kind,
                    summary,
                    comment: body,
                    comment_len: comment.len(),
                };
                let (out, len) = response.encode();
                let _ = socket.send_to(&out[..len], ("127.0.0.1", rx_port));
            }
        });
        MockSubsystem {
            running,
            handle: Some(handle),
        }
    }
}

impl Drop for MockSubsystem {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Sends an unsolicited response frame straight at a client's receive port.
pub fn send_orphan_response(rx_port: u16, src: SubsystemId, reference: u32, summary: Summary) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let response = ResponseFrame {
        dest: SubsystemId::Mcs,
        src,
        command: CommandId::Png,
        reference,
        mjd: 55068,
        mpm: 0,
        kind: ResponseKind::Accepted,
        summary,
        comment: [0u8; 256],
        comment_len: 0,
    };
    let (out, len) = response.encode();
    socket.send_to(&out[..len], ("127.0.0.1", rx_port)).unwrap();
}

/// Injects one command the way the external injector does: connect, write
/// one envelope, read one reply.
pub fn inject(addr: SocketAddr, dest: SubsystemId, command: CommandId, data: &str) -> Envelope {
    let mut env = Envelope::new(dest, command);
    env.when = SystemClock.now();
    env.set_str_data(data);

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(&env.to_bytes()).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut buf = [0u8; ENVELOPE_WIRE_LEN];
    stream.read_exact(&mut buf).unwrap();
    Envelope::from_bytes(&buf).unwrap()
}

/// Polls the task log until `pred` matches, returning the log contents.
pub fn wait_for_log(path: &Path, timeout: Duration, pred: impl Fn(&str) -> bool) -> String {
    let deadline = Instant::now() + timeout;
    loop {
        let text = fs::read_to_string(path).unwrap_or_default();
        if pred(&text) {
            return text;
        }
        if Instant::now() >= deadline {
            panic!("log condition not met within {timeout:?}; log so far:\n{text}");
        }
        std::thread::sleep(Duration::from_millis(20));
    }
}
