//! Init-script parsing.
//!
//! ASCII, whitespace-separated, one directive per line. Blank lines and
//! lines whose first token starts with `#` are skipped; unknown directives
//! are logged as warnings and skipped.

use mcs_proto::SubsystemId;
use tracing::warn;

use crate::error::{SchedError, SchedResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `mibinit <code> <ip> <tx_port> <rx_port>`: build the subsystem's MIB
    /// store before its client starts.
    MibInit {
        code: String,
        ip_address: String,
        tx_port: u16,
        rx_port: u16,
    },
    /// `mcic <code>`: spawn a subsystem client.
    Client { sid: SubsystemId },
}

pub fn parse(text: &str) -> SchedResult<Vec<Directive>> {
    let mut directives = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = tokens.first() else {
            continue;
        };
        if first.starts_with('#') {
            continue;
        }
        match first {
            "mibinit" => {
                let [code, ip, tx, rx] = tokens.get(1..5).and_then(|t| <[&str; 4]>::try_from(t).ok())
                    .ok_or_else(|| SchedError::BadScript {
                        line: line_no,
                        reason: "mibinit needs <code> <ip> <tx_port> <rx_port>".to_owned(),
                    })?;
                let parse_port = |s: &str, which: &str| {
                    s.parse::<u16>().map_err(|_| SchedError::BadScript {
                        line: line_no,
                        reason: format!("bad {which} port {s:?}"),
                    })
                };
                directives.push(Directive::MibInit {
                    code: code.to_owned(),
                    ip_address: ip.to_owned(),
                    tx_port: parse_port(tx, "tx")?,
                    rx_port: parse_port(rx, "rx")?,
                });
            }
            "mcic" => {
                let code = tokens.get(1).ok_or_else(|| SchedError::BadScript {
                    line: line_no,
                    reason: "mcic needs <code>".to_owned(),
                })?;
                let sid = SubsystemId::from_code(code).map_err(|e| SchedError::BadScript {
                    line: line_no,
                    reason: e.to_string(),
                })?;
                directives.push(Directive::Client { sid });
            }
            other => {
                warn!(line = line_no, directive = other, "init directive not recognized (ignored)");
            }
        }
    }
    Ok(directives)
}
