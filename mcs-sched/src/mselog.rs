//! The executive's task log.
//!
//! Plain-text, one line per event, readable while the scheduler runs. Task
//! lines record every task transition; info lines record everything else.
//!
//! ```text
//! YYMMDD HH:MM:SS <MJD> <MPM> T <REF,9> <progress> <DEST> <TYPE> <comment>|
//! YYMMDD HH:MM:SS <MJD> <MPM> N <text>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use mcs_proto::{Clock, CommandId, Progress, SubsystemId};

use crate::error::SchedResult;

/// Widest comment the log renders; raw payloads are hex-truncated to fit.
const COMMENT_LIMIT: usize = 90;

pub struct TaskLog {
    out: BufWriter<File>,
    clock: Arc<dyn Clock>,
}

impl TaskLog {
    /// Creates (clobbering) the log file.
    pub fn create(path: &Path, clock: Arc<dyn Clock>) -> SchedResult<TaskLog> {
        let file = File::create(path)?;
        Ok(TaskLog {
            out: BufWriter::new(file),
            clock,
        })
    }

    /// Logs a task transition. `data_len` of -1 renders `comment` as a
    /// string; otherwise the significant bytes render as uppercase hex.
    pub fn task(
        &mut self,
        reference: u32,
        progress: Progress,
        dest: SubsystemId,
        command: CommandId,
        comment: &[u8],
        data_len: i16,
    ) {
        let rendered = render_comment(comment, data_len);
        let stamp = self.stamp();
        let _ = writeln!(
            self.out,
            "{stamp} T {reference:>9} {} {} {} {rendered}|",
            progress.digit(),
            dest.code(),
            command.code(),
        );
        let _ = self.out.flush();
    }

    /// Logs an informational line.
    pub fn info(&mut self, text: &str) {
        let stamp = self.stamp();
        let _ = writeln!(self.out, "{stamp} N {text}");
        let _ = self.out.flush();
    }

    fn stamp(&self) -> String {
        let now = self.clock.now();
        let (mjd, mpm) = now.to_mjd_mpm().unwrap_or((0, 0));
        let utc = self.clock.now_utc();
        format!("{} {mjd} {mpm}", utc.format("%y%m%d %H:%M:%S"))
    }
}

fn render_comment(comment: &[u8], data_len: i16) -> String {
    if data_len < 0 {
        let end = comment.iter().position(|&b| b == 0).unwrap_or(comment.len());
        let mut text = String::from_utf8_lossy(&comment[..end]).into_owned();
        text.truncate(COMMENT_LIMIT);
        text
    } else {
        let n = (data_len as usize).min(comment.len()).min(COMMENT_LIMIT / 2);
        let mut hex = String::with_capacity(2 * n);
        for b in &comment[..n] {
            hex.push_str(&format!("{b:02X}"));
        }
        hex
    }
}

#[cfg(test)]
mod tests {
    use super::render_comment;

    #[test]
    fn renders_strings_and_hex() {
        assert_eq!(render_comment(b"queued\0junk", -1), "queued");
        assert_eq!(render_comment(&[0xAB, 0x01, 0xFF], 3), "AB01FF");
        assert_eq!(render_comment(&[0x00, 0x10], 2), "0010");
    }

    #[test]
    fn hex_is_truncated_to_fit() {
        let raw = [0xEEu8; 200];
        assert_eq!(render_comment(&raw, 200).len(), 90);
    }
}
