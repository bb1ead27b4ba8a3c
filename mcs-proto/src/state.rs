use bitflags::bitflags;

/// Lifecycle state of a task, logged at every transition.
///
/// `Avail` doubles as the "slot free" marker in the executive's task ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Progress {
    Avail = 0,
    Queued = 1,
    Sent = 2,
    /// Subsystem accepted (`A`).
    Success = 3,
    FailExec = 4,
    FailClient = 5,
    /// Subsystem rejected (`R`).
    FailRejected = 6,
    /// Client was happy but the subsystem response was not classifiable;
    /// the task is considered done.
    DoneUnknown = 7,
    /// The client's pending-task timeout fired; the task is considered done.
    DonePtqTimeout = 8,
}

impl Progress {
    pub fn from_id(id: u8) -> Option<Progress> {
        const ALL: [Progress; 9] = [
            Progress::Avail,
            Progress::Queued,
            Progress::Sent,
            Progress::Success,
            Progress::FailExec,
            Progress::FailClient,
            Progress::FailRejected,
            Progress::DoneUnknown,
            Progress::DonePtqTimeout,
        ];
        ALL.iter().copied().find(|p| *p as u8 == id)
    }

    /// Single-digit code used in task log lines.
    pub fn digit(self) -> char {
        (b'0' + self as u8) as char
    }

    /// True once a task will make no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Progress::Success
                | Progress::FailExec
                | Progress::FailClient
                | Progress::FailRejected
                | Progress::DoneUnknown
                | Progress::DonePtqTimeout
        )
    }
}

/// Coarse operational state reported by a subsystem in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Summary {
    #[default]
    Null = 0,
    Normal = 1,
    Warning = 2,
    Error = 3,
    Booting = 4,
    Shutdwn = 5,
}

impl Summary {
    /// Parses the 7-character right-padded R_SUMMARY token. Anything outside
    /// the six literals maps to `Null`.
    pub fn from_token(token: &str) -> Summary {
        match token.trim() {
            "NORMAL" => Summary::Normal,
            "WARNING" => Summary::Warning,
            "ERROR" => Summary::Error,
            "BOOTING" => Summary::Booting,
            "SHUTDWN" => Summary::Shutdwn,
            _ => Summary::Null,
        }
    }

    pub fn from_id(id: u8) -> Option<Summary> {
        const ALL: [Summary; 6] = [
            Summary::Null,
            Summary::Normal,
            Summary::Warning,
            Summary::Error,
            Summary::Booting,
            Summary::Shutdwn,
        ];
        ALL.iter().copied().find(|s| *s as u8 == id)
    }

    /// The canonical literal, unpadded.
    pub fn token(self) -> &'static str {
        match self {
            Summary::Null => "NULL",
            Summary::Normal => "NORMAL",
            Summary::Warning => "WARNING",
            Summary::Error => "ERROR",
            Summary::Booting => "BOOTING",
            Summary::Shutdwn => "SHUTDWN",
        }
    }
}

bitflags! {
    /// Additive diagnostics a client reports when its MIB may have drifted.
    ///
    /// Logged by the executive but never branched on; task progress is the
    /// control-flow signal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MibErrorMask: u8 {
        const CANT_OPEN = 1;
        const CANT_STORE = 2;
        /// Response reference not in the pending queue; other than SUMMARY
        /// the MIB may not have been properly updated.
        const REF_UNKNOWN = 4;
        const CANT_FETCH = 8;
        const SID_UNKNOWN = 16;
        /// Command is something this subsystem should not have supported.
        const SID_CID_MISMATCH = 32;
        /// MIB may be out of sync for other reasons, e.g. a pending-task
        /// timeout left a command's effect unknown.
        const OTHER = 64;
    }
}
