use std::fmt::Debug;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};

use crate::error::ProtoError;

/// Days from chrono's day-zero (0001-01-01) to MJD day-zero (1858-11-17).
const MJD_CE_OFFSET: i32 = 678_576;

const MILLIS_PER_DAY: u32 = 86_400_000;

/// A UTC instant with microsecond granularity, as carried in the command
/// envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp {
    /// Seconds since the Unix epoch.
    pub secs: i64,
    /// Fractional remainder, 0..1_000_000.
    pub micros: u32,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { secs: 0, micros: 0 };

    pub fn from_utc(dt: DateTime<Utc>) -> Timestamp {
        Timestamp {
            secs: dt.timestamp(),
            micros: dt.timestamp_subsec_micros(),
        }
    }

    pub fn to_utc(self) -> Result<DateTime<Utc>, ProtoError> {
        DateTime::<Utc>::from_timestamp(self.secs, self.micros * 1_000)
            .ok_or(ProtoError::TimeOutOfRange)
    }

    /// Converts to the wire-format pair: Modified Julian Day and
    /// milliseconds past midnight UTC.
    ///
    /// Exact calendar arithmetic; precision is one millisecond (the MPM
    /// quantum), sub-millisecond microseconds are truncated.
    pub fn to_mjd_mpm(self) -> Result<(u32, u32), ProtoError> {
        let dt = self.to_utc()?;
        let mjd = dt.date_naive().num_days_from_ce() - MJD_CE_OFFSET;
        if mjd < 0 {
            return Err(ProtoError::TimeOutOfRange);
        }
        let mpm = dt.time().num_seconds_from_midnight() * 1_000 + self.micros / 1_000;
        Ok((mjd as u32, mpm))
    }

    /// Inverse of [`Timestamp::to_mjd_mpm`]. Round-trips to the millisecond.
    pub fn from_mjd_mpm(mjd: u32, mpm: u32) -> Result<Timestamp, ProtoError> {
        if mpm >= MILLIS_PER_DAY {
            return Err(ProtoError::TimeOutOfRange);
        }
        let days = (mjd as i32)
            .checked_add(MJD_CE_OFFSET)
            .ok_or(ProtoError::TimeOutOfRange)?;
        let date = NaiveDate::from_num_days_from_ce_opt(days).ok_or(ProtoError::TimeOutOfRange)?;
        let time = date
            .and_hms_milli_opt(0, 0, 0, 0)
            .ok_or(ProtoError::TimeOutOfRange)?;
        let secs = time.and_utc().timestamp() + (mpm / 1_000) as i64;
        Ok(Timestamp {
            secs,
            micros: (mpm % 1_000) * 1_000,
        })
    }
}

/// Source of both monotonic and wall-clock time.
///
/// Production code uses [`SystemClock`]; tests drive age-out logic with a
/// [`ManualClock`].
pub trait Clock: Send + Sync + Debug {
    fn now_instant(&self) -> Instant;
    fn now(&self) -> Timestamp;

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().to_utc().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_instant(&self) -> Instant {
        Instant::now()
    }

    fn now(&self) -> Timestamp {
        Timestamp::from_utc(Utc::now())
    }
}

/// A manually advanced clock for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    instant: RwLock<Instant>,
    now: RwLock<Timestamp>,
}

impl ManualClock {
    pub fn new(instant: Instant, now: Timestamp) -> ManualClock {
        ManualClock {
            instant: RwLock::new(instant),
            now: RwLock::new(now),
        }
    }

    pub fn advance(&self, duration: Duration) {
        *self.instant.write().unwrap() += duration;
        let mut now = self.now.write().unwrap();
        let micros = now.micros as u64 + duration.subsec_micros() as u64;
        now.secs += duration.as_secs() as i64 + (micros / 1_000_000) as i64;
        now.micros = (micros % 1_000_000) as u32;
    }
}

impl Clock for ManualClock {
    fn now_instant(&self) -> Instant {
        *self.instant.read().unwrap()
    }

    fn now(&self) -> Timestamp {
        *self.now.read().unwrap()
    }
}
