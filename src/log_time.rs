//! Wall-clock capture for log records.
//!
//! The broken-down local time is captured once, on the producer thread, at
//! record construction. The consumer never touches the system clock, so two
//! records may appear in the output slightly out of timestamp order when
//! producers race; the captured instants are authoritative, not the file
//! position.

use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of the system clock at log-line construction.
///
/// `Copy` and `#[repr(C)]`: the whole struct is raw-copied by value into
/// the record payload and read back positionally on the consumer side.
#[derive(Clone, Copy, Debug)]
#[repr(C)]
pub struct LogLineTime {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Microseconds within the current second.
    pub usec: u32,
    /// Days since Sunday, 0-6.
    pub weekday: u32,
    /// Days since January 1, 0-365.
    pub yearday: u32,
    /// Raw DST flag; negative means "unknown".
    pub dst: i32,
    /// Local-time offset from UTC, in seconds. Negative west of Greenwich.
    pub gmtoff: i64,
}

impl LogLineTime {
    /// Capture the current wall-clock time.
    #[inline]
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Break `now` down into local-time fields.
    pub fn from_system_time(now: SystemTime) -> Self {
        let since_epoch = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        let secs = since_epoch.as_secs() as libc::time_t;
        let usec = since_epoch.subsec_micros();

        // SAFETY: localtime_r is the re-entrant variant; it writes only
        // into the tm provided and reads only the time_t provided.
        let tm = unsafe {
            let mut tm: libc::tm = std::mem::zeroed();
            libc::localtime_r(&secs, &mut tm);
            tm
        };

        Self {
            year: tm.tm_year + 1900,
            month: (tm.tm_mon + 1) as u32,
            day: tm.tm_mday as u32,
            hour: tm.tm_hour as u32,
            minute: tm.tm_min as u32,
            second: tm.tm_sec as u32,
            usec,
            weekday: tm.tm_wday as u32,
            yearday: tm.tm_yday as u32,
            dst: tm.tm_isdst,
            gmtoff: tm.tm_gmtoff as i64,
        }
    }
}
