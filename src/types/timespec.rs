//! Timestamps and time ranges as the remote store expects them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// A point in time split into seconds and nanoseconds since the Unix epoch.
///
/// Field order matters: the derived ordering compares seconds first.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timespec {
    pub tv_sec: i64,
    pub tv_nsec: i64,
}

impl Timespec {
    /// The null timestamp sentinel.
    pub const NULL: Timespec = Timespec {
        tv_sec: i64::MIN,
        tv_nsec: i64::MIN,
    };

    pub const fn new(tv_sec: i64, tv_nsec: i64) -> Self {
        Self { tv_sec, tv_nsec }
    }

    /// Builds a timestamp from nanoseconds since the epoch (e.g. `datetime64[ns]`).
    pub fn from_nanos(nanos: i64) -> Self {
        Self {
            tv_sec: nanos.div_euclid(NANOS_PER_SEC),
            tv_nsec: nanos.rem_euclid(NANOS_PER_SEC),
        }
    }

    /// Nanoseconds since the epoch, or `None` if that does not fit in an `i64`.
    pub fn to_nanos(&self) -> Option<i64> {
        self.tv_sec
            .checked_mul(NANOS_PER_SEC)?
            .checked_add(self.tv_nsec)
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// The timestamp one nanosecond later, carrying into the seconds.
    ///
    /// Saturates at the last representable nanosecond.
    pub fn next_nanosecond(&self) -> Self {
        if self.tv_nsec < NANOS_PER_SEC - 1 {
            return Self::new(self.tv_sec, self.tv_nsec + 1);
        }
        match self.tv_sec.checked_add(1) {
            Some(tv_sec) => Self::new(tv_sec, 0),
            None => Self::new(i64::MAX, NANOS_PER_SEC - 1),
        }
    }
}

impl From<DateTime<Utc>> for Timespec {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value.timestamp(), i64::from(value.timestamp_subsec_nanos()))
    }
}

impl fmt::Display for Timespec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return write!(f, "null");
        }
        write!(f, "{}.{:09}", self.tv_sec, self.tv_nsec)
    }
}

/// A half-open time interval `[begin, end)`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub begin: Timespec,
    pub end: Timespec,
}

impl TimeRange {
    pub fn new(begin: Timespec, end: Timespec) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, ts: &Timespec) -> bool {
        self.begin <= *ts && *ts < self.end
    }
}
