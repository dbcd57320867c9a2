use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MS_PER_SECOND: u64 = 1_000;
pub const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// A non-negative duration split into calendar-free units.
///
/// Decomposition is successive floor division of the remaining milliseconds,
/// so [`Elapsed::total_millis`] always reconstructs the input exactly.
///
/// When the reference instant lies in the future (upstream or local clock
/// skew) the absolute difference is decomposed and `skewed` is set. The
/// components never go negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub millis: u64,
    pub skewed: bool,
}

impl Elapsed {
    /// Decompose a signed millisecond difference (`now - instant`).
    pub fn from_millis(diff_ms: i64) -> Self {
        let mut rest = diff_ms.unsigned_abs();

        let days = rest / MS_PER_DAY;
        rest -= days * MS_PER_DAY;
        let hours = rest / MS_PER_HOUR;
        rest -= hours * MS_PER_HOUR;
        let minutes = rest / MS_PER_MINUTE;
        rest -= minutes * MS_PER_MINUTE;
        let seconds = rest / MS_PER_SECOND;
        rest -= seconds * MS_PER_SECOND;

        Self {
            days,
            hours,
            minutes,
            seconds,
            millis: rest,
            skewed: diff_ms < 0,
        }
    }

    /// Time elapsed from `instant` to `now`.
    pub fn between(instant: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self::from_millis(now.signed_duration_since(instant).num_milliseconds())
    }

    pub fn total_millis(&self) -> u64 {
        self.days * MS_PER_DAY
            + self.hours * MS_PER_HOUR
            + self.minutes * MS_PER_MINUTE
            + self.seconds * MS_PER_SECOND
            + self.millis
    }

    /// `"{d} days {h} hrs {m} min {s} s {ms} ms ago"`
    pub fn long(&self) -> LongElapsed<'_> {
        LongElapsed(self)
    }
}

/// Short form: `"{d}d {h}h {m}m {s}s {ms}ms"`.
impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d {}h {}m {}s {}ms",
            self.days, self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LongElapsed<'a>(&'a Elapsed);

impl fmt::Display for LongElapsed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        write!(
            f,
            "{} days {} hrs {} min {} s {} ms ago",
            e.days, e.hours, e.minutes, e.seconds, e.millis
        )
    }
}
