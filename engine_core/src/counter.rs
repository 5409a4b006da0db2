// Elapsed-time counter: days/hours/minutes/seconds since a fixed start.
// Integer arithmetic only. A start in the future reads as zero.

use crate::types::{CounterLabels, CounterState, Timestamp};

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Split the time elapsed between `start` and `now` into whole units.
pub fn elapsed(start: Timestamp, now: Timestamp) -> CounterState {
    let delta = now.millis_since(start);

    CounterState {
        days: delta / MS_PER_DAY,
        hours: (delta % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (delta % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (delta % MS_PER_MINUTE) / MS_PER_SECOND,
    }
}

impl CounterState {
    /// Fields in display order, named with `labels`.
    pub fn labelled<'a>(&self, labels: &'a CounterLabels) -> [(&'a str, u64); 4] {
        [
            (labels.days.as_str(), self.days),
            (labels.hours.as_str(), self.hours),
            (labels.minutes.as_str(), self.minutes),
            (labels.seconds.as_str(), self.seconds),
        ]
    }
}
