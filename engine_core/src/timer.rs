// Explicit timer table for the navigation engine.
// One slot per timer kind: arming a kind replaces whatever was armed there,
// so two timers of the same kind can never coexist.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// The three logical timers the engine multiplexes onto the host loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerKind {
    /// One-shot visual hand-off between slides.
    Transition,
    /// One-shot per-slide auto-advance.
    AutoAdvance,
    /// Repeating elapsed-time recomputation.
    CounterTick,
}

impl TimerKind {
    const ALL: [TimerKind; 3] = [
        TimerKind::Transition,
        TimerKind::AutoAdvance,
        TimerKind::CounterTick,
    ];

    fn slot(self) -> usize {
        match self {
            TimerKind::Transition => 0,
            TimerKind::AutoAdvance => 1,
            TimerKind::CounterTick => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ArmedTimer {
    deadline: Timestamp,
    period_ms: Option<u64>,
    // Arm order, breaks deadline ties.
    seq: u64,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub kind: TimerKind,
    /// Instant the timer fired at; for a coalesced repeating timer, the latest
    /// missed period boundary.
    pub deadline: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct TimerTable {
    slots: [Option<ArmedTimer>; 3],
    next_seq: u64,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a one-shot timer, replacing any armed timer of the same kind.
    pub fn arm_once(&mut self, kind: TimerKind, deadline: Timestamp) {
        self.arm(kind, deadline, None);
    }

    /// Arm a repeating timer whose first firing is at `first_deadline`.
    /// A zero period is treated as one millisecond.
    pub fn arm_repeating(&mut self, kind: TimerKind, first_deadline: Timestamp, period_ms: u64) {
        self.arm(kind, first_deadline, Some(period_ms.max(1)));
    }

    fn arm(&mut self, kind: TimerKind, deadline: Timestamp, period_ms: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots[kind.slot()] = Some(ArmedTimer {
            deadline,
            period_ms,
            seq,
        });
    }

    /// Returns whether a timer was actually armed.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].take().is_some()
    }

    pub fn cancel_all(&mut self) {
        self.slots = [None; 3];
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.slots[kind.slot()].is_some()
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<Timestamp> {
        self.slots[kind.slot()].map(|t| t.deadline)
    }

    pub fn armed(&self) -> impl Iterator<Item = TimerKind> + '_ {
        TimerKind::ALL
            .into_iter()
            .filter(move |kind| self.is_armed(*kind))
    }

    /// Earliest pending deadline, for scheduling a single host timer.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.slots.iter().flatten().map(|t| t.deadline).min()
    }

    /// Take the earliest timer due at or before `now`.
    ///
    /// A repeating timer that missed periods fires once, at the last period boundary
    /// at or before `now`, and is ordered against the other timers by that instant.
    /// It is then re-armed at the following boundary, or disarmed when that boundary
    /// is not representable. One-shot timers fire at their deadline and are disarmed.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<Fired> {
        let (kind, at) = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.slots[kind.slot()].map(|t| (kind, t)))
            .filter(|(_, t)| t.deadline <= now)
            .map(|(kind, t)| (kind, t.fires_at(now), t.seq))
            .min_by_key(|(_, at, seq)| (*at, *seq))
            .map(|(kind, at, _)| (kind, at))?;

        let timer = self.slots[kind.slot()].take()?;

        if let Some(period) = timer.period_ms {
            match at.checked_add_millis(period) {
                Some(next) if next > now => self.arm(kind, next, Some(period)),
                _ => {}
            }
        }

        Some(Fired { kind, deadline: at })
    }
}

impl ArmedTimer {
    /// Instant this timer fires at when polled at `now`.
    fn fires_at(&self, now: Timestamp) -> Timestamp {
        match self.period_ms {
            Some(period) => {
                let behind = now.millis_since(self.deadline);
                self.deadline.add_millis(behind / period * period)
            }
            None => self.deadline,
        }
    }
}
