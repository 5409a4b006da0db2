// Slide navigation state machine.
// Driven entirely by the host: `tick(now)` fires due timers, user input calls
// `advance_to_next` / `jump_to`. Every slide entry cancels the previous visit's
// timers before arming its own.

use log::{debug, info, trace};

use crate::counter;
use crate::error::EngineError;
use crate::registry::SlideRegistry;
use crate::timer::{TimerKind, TimerTable};
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    NotStarted,
    Running,
    Ended,
}

/// Owns navigation and counter state for one presentation session.
pub struct NavigationEngine {
    registry: SlideRegistry,
    config: EngineConfig,
    session: Session,
    current: SlideId,
    pending: Option<SlideId>,
    countdown_start: Option<Timestamp>,
    counter: Option<CounterState>,
    counter_updates: u64,
    timers: TimerTable,
    events: Vec<EngineEvent>,
}

impl NavigationEngine {
    pub fn new(registry: SlideRegistry, config: EngineConfig) -> Result<Self, EngineError> {
        if config.counter_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "counter_interval_ms must be positive".to_string(),
            ));
        }

        Ok(NavigationEngine {
            current: registry.first_id(),
            registry,
            config,
            session: Session::NotStarted,
            pending: None,
            countdown_start: None,
            counter: None,
            counter_updates: 0,
            timers: TimerTable::new(),
            events: Vec::new(),
        })
    }

    /// Enter the first slide. No-op once the session has started or ended.
    pub fn start(&mut self, now: Timestamp) {
        if self.session != Session::NotStarted {
            return;
        }
        info!(
            "nav: session start slides={} at={}",
            self.registry.len(),
            now.as_millis()
        );
        self.session = Session::Running;
        self.enter_slide(self.registry.first_id(), now);
    }

    /// Stop every timer. Later requests and ticks have no effect.
    pub fn end_session(&mut self) {
        if self.session == Session::Ended {
            return;
        }
        info!("nav: session end current={}", self.current);
        self.timers.cancel_all();
        self.pending = None;
        self.countdown_start = None;
        self.counter = None;
        self.session = Session::Ended;
    }

    pub fn is_running(&self) -> bool {
        self.session == Session::Running
    }

    /// Begin a hand-off to `target`.
    ///
    /// Ignored when the session is not running, a transition is already in flight,
    /// the target is outside the registry, or it is the current slide.
    pub fn request_advance(&mut self, target: SlideId, now: Timestamp) -> NavigationOutcome {
        let outcome = self.check_request(target);
        if let NavigationOutcome::Ignored(reason) = outcome {
            debug!(
                "nav: request ignored current={} target={} reason={:?}",
                self.current, target, reason
            );
            return outcome;
        }

        let from = self.current;
        self.pending = Some(target);
        // The visit is ending; its auto-advance must not fire against the next slide.
        self.timers.cancel(TimerKind::AutoAdvance);
        self.timers.arm_once(
            TimerKind::Transition,
            now.add_millis(self.config.transition_delay_ms),
        );
        debug!(
            "nav: transition start from={} to={} at={}",
            from,
            target,
            now.as_millis()
        );
        self.events.push(EngineEvent::TransitionStarted {
            at: now,
            from,
            to: target,
        });
        outcome
    }

    fn check_request(&self, target: SlideId) -> NavigationOutcome {
        if !self.is_running() {
            NavigationOutcome::Ignored(IgnoreReason::NotRunning)
        } else if self.pending.is_some() {
            NavigationOutcome::Ignored(IgnoreReason::InFlight)
        } else if !self.registry.contains(target) {
            NavigationOutcome::Ignored(IgnoreReason::OutOfRange)
        } else if target == self.current {
            NavigationOutcome::Ignored(IgnoreReason::AlreadyCurrent)
        } else {
            NavigationOutcome::Started {
                from: self.current,
                to: target,
            }
        }
    }

    /// Advance to `current + 1`; no-op on the last slide.
    pub fn advance_to_next(&mut self, now: Timestamp) -> NavigationOutcome {
        if self.is_running() && self.registry.is_last(self.current) {
            debug!("nav: advance ignored on last slide {}", self.current);
            return NavigationOutcome::Ignored(IgnoreReason::LastSlide);
        }
        self.request_advance(self.current.next(), now)
    }

    /// Jump to any slide, forward or backward.
    pub fn jump_to(&mut self, id: u32, now: Timestamp) -> NavigationOutcome {
        self.request_advance(SlideId::new(id), now)
    }

    /// Fire every timer due at or before `now` and return the events produced
    /// since the previous call.
    pub fn tick(&mut self, now: Timestamp) -> Vec<EngineEvent> {
        while self.is_running() {
            let Some(fired) = self.timers.pop_due(now) else {
                break;
            };
            match fired.kind {
                TimerKind::Transition => self.complete_transition(fired.deadline),
                TimerKind::AutoAdvance => {
                    debug!(
                        "nav: auto-advance fired slide={} at={}",
                        self.current,
                        fired.deadline.as_millis()
                    );
                    let _ = self.advance_to_next(fired.deadline);
                }
                TimerKind::CounterTick => self.recompute_counter(fired.deadline),
            }
        }
        std::mem::take(&mut self.events)
    }

    fn complete_transition(&mut self, at: Timestamp) {
        let Some(target) = self.pending.take() else {
            return;
        };
        self.enter_slide(target, at);
    }

    fn enter_slide(&mut self, id: SlideId, at: Timestamp) {
        self.timers.cancel(TimerKind::AutoAdvance);
        self.timers.cancel(TimerKind::CounterTick);
        self.countdown_start = None;
        self.counter = None;
        self.current = id;

        let Some(slide) = self.registry.get(id) else {
            return;
        };
        let auto_delay = slide
            .advance
            .auto_advance_delay()
            .filter(|_| !self.registry.is_last(id));
        let countdown_start = slide
            .countdown
            .as_ref()
            .map(|c| c.start_at(self.config.utc_offset_minutes.unwrap_or(0)));

        info!("nav: enter slide={} at={}", id, at.as_millis());
        self.events.push(EngineEvent::SlideEntered { at, id });

        if let Some(delay) = auto_delay {
            debug!("nav: arm auto-advance slide={} delay_ms={}", id, delay);
            self.timers
                .arm_once(TimerKind::AutoAdvance, at.add_millis(delay));
        }

        if let Some(start) = countdown_start {
            self.countdown_start = Some(start);
            self.recompute_counter(at);
            let interval = self.config.counter_interval_ms;
            self.timers
                .arm_repeating(TimerKind::CounterTick, at.add_millis(interval), interval);
        }
    }

    fn recompute_counter(&mut self, at: Timestamp) {
        let Some(start) = self.countdown_start else {
            return;
        };
        let value = counter::elapsed(start, at);
        trace!(
            "nav: counter slide={} {}d {}h {}m {}s",
            self.current,
            value.days,
            value.hours,
            value.minutes,
            value.seconds
        );
        self.counter = Some(value);
        self.counter_updates += 1;
        self.events
            .push(EngineEvent::CounterUpdated { at, counter: value });
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_id: self.current,
            transitioning: self.pending.is_some(),
            pending_target: self.pending,
            counter: self.counter,
        }
    }

    pub fn current_id(&self) -> SlideId {
        self.current
    }

    pub fn is_transitioning(&self) -> bool {
        self.pending.is_some()
    }

    pub fn counter(&self) -> Option<CounterState> {
        self.counter
    }

    /// Number of counter recomputations so far in this session.
    pub fn counter_updates(&self) -> u64 {
        self.counter_updates
    }

    pub fn current_slide(&self) -> Option<&SlideDescriptor> {
        self.registry.get(self.current)
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// When the host should call `tick` next.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.timers.next_deadline()
    }

    pub fn armed_timers(&self) -> Vec<TimerKind> {
        self.timers.armed().collect()
    }
}
