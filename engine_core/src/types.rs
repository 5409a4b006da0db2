// Strong typing over strings. Newtypes for timestamps and slide ids.
// Everything the JS layer reads or writes crosses as one of these serde types.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch (what `Date.now()` yields). Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(ms: i64) -> Self {
        Timestamp(ms)
    }

    /// JS numbers are f64; fractional milliseconds are dropped.
    pub fn from_js_millis(ms: f64) -> Self {
        Timestamp(ms.floor() as i64)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn as_js_millis(&self) -> f64 {
        self.0 as f64
    }

    pub fn add_millis(&self, ms: u64) -> Self {
        Timestamp(self.0.saturating_add(ms.min(i64::MAX as u64) as i64))
    }

    /// `None` when the result does not fit.
    pub fn checked_add_millis(&self, ms: u64) -> Option<Self> {
        i64::try_from(ms)
            .ok()
            .and_then(|ms| self.0.checked_add(ms))
            .map(Timestamp)
    }

    /// Milliseconds from `earlier` to `self`, clamped to zero.
    pub fn millis_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0).max(0) as u64
    }
}

/// Slide id. Registries are dense, so ids run 1..=N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(u32);

impl SlideId {
    pub fn new(id: u32) -> Self {
        SlideId(id)
    }

    pub fn first() -> Self {
        SlideId(1)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn next(&self) -> Self {
        SlideId(self.0.saturating_add(1))
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a slide hands off to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AdvanceMode {
    /// Advances on its own once `delay_ms` has elapsed. Without a delay it behaves like `Manual`.
    Automatic {
        #[serde(default)]
        delay_ms: Option<u64>,
    },
    /// Only advances on explicit user action.
    Manual,
}

impl AdvanceMode {
    pub fn auto_advance_delay(&self) -> Option<u64> {
        match self {
            AdvanceMode::Automatic { delay_ms } => *delay_ms,
            AdvanceMode::Manual => None,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, AdvanceMode::Manual)
    }
}

/// Visual layout variant. Interpreted only by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum Layout {
    #[default]
    Title,
    TextWithDate,
    PlainText,
    SpecialCounter,
    Music,
    Photo,
    Final,
}

impl From<String> for Layout {
    /// Unknown names render as a title slide.
    fn from(name: String) -> Self {
        match name.as_str() {
            "text_with_date" => Layout::TextWithDate,
            "plain_text" => Layout::PlainText,
            "special_counter" => Layout::SpecialCounter,
            "music" => Layout::Music,
            "photo" => Layout::Photo,
            "final" => Layout::Final,
            _ => Layout::Title,
        }
    }
}

/// Reference instant for an elapsed-time counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Local wall-clock time, resolved with `EngineConfig::utc_offset_minutes`.
    pub start: NaiveDateTime,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub labels: CounterLabels,
}

/// Display names for the counter units, in the presentation's language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterLabels {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl Default for CounterLabels {
    fn default() -> Self {
        CounterLabels {
            days: "days".to_string(),
            hours: "hours".to_string(),
            minutes: "minutes".to_string(),
            seconds: "seconds".to_string(),
        }
    }
}

impl Countdown {
    /// Resolve the wall-clock start into an epoch timestamp.
    pub fn start_at(&self, utc_offset_minutes: i32) -> Timestamp {
        let utc_ms = self.start.and_utc().timestamp_millis();
        Timestamp::from_millis(utc_ms - i64::from(utc_offset_minutes) * 60_000)
    }
}

/// Embedded video reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEmbed {
    pub video_id: String,
}

/// Presentational payload. Opaque to the navigation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SlideContent {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoEmbed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_title_background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub stars: bool,
    #[serde(default)]
    pub planets: bool,
}

/// One entry of the slide registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideDescriptor {
    pub id: SlideId,
    pub advance: AdvanceMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
    #[serde(default)]
    pub content: SlideContent,
}

impl SlideDescriptor {
    pub fn manual(id: u32) -> Self {
        SlideDescriptor {
            id: SlideId::new(id),
            advance: AdvanceMode::Manual,
            countdown: None,
            content: SlideContent::default(),
        }
    }

    pub fn automatic(id: u32, delay_ms: u64) -> Self {
        SlideDescriptor {
            id: SlideId::new(id),
            advance: AdvanceMode::Automatic {
                delay_ms: Some(delay_ms),
            },
            countdown: None,
            content: SlideContent::default(),
        }
    }

    pub fn with_countdown(mut self, start: NaiveDateTime) -> Self {
        self.countdown = Some(Countdown {
            start,
            caption: String::new(),
            labels: CounterLabels::default(),
        });
        self
    }
}

/// Engine timing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Visual hand-off between slides (milliseconds).
    #[serde(default = "default_transition_delay")]
    pub transition_delay_ms: u64,
    /// Counter recomputation period (milliseconds).
    #[serde(default = "default_counter_interval")]
    pub counter_interval_ms: u64,
    /// Offset of the wall clock that countdown starts are written in.
    /// Unset means UTC natively; the browser facade fills in the host's local offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

fn default_transition_delay() -> u64 {
    500
}

fn default_counter_interval() -> u64 {
    1_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            transition_delay_ms: default_transition_delay(),
            counter_interval_ms: default_counter_interval(),
            utc_offset_minutes: None,
        }
    }
}

/// Presentation configuration passed from JS.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PresentationConfig {
    /// Omitted: use the built-in memory book.
    #[serde(default)]
    pub slides: Option<Vec<SlideDescriptor>>,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Elapsed time split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CounterState {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

/// What the renderer polls after every engine-driven mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub current_id: SlideId,
    pub transitioning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_target: Option<SlideId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter: Option<CounterState>,
}

/// State changes produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EngineEvent {
    TransitionStarted {
        at: Timestamp,
        from: SlideId,
        to: SlideId,
    },
    SlideEntered {
        at: Timestamp,
        id: SlideId,
    },
    CounterUpdated {
        at: Timestamp,
        counter: CounterState,
    },
}

/// Batch returned to JS after every tick (one crossing per host timer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub events: Vec<EngineEvent>,
    pub snapshot: Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_deadline: Option<Timestamp>,
}

/// Why a navigation request had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    OutOfRange,
    AlreadyCurrent,
    InFlight,
    LastSlide,
    NotRunning,
}

/// Result of a navigation request. Never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationOutcome {
    Started { from: SlideId, to: SlideId },
    Ignored(IgnoreReason),
}

impl NavigationOutcome {
    pub fn started(&self) -> bool {
        matches!(self, NavigationOutcome::Started { .. })
    }
}
