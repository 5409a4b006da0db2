// memory_book_engine: slide navigation and timing for the animated memory book.
// All timing and navigation logic lives here; the JS page only renders what it is told
// and forwards clicks and `Date.now()`.

mod counter;
mod error;
mod navigation;
mod registry;
mod timer;
mod types;
mod view;

use wasm_bindgen::prelude::*;

pub use counter::elapsed;
pub use error::EngineError;
pub use navigation::NavigationEngine;
pub use registry::SlideRegistry;
pub use timer::{Fired, TimerKind, TimerTable};
pub use types::*;
pub use view::{embed_url, CounterField, Phase, SlideView};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Presentation session exposed to JavaScript.
///
/// The page calls `tick` from a single host timer scheduled at `next_deadline`,
/// forwards navigation clicks, and re-renders from the returned report.
#[wasm_bindgen]
pub struct Presentation {
    engine: NavigationEngine,
}

#[wasm_bindgen]
impl Presentation {
    /// Start a session from a `PresentationConfig` JSON document.
    /// Omitting `slides` plays the built-in memory book.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, now_ms: f64) -> Result<Presentation, JsValue> {
        let config: PresentationConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?;

        Presentation::from_config(config, Timestamp::from_js_millis(now_ms))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Start a session on the built-in memory book with default timings.
    pub fn builtin(now_ms: f64) -> Result<Presentation, JsValue> {
        let now = Timestamp::from_js_millis(now_ms);
        Presentation::from_config(PresentationConfig::default(), now)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Fire due timers and return a JSON `TickReport`.
    pub fn tick(&mut self, now_ms: f64) -> Result<String, JsValue> {
        let report = self.tick_report(Timestamp::from_js_millis(now_ms));
        serde_json::to_string(&report)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Returns whether a transition started.
    pub fn advance_to_next(&mut self, now_ms: f64) -> bool {
        self.engine
            .advance_to_next(Timestamp::from_js_millis(now_ms))
            .started()
    }

    /// Returns whether a transition started.
    pub fn jump_to(&mut self, id: u32, now_ms: f64) -> bool {
        self.engine
            .jump_to(id, Timestamp::from_js_millis(now_ms))
            .started()
    }

    pub fn current_id(&self) -> u32 {
        self.engine.current_id().as_u32()
    }

    pub fn transitioning(&self) -> bool {
        self.engine.is_transitioning()
    }

    pub fn slide_count(&self) -> u32 {
        self.engine.registry().len() as u32
    }

    /// Epoch milliseconds at which `tick` should next be called, if any timer is armed.
    pub fn next_deadline(&self) -> Option<f64> {
        self.engine.next_deadline().map(|t| t.as_js_millis())
    }

    /// JSON `Snapshot` of navigation and counter state.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.engine.snapshot())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// JSON `SlideView` for the active slide.
    pub fn view(&self) -> Result<String, JsValue> {
        serde_json::to_string(&SlideView::build(&self.engine))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn end_session(&mut self) {
        self.engine.end_session();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl Presentation {
    /// `tick` against the browser clock.
    pub fn tick_now(&mut self) -> Result<String, JsValue> {
        self.tick(js_sys::Date::now())
    }
}

/// Local UTC offset of the browser at `now`, east-positive.
#[cfg(target_arch = "wasm32")]
fn host_utc_offset_minutes(now: Timestamp) -> Option<i32> {
    let date = js_sys::Date::new(&JsValue::from_f64(now.as_js_millis()));
    Some(-(date.get_timezone_offset() as i32))
}

#[cfg(not(target_arch = "wasm32"))]
fn host_utc_offset_minutes(_now: Timestamp) -> Option<i32> {
    None
}

impl Presentation {
    /// Build and start a session. Native entry point; errors stay typed.
    ///
    /// An unset `utc_offset_minutes` takes the browser's local offset on wasm32,
    /// so countdown starts read as local wall-clock time there.
    pub fn from_config(
        config: PresentationConfig,
        now: Timestamp,
    ) -> Result<Presentation, EngineError> {
        let registry = match config.slides {
            Some(slides) => SlideRegistry::new(slides)?,
            None => SlideRegistry::builtin()?,
        };
        let mut engine_config = config.engine;
        if engine_config.utc_offset_minutes.is_none() {
            engine_config.utc_offset_minutes = host_utc_offset_minutes(now);
        }
        let mut engine = NavigationEngine::new(registry, engine_config)?;
        engine.start(now);
        Ok(Presentation { engine })
    }

    pub fn tick_report(&mut self, now: Timestamp) -> TickReport {
        let events = self.engine.tick(now);
        TickReport {
            events,
            snapshot: self.engine.snapshot(),
            next_deadline: self.engine.next_deadline(),
        }
    }

    pub fn engine(&self) -> &NavigationEngine {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presentation_from_json_works() {
        let config = r#"{
            "slides": [
                { "id": 1, "advance": { "mode": "automatic", "delay_ms": 2000 } },
                { "id": 2, "advance": { "mode": "manual" } }
            ],
            "engine": { "transition_delay_ms": 300 }
        }"#;
        let mut presentation = Presentation::new(config, 0.0).expect("Should parse valid config");
        assert_eq!(presentation.slide_count(), 2);
        assert_eq!(presentation.next_deadline(), Some(2_000.0));

        let report: TickReport =
            serde_json::from_str(&presentation.tick(2_300.0).unwrap()).unwrap();
        assert_eq!(report.snapshot.current_id, SlideId::new(2));
        assert!(!report.snapshot.transitioning);
        assert_eq!(report.next_deadline, None);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, EngineEvent::TransitionStarted { .. })));
    }

    #[test]
    fn builtin_presentation_starts_on_title() {
        let presentation = Presentation::builtin(1_700_000_000_000.0).unwrap();
        assert_eq!(presentation.current_id(), 1);
        assert_eq!(presentation.slide_count(), 12);
        assert!(!presentation.transitioning());

        let view: SlideView = serde_json::from_str(&presentation.view().unwrap()).unwrap();
        assert_eq!(view.layout, Layout::Title);
        assert!(view.show_stars);
    }

    #[test]
    fn clicks_drive_navigation() {
        let mut presentation = Presentation::builtin(0.0).unwrap();
        assert!(presentation.jump_to(8, 10.0));
        assert!(!presentation.advance_to_next(20.0));
        presentation.tick(510.0).unwrap();
        assert_eq!(presentation.current_id(), 8);

        assert!(presentation.advance_to_next(600.0));
        presentation.tick(1_100.0).unwrap();
        assert_eq!(presentation.current_id(), 9);
    }

    #[test]
    fn invalid_registry_is_a_typed_error() {
        let config = PresentationConfig {
            slides: Some(vec![]),
            engine: EngineConfig::default(),
        };
        assert!(matches!(
            Presentation::from_config(config, Timestamp::default()),
            Err(EngineError::EmptyRegistry)
        ));
    }

    #[test]
    fn explicit_utc_offset_is_kept() {
        let config: PresentationConfig =
            serde_json::from_str(r#"{"engine":{"utc_offset_minutes":-180}}"#).unwrap();
        let presentation = Presentation::from_config(config, Timestamp::default()).unwrap();
        assert_eq!(presentation.engine().config().utc_offset_minutes, Some(-180));
    }

    #[test]
    fn end_session_stops_ticks() {
        let mut presentation = Presentation::builtin(0.0).unwrap();
        presentation.end_session();
        assert_eq!(presentation.next_deadline(), None);
        let report = presentation.tick_report(Timestamp::from_millis(60_000));
        assert!(report.events.is_empty());
        assert_eq!(report.snapshot.current_id, SlideId::new(1));
    }
}
