// Slide registry: the immutable, ordered list of slides a presentation walks through.
// Validated once on construction so the engine can navigate by id ± 1 without lookups failing.

use log::debug;

use crate::error::EngineError;
use crate::types::*;

const BUILTIN_BOOK: &str = include_str!("../assets/memory_book.json");

/// Ordered, validated slide list. Ids run densely from 1 to `len()`.
#[derive(Debug, Clone)]
pub struct SlideRegistry {
    slides: Vec<SlideDescriptor>,
}

impl SlideRegistry {
    /// Validate and wrap a slide list.
    ///
    /// Slides are sorted by id first; the sorted ids must then be exactly `1..=N`
    /// and every automatic delay must be positive.
    pub fn new(mut slides: Vec<SlideDescriptor>) -> Result<Self, EngineError> {
        if slides.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }

        slides.sort_by_key(|s| s.id);

        for (position, slide) in slides.iter().enumerate() {
            let expected = position as u32 + 1;
            if slide.id.as_u32() != expected {
                return Err(EngineError::NonDenseIds {
                    position,
                    expected,
                    found: slide.id.as_u32(),
                });
            }
            if slide.advance.auto_advance_delay() == Some(0) {
                return Err(EngineError::InvalidDelay { id: slide.id });
            }
        }

        debug!("registry: loaded {} slides", slides.len());
        Ok(SlideRegistry { slides })
    }

    /// Parse a JSON array of slide descriptors.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let slides: Vec<SlideDescriptor> = serde_json::from_str(json)?;
        Self::new(slides)
    }

    /// The twelve-slide memory book compiled into the crate.
    pub fn builtin() -> Result<Self, EngineError> {
        Self::from_json(BUILTIN_BOOK)
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false for a constructed registry; kept for the `len` convention.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn first_id(&self) -> SlideId {
        SlideId::first()
    }

    pub fn last_id(&self) -> SlideId {
        SlideId::new(self.slides.len() as u32)
    }

    pub fn contains(&self, id: SlideId) -> bool {
        id.as_u32() >= 1 && id.as_u32() as usize <= self.slides.len()
    }

    pub fn is_last(&self, id: SlideId) -> bool {
        id == self.last_id()
    }

    pub fn get(&self, id: SlideId) -> Option<&SlideDescriptor> {
        if !self.contains(id) {
            return None;
        }
        self.slides.get(id.as_u32() as usize - 1)
    }

    pub fn slides(&self) -> &[SlideDescriptor] {
        &self.slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_book_loads() {
        let registry = SlideRegistry::builtin().expect("built-in book should be valid");
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.last_id(), SlideId::new(12));

        let counter_slide = registry.get(SlideId::new(6)).unwrap();
        assert_eq!(counter_slide.advance.auto_advance_delay(), Some(5_000));
        assert!(counter_slide.countdown.is_some());
        assert_eq!(counter_slide.content.layout, Layout::SpecialCounter);

        let music = registry.get(SlideId::new(7)).unwrap();
        assert!(music.advance.is_manual());
        assert_eq!(music.content.video.as_ref().unwrap().video_id, "pRpeEdMmmQ0");

        let last = registry.get(SlideId::new(12)).unwrap();
        assert_eq!(last.content.layout, Layout::Final);
        assert!(last.countdown.is_some());
    }

    #[test]
    fn empty_registry_rejected() {
        assert!(matches!(
            SlideRegistry::new(vec![]),
            Err(EngineError::EmptyRegistry)
        ));
    }

    #[test]
    fn gaps_rejected() {
        let result =
            SlideRegistry::new(vec![SlideDescriptor::manual(1), SlideDescriptor::manual(3)]);
        assert!(matches!(
            result,
            Err(EngineError::NonDenseIds {
                position: 1,
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn registry_starting_at_zero_rejected() {
        let result =
            SlideRegistry::new(vec![SlideDescriptor::manual(0), SlideDescriptor::manual(1)]);
        assert!(matches!(result, Err(EngineError::NonDenseIds { .. })));
    }

    #[test]
    fn zero_delay_rejected() {
        let result = SlideRegistry::new(vec![SlideDescriptor::automatic(1, 0)]);
        assert!(matches!(result, Err(EngineError::InvalidDelay { .. })));
    }

    #[test]
    fn unsorted_input_is_ordered() {
        let registry = SlideRegistry::new(vec![
            SlideDescriptor::manual(2),
            SlideDescriptor::automatic(1, 1_000),
        ])
        .unwrap();
        let first = registry.get(SlideId::new(1)).unwrap();
        assert_eq!(first.advance.auto_advance_delay(), Some(1_000));
        assert!(registry.get(SlideId::new(2)).unwrap().advance.is_manual());
    }

    #[test]
    fn lookup_bounds() {
        let registry =
            SlideRegistry::new(vec![SlideDescriptor::manual(1), SlideDescriptor::manual(2)])
                .unwrap();
        assert!(registry.get(SlideId::new(0)).is_none());
        assert!(registry.get(SlideId::new(3)).is_none());
        assert!(registry.is_last(SlideId::new(2)));
        assert!(!registry.is_last(SlideId::new(1)));
    }

    #[test]
    fn from_json_minimal() {
        let registry = SlideRegistry::from_json(
            r#"[
                { "id": 1, "advance": { "mode": "automatic", "delay_ms": 2000 } },
                { "id": 2, "advance": { "mode": "manual" } }
            ]"#,
        )
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(SlideId::new(1)).unwrap().content.layout, Layout::Title);
    }
}
