// Derived view model for the renderer.
// The engine stays render-agnostic; this folds navigation state and slide payload
// into the handful of decisions the page layer would otherwise re-derive.

use serde::{Deserialize, Serialize};

use crate::navigation::NavigationEngine;
use crate::types::*;

pub const DEFAULT_BACKGROUND: &str = "linear-gradient(to bottom, #9c27b033, #000000)";
pub const DEFAULT_CHAPTER_TITLE_BACKGROUND: &str = "linear-gradient(135deg, #9c27b0, #e91e63)";

/// Fade direction of the slide container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Entering,
    Leaving,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterField {
    pub label: String,
    pub value: u64,
}

/// Everything needed to draw the active slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideView {
    pub id: SlideId,
    pub layout: Layout,
    pub phase: Phase,
    pub background: String,
    pub show_stars: bool,
    pub show_planets: bool,
    /// Manual slides other than the last one show a "next" affordance.
    pub show_advance_affordance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_embed_url: Option<String>,
    pub chapter_title_background: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counter_caption: Option<String>,
    pub counter: Vec<CounterField>,
    pub content: SlideContent,
}

impl SlideView {
    /// Build the view for the engine's active slide.
    pub fn build(engine: &NavigationEngine) -> Option<SlideView> {
        let slide = engine.current_slide()?;
        let is_last = engine.registry().is_last(slide.id);
        let content = &slide.content;

        let labels = slide
            .countdown
            .as_ref()
            .map(|c| c.labels.clone())
            .unwrap_or_default();
        let counter: Vec<CounterField> = engine
            .counter()
            .map(|c| {
                c.labelled(&labels)
                    .iter()
                    .map(|(label, value)| CounterField {
                        label: label.to_string(),
                        value: *value,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(SlideView {
            id: slide.id,
            layout: content.layout,
            phase: if engine.is_transitioning() {
                Phase::Leaving
            } else {
                Phase::Entering
            },
            background: content
                .background
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKGROUND.to_string()),
            show_stars: content.stars,
            show_planets: content.planets,
            show_advance_affordance: slide.advance.is_manual() && !is_last,
            video_embed_url: content.video.as_ref().map(embed_url),
            chapter_title_background: content
                .chapter_title_background
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAPTER_TITLE_BACKGROUND.to_string()),
            counter_caption: slide.countdown.as_ref().map(|c| c.caption.clone()),
            counter,
            content: content.clone(),
        })
    }
}

/// Player URL for an embedded video. Autoplay stays off; controls on.
pub fn embed_url(video: &VideoEmbed) -> String {
    format!(
        "https://www.youtube.com/embed/{}?autoplay=0&controls=1",
        video.video_id
    )
}
