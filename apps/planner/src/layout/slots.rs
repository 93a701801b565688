//! Image slot generation: one themed placeholder request per slot of the
//! resolved layout.
//!
//! Geometry, aspect ratio and position always come from the layout, never from
//! the upstream asset hints, so a grid stays a grid whatever size was suggested.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layout::catalog::{AspectRatio, LayoutTemplate, SlotPosition, VisualStyle};
use crate::layout::keywords::slot_keywords;
use crate::models::slide::{Slide, SlideType};

const CONTEXT_SEPARATOR: &str = " | ";
const CONTEXT_BULLETS: usize = 3;
const RETHEME_CONTEXT_CHARS: usize = 50;
const RETHEME_THEME_CHARS: usize = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSlot {
    /// `page{page_index}_slot{ordinal}`, stable across re-runs.
    pub slot_id: String,
    pub page_index: usize,
    pub theme: String,
    pub keywords: Vec<String>,
    pub context: String,
    pub visual_style: VisualStyle,
    pub aspect_ratio: AspectRatio,
    pub layout_position: SlotPosition,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub priority: u8,
}

/// Builds the slots for `slide` rendered with `template`. Layouts without image
/// regions yield nothing.
pub fn generate_image_slots(slide: &Slide, template: &LayoutTemplate) -> Vec<ImageSlot> {
    let visuals: Vec<_> = slide.visual_assets().collect();
    let fallback_theme = visuals.iter().find_map(|a| a.theme());
    let bullet_context = build_context(slide);

    let mut slots: Vec<ImageSlot> = template
        .image_slots
        .iter()
        .enumerate()
        .map(|(ordinal, def)| {
            let own_theme = visuals.get(ordinal).and_then(|a| a.theme());
            let (theme, context) = match own_theme {
                Some(theme) => (theme.to_string(), format!("{} - {}", slide.title, theme)),
                None => (
                    fallback_theme.unwrap_or(slide.title.as_str()).to_string(),
                    bullet_context.clone(),
                ),
            };

            ImageSlot {
                slot_id: format!("page{}_slot{}", slide.index, ordinal),
                page_index: slide.index,
                keywords: slot_keywords(&slide.title, &theme),
                theme,
                context,
                visual_style: def
                    .default_style
                    .unwrap_or_else(|| style_for_slide_type(slide.slide_type)),
                aspect_ratio: def.aspect_ratio,
                layout_position: def.position,
                x: def.x,
                y: def.y,
                w: def.w,
                h: def.h,
                priority: def.priority,
            }
        })
        .collect();

    retheme_duplicates(slide, &mut slots);
    slots
}

/// `title | bullet1 | bullet2 | bullet3`
fn build_context(slide: &Slide) -> String {
    std::iter::once(slide.title.as_str())
        .chain(slide.bullets.iter().take(CONTEXT_BULLETS).map(String::as_str))
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// A later slot repeating an earlier slot's context is re-themed from the bullet
/// at its own ordinal, so multi-image layouts do not request the same picture.
fn retheme_duplicates(slide: &Slide, slots: &mut [ImageSlot]) {
    let mut seen: HashSet<String> = HashSet::new();

    for (ordinal, slot) in slots.iter_mut().enumerate() {
        if seen.contains(&slot.context) {
            if let Some(bullet) = slide.bullets.get(ordinal) {
                let clean: String = bullet
                    .replace('\n', " ")
                    .chars()
                    .take(RETHEME_CONTEXT_CHARS)
                    .collect();
                let short: String = clean.chars().take(RETHEME_THEME_CHARS).collect();

                slot.context = format!("{} 特写: {}", slide.title, clean);
                slot.theme = format!("{} - {}", slide.title, short);
                slot.keywords = slot_keywords(&slide.title, &clean);
            }
        }
        seen.insert(slot.context.clone());
    }
}

fn style_for_slide_type(slide_type: SlideType) -> VisualStyle {
    match slide_type {
        SlideType::Concept => VisualStyle::Schematic,
        SlideType::Steps => VisualStyle::Diagram,
        SlideType::Warning => VisualStyle::Warning,
        SlideType::Cover | SlideType::Title => VisualStyle::Illustration,
        _ => VisualStyle::Photo,
    }
}
