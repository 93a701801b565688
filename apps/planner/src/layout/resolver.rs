//! Layout Resolver: assigns one layout per slide through a decision cascade.
//!
//! # Cascade (first match wins)
//! 1. Type-forced mapping (cover/title/bridge, objectives/summary/agenda)
//! 2. Semantic hint, if it names a catalog layout
//! 3. Keyword match on title and rendered text
//! 4. Feature scoring (see `scoring`)
//!
//! Two safety nets then always run: anti-repetition against the previous slide's
//! layout, and overflow downgrade to `title_bullets`. Image slots are generated
//! for the final layout.
//!
//! The downgrade runs last and is not re-checked for repetition: two overflowing
//! slides in a row both land on `title_bullets`. Readability wins over variety.
//!
//! Slides must be resolved in document order: each call reads the layout chosen
//! for the slide before it.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::events::{EventEmitter, STAGE_LAYOUT};
use crate::layout::catalog::{LayoutCatalog, FALLBACK_LAYOUT_ID};
use crate::layout::hint::{request_hint, HintRequest, LayoutHintProvider, SlideSummary};
use crate::layout::safety::{overflow_reason, substitute_repeat, OverflowReason};
use crate::layout::scoring::{pick_by_score, SlideFeatures};
use crate::layout::slots::{generate_image_slots, ImageSlot};
use crate::models::outline::TeachingScene;
use crate::models::slide::{Slide, SlideType};

const DEFAULT_HINT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Checked in order; the first table whose keyword occurs wins.
const KEYWORD_TABLE: [(&str, &[&str]); 3] = [
    (
        "operation_steps",
        &["步骤", "操作", "流程", "方法", "怎么做", "如何", "实训"],
    ),
    (
        "concept_comparison",
        &["对比", "区别", "正确", "错误", "vs", "比较", "优缺点"],
    ),
    ("grid_4", &["工具", "设备", "部件", "类型", "分类"]),
];

fn forced_layout(slide_type: SlideType) -> Option<&'static str> {
    match slide_type {
        SlideType::Title | SlideType::Cover | SlideType::Bridge => Some("title_only"),
        SlideType::Objectives | SlideType::Summary | SlideType::Agenda => Some("title_bullets"),
        _ => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Decision types
// ────────────────────────────────────────────────────────────────────────────

/// Deck-level context shared by every slide's resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneContext {
    pub scene: TeachingScene,
}

/// Which cascade layer produced the candidate layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionSource {
    TypeMapping,
    SemanticHint,
    KeywordMatch,
    FeatureScore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAssignment {
    pub slide_index: usize,
    pub layout_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDecision {
    pub slide_index: usize,
    pub layout_id: String,
    pub source: DecisionSource,
    /// Candidate replaced by the anti-repetition pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substituted_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downgrade: Option<OverflowReason>,
    pub image_slots: Vec<ImageSlot>,
}

impl LayoutDecision {
    pub fn assignment(&self) -> LayoutAssignment {
        LayoutAssignment {
            slide_index: self.slide_index,
            layout_id: self.layout_id.clone(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LayoutResolver {
    catalog: Arc<LayoutCatalog>,
    hint: Option<Arc<dyn LayoutHintProvider>>,
    hint_timeout: Duration,
    events: EventEmitter,
}

impl LayoutResolver {
    pub fn new(catalog: Arc<LayoutCatalog>) -> Self {
        LayoutResolver {
            catalog,
            hint: None,
            hint_timeout: DEFAULT_HINT_TIMEOUT,
            events: EventEmitter::noop(),
        }
    }

    pub fn with_hint_provider(
        mut self,
        provider: Arc<dyn LayoutHintProvider>,
        timeout: Duration,
    ) -> Self {
        self.hint = Some(provider);
        self.hint_timeout = timeout;
        self
    }

    pub fn with_events(mut self, events: EventEmitter) -> Self {
        self.events = events;
        self
    }

    pub fn catalog(&self) -> &LayoutCatalog {
        &self.catalog
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Resolves one slide, asking the hint provider (if any) first.
    ///
    /// The provider is skipped for type-forced slides, and a timeout or error
    /// resolves exactly as if no hint had been offered.
    pub async fn resolve(
        &self,
        slide: &Slide,
        ctx: &SceneContext,
        previous: Option<&str>,
    ) -> LayoutDecision {
        let hint = match &self.hint {
            Some(provider) if self.forced(slide).is_none() => {
                let request = self.hint_request(slide, previous);
                match request_hint(provider.as_ref(), &request, self.hint_timeout).await {
                    Ok(hint) => hint,
                    Err(e) => {
                        warn!(slide_index = slide.index, "Layout hint failed, ignoring: {e}");
                        self.events.emit(
                            STAGE_LAYOUT,
                            "hint_failed",
                            json!({ "slide_index": slide.index, "error": e.to_string() }),
                        );
                        None
                    }
                }
            }
            _ => None,
        };
        self.resolve_with_hint(slide, ctx, previous, hint.as_deref())
    }

    /// Synchronous resolution given an already-obtained hint.
    pub fn resolve_with_hint(
        &self,
        slide: &Slide,
        ctx: &SceneContext,
        previous: Option<&str>,
        hint: Option<&str>,
    ) -> LayoutDecision {
        let (candidate, source) = self.candidate(slide, ctx, previous, hint);
        let mut layout_id = candidate.to_string();

        let mut substituted_from = None;
        if let Some(alternative) = substitute_repeat(&self.catalog, &layout_id, previous) {
            self.events.emit(
                STAGE_LAYOUT,
                "layout_substituted",
                json!({
                    "slide_index": slide.index,
                    "from": layout_id,
                    "to": alternative,
                }),
            );
            substituted_from = Some(std::mem::replace(&mut layout_id, alternative.to_string()));
        }

        let mut downgrade = None;
        if layout_id != FALLBACK_LAYOUT_ID {
            let reason = self
                .catalog
                .get(&layout_id)
                .and_then(|template| overflow_reason(slide, template));
            if let Some(reason) = reason {
                self.events.emit(
                    STAGE_LAYOUT,
                    "layout_downgraded",
                    json!({
                        "slide_index": slide.index,
                        "from": layout_id,
                        "to": FALLBACK_LAYOUT_ID,
                        "reason": reason,
                    }),
                );
                downgrade = Some(reason);
                layout_id = FALLBACK_LAYOUT_ID.to_string();
            }
        }

        let image_slots = self
            .catalog
            .get(&layout_id)
            .map(|template| generate_image_slots(slide, template))
            .unwrap_or_default();

        debug!(
            slide_index = slide.index,
            layout_id = %layout_id,
            source = ?source,
            slots = image_slots.len(),
            "Layout resolved"
        );

        LayoutDecision {
            slide_index: slide.index,
            layout_id,
            source,
            substituted_from,
            downgrade,
            image_slots,
        }
    }

    pub fn hint_request(&self, slide: &Slide, previous: Option<&str>) -> HintRequest {
        HintRequest {
            slide_summary: SlideSummary::from_slide(slide),
            catalog_summary: self.catalog.summary(),
            previous_layout_id: previous.map(str::to_string),
        }
    }

    fn forced(&self, slide: &Slide) -> Option<&'static str> {
        forced_layout(slide.slide_type).filter(|id| self.catalog.contains(id))
    }

    fn candidate<'a>(
        &'a self,
        slide: &Slide,
        ctx: &SceneContext,
        previous: Option<&str>,
        hint: Option<&'a str>,
    ) -> (&'a str, DecisionSource) {
        if let Some(id) = self.forced(slide) {
            return (id, DecisionSource::TypeMapping);
        }

        if let Some(hint) = hint.map(str::trim) {
            if self.catalog.contains(hint) {
                return (hint, DecisionSource::SemanticHint);
            }
            debug!(slide_index = slide.index, hint, "Hint names no catalog layout");
        }

        if let Some(id) = self.keyword_layout(slide) {
            return (id, DecisionSource::KeywordMatch);
        }

        let features = SlideFeatures::from_slide(slide, ctx.scene, previous);
        let id = pick_by_score(&self.catalog, &features).unwrap_or(FALLBACK_LAYOUT_ID);
        (id, DecisionSource::FeatureScore)
    }

    fn keyword_layout(&self, slide: &Slide) -> Option<&'static str> {
        let mut text = slide.title.to_lowercase();
        for line in slide.rendered_lines() {
            text.push(' ');
            text.push_str(&line.to_lowercase());
        }

        KEYWORD_TABLE
            .iter()
            .filter(|(id, _)| self.catalog.contains(id))
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(id, _)| *id)
    }
}
