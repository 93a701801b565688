//! Deck pipeline: finalizes an outline, then resolves layouts slide by slide.
//!
//! Outline: adjust to `target_count` → validate → auto-correct when needed →
//! re-validate. Layout: one strictly sequential pass in document order, each
//! slide seeing the layout chosen for the one before it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::PlannerError;
use crate::events::{EventEmitter, STAGE_LAYOUT, STAGE_OUTLINE};
use crate::layout::resolver::{LayoutDecision, LayoutResolver, SceneContext};
use crate::layout::safety::overflow_warnings;
use crate::models::outline::Outline;
use crate::models::requirements::SpecialRequirements;
use crate::outline::adjustment::adjust_to_target;
use crate::outline::validation::{auto_correct, validate, OutlineValidation};

/// Upper bound on any requested count (slides, cases, exercise questions).
/// Padding and auto-correction allocate one slide or bullet per unit.
pub const MAX_REQUESTED_COUNT: u32 = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub outline: Outline,
    #[serde(default)]
    pub requirements: SpecialRequirements,
}

impl PlanningRequest {
    /// Rejects contract violations that deserialization cannot catch.
    pub fn check(&self) -> Result<(), PlannerError> {
        let req = &self.requirements;
        if req.target_count == Some(0) {
            return Err(PlannerError::InvalidRequest(
                "target_count must be at least 1".into(),
            ));
        }
        let counts = [
            ("target_count", req.target_count),
            ("min_count", req.min_count),
            ("max_count", req.max_count),
            ("cases.count", Some(req.cases.count)),
            ("exercises.total_count", Some(req.exercises.total_count)),
        ];
        for (field, value) in counts {
            if let Some(n) = value.filter(|n| *n > MAX_REQUESTED_COUNT) {
                return Err(PlannerError::InvalidRequest(format!(
                    "{field} ({n}) exceeds the limit of {MAX_REQUESTED_COUNT}"
                )));
            }
        }
        if let (Some(min), Some(max)) = (req.min_count, req.max_count) {
            if min > max {
                return Err(PlannerError::InvalidRequest(format!(
                    "min_count ({min}) exceeds max_count ({max})"
                )));
            }
        }
        if let Some(slide) = self.outline.slides.iter().find(|s| s.title.trim().is_empty()) {
            return Err(PlannerError::InvalidRequest(format!(
                "slide {} has an empty title",
                slide.index
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineOutcome {
    pub outline: Outline,
    pub initial_validation: OutlineValidation,
    pub final_validation: OutlineValidation,
    /// Auto-correction inserted at least one slide.
    pub corrected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckLayout {
    pub decisions: Vec<LayoutDecision>,
    pub layouts_used: BTreeMap<String, usize>,
    /// Advisory overflow warnings for the renderer.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckPlan {
    pub session_id: String,
    pub outline: OutlineOutcome,
    pub layout: DeckLayout,
}

#[derive(Clone)]
pub struct DeckPlanner {
    resolver: LayoutResolver,
    events: EventEmitter,
}

impl DeckPlanner {
    /// Audit events go to the resolver's emitter.
    pub fn new(resolver: LayoutResolver) -> Self {
        let events = resolver.events().clone();
        DeckPlanner { resolver, events }
    }

    /// A planner whose events carry `session_id`.
    pub fn for_session(&self, session_id: &str) -> Self {
        let events = self.events.with_session(session_id);
        DeckPlanner {
            resolver: self.resolver.clone().with_events(events.clone()),
            events,
        }
    }

    pub fn finalize_outline(&self, outline: Outline, req: &SpecialRequirements) -> OutlineOutcome {
        let target = req.target_count.map(|n| n as usize);
        let adjusted = adjust_to_target(outline, target, &self.events);

        let initial = validate(&adjusted, req);
        self.emit_validation("outline_validated", &initial);

        if !initial.needs_correction() {
            return OutlineOutcome {
                outline: adjusted,
                final_validation: initial.clone(),
                initial_validation: initial,
                corrected: false,
            };
        }

        let before = adjusted.slides.len();
        let corrected = auto_correct(adjusted, req, &self.events);
        let final_validation = validate(&corrected, req);
        self.emit_validation("outline_revalidated", &final_validation);

        if !final_validation.passed {
            warn!(
                issues = final_validation.issues.len(),
                "Outline still fails validation after auto-correction"
            );
        }

        OutlineOutcome {
            corrected: corrected.slides.len() > before,
            outline: corrected,
            initial_validation: initial,
            final_validation,
        }
    }

    pub async fn plan_layouts(&self, outline: &Outline) -> DeckLayout {
        let ctx = SceneContext {
            scene: outline.teaching_scene,
        };
        let catalog = self.resolver.catalog();

        let mut decisions = Vec::with_capacity(outline.slides.len());
        let mut layouts_used: BTreeMap<String, usize> = BTreeMap::new();
        let mut warnings = Vec::new();
        let mut previous: Option<String> = None;

        for slide in &outline.slides {
            let decision = self.resolver.resolve(slide, &ctx, previous.as_deref()).await;

            if let Some(template) = catalog.get(&decision.layout_id) {
                warnings.extend(overflow_warnings(slide, template));
            }
            *layouts_used.entry(decision.layout_id.clone()).or_insert(0) += 1;
            previous = Some(decision.layout_id.clone());
            decisions.push(decision);
        }

        self.events.emit(
            STAGE_LAYOUT,
            "layouts_planned",
            json!({ "slides": decisions.len(), "layouts_used": layouts_used }),
        );
        info!(
            slides = decisions.len(),
            distinct_layouts = layouts_used.len(),
            warnings = warnings.len(),
            "Layouts planned"
        );

        DeckLayout {
            decisions,
            layouts_used,
            warnings,
        }
    }

    pub async fn plan(&self, request: PlanningRequest) -> Result<DeckPlan, PlannerError> {
        request.check()?;

        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let scoped = self.for_session(&session_id);

        info!(
            session_id = %session_id,
            slides = request.outline.slides.len(),
            "Planning deck"
        );

        let outline = scoped.finalize_outline(request.outline, &request.requirements);
        let layout = scoped.plan_layouts(&outline.outline).await;

        Ok(DeckPlan {
            session_id,
            outline,
            layout,
        })
    }

    fn emit_validation(&self, kind: &str, validation: &OutlineValidation) {
        self.events.emit(
            STAGE_OUTLINE,
            kind,
            json!({
                "passed": validation.passed,
                "warnings": validation.warnings(),
            }),
        );
    }
}
