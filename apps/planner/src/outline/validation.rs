//! Outline Validation & Auto-Correction.
//!
//! `validate` checks a finalized outline against the request's structural
//! requirements. Every check runs; nothing returns early. Structural issues make
//! the outline fail, soft issues are reported only.
//!
//! `auto_correct` only ever adds pages: missing cases, a missing exercise page,
//! and a dedicated ideological summary. Insertions go before the first summary
//! slide, or at the end when there is none.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::events::{EventEmitter, STAGE_OUTLINE};
use crate::models::outline::Outline;
use crate::models::requirements::{IntegrationMethod, SpecialRequirements};
use crate::models::slide::{Slide, SlideType};

const EXERCISE_SHORTFALL_RATIO: f64 = 0.8;
const IDEOLOGICAL_TITLE_MARKER: &str = "思政";
const DEFAULT_CASE_TOPIC: &str = "应用示例";

const CASE_PLACEHOLDER_BULLETS: [&str; 5] = [
    "案例背景：（待补充具体情境）",
    "问题描述：（待补充问题）",
    "分析过程：（待补充分析步骤）",
    "解决方案：（待补充方案）",
    "总结提升：（待补充知识点总结）",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationCheck {
    CaseCount,
    ExercisePresence,
    ExerciseCount,
    IdeologicalContent,
    MinSlideCount,
    MaxSlideCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Outline is not acceptable as is.
    Structural,
    /// Worth reporting; outline stays usable.
    Soft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub check: ValidationCheck,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineValidation {
    pub passed: bool,
    pub issues: Vec<ValidationIssue>,
}

impl OutlineValidation {
    pub fn warnings(&self) -> Vec<String> {
        self.issues.iter().map(|i| i.message.clone()).collect()
    }

    pub fn has_issue(&self, check: ValidationCheck) -> bool {
        self.issues.iter().any(|i| i.check == check)
    }

    /// True when an issue exists that `auto_correct` knows how to fix.
    pub fn needs_correction(&self) -> bool {
        !self.passed
            || self.issues.iter().any(|i| {
                matches!(
                    i.check,
                    ValidationCheck::CaseCount
                        | ValidationCheck::ExercisePresence
                        | ValidationCheck::IdeologicalContent
                )
            })
    }
}

fn issue(check: ValidationCheck, severity: Severity, message: String) -> ValidationIssue {
    ValidationIssue {
        check,
        severity,
        message,
    }
}

fn is_ideological(slide: &Slide) -> bool {
    slide.slide_type == SlideType::IdeologicalSummary
        || slide.title.contains(IDEOLOGICAL_TITLE_MARKER)
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

pub fn validate(outline: &Outline, req: &SpecialRequirements) -> OutlineValidation {
    let mut issues = Vec::new();

    if req.cases.enabled {
        let expected = req.cases.count as usize;
        let actual = outline.count_of(|t| t.is_case());
        if actual != expected {
            let severity = if actual.abs_diff(expected) > 1 {
                Severity::Structural
            } else {
                Severity::Soft
            };
            issues.push(issue(
                ValidationCheck::CaseCount,
                severity,
                format!("⚠️ 案例页数量不匹配: 用户要求{expected}个，实际生成{actual}个"),
            ));
        }
    }

    if req.exercises.enabled {
        let expected = req.exercises.total_count;
        let exercise_slides: Vec<&Slide> = outline
            .slides
            .iter()
            .filter(|s| s.slide_type.is_exercise())
            .collect();

        if exercise_slides.is_empty() {
            issues.push(issue(
                ValidationCheck::ExercisePresence,
                Severity::Structural,
                format!("⚠️ 缺少习题页，用户要求包含{expected}道题"),
            ));
        } else {
            let actual: usize = exercise_slides.iter().map(|s| s.bullets.len()).sum();
            if (actual as f64) < f64::from(expected) * EXERCISE_SHORTFALL_RATIO {
                issues.push(issue(
                    ValidationCheck::ExerciseCount,
                    Severity::Soft,
                    format!("⚠️ 习题数量可能不足: 用户要求{expected}道，实际约{actual}道"),
                ));
            }
        }
    }

    if req.ideological_education.enabled && !outline.slides.iter().any(is_ideological) {
        issues.push(issue(
            ValidationCheck::IdeologicalContent,
            Severity::Soft,
            "⚠️ 缺少思政教育内容，但用户启用了思政融入".to_string(),
        ));
    }

    let total = outline.slides.len();
    if let Some(min) = req.min_count {
        if total < min as usize {
            issues.push(issue(
                ValidationCheck::MinSlideCount,
                Severity::Structural,
                format!("⚠️ 页面总数不足: 最少需要{min}页，实际{total}页"),
            ));
        }
    }
    if let Some(max) = req.max_count {
        if total > max as usize {
            issues.push(issue(
                ValidationCheck::MaxSlideCount,
                Severity::Soft,
                format!("⚠️ 页面总数超标: 最多{max}页，实际{total}页"),
            ));
        }
    }

    OutlineValidation {
        passed: !issues.iter().any(|i| i.severity == Severity::Structural),
        issues,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Auto-correction
// ────────────────────────────────────────────────────────────────────────────

pub fn auto_correct(
    mut outline: Outline,
    req: &SpecialRequirements,
    events: &EventEmitter,
) -> Outline {
    if req.cases.enabled {
        let expected = req.cases.count as usize;
        let current = outline.count_of(|t| t.is_case());
        if current < expected {
            let missing = expected - current;
            events.emit(
                STAGE_OUTLINE,
                "auto_adding_cases",
                json!({ "missing_count": missing }),
            );

            let topic = outline
                .knowledge_points
                .first()
                .map(String::as_str)
                .unwrap_or(DEFAULT_CASE_TOPIC)
                .to_string();
            let at = outline.insertion_point();
            for i in 0..missing {
                let mut slide = Slide::new(
                    SlideType::Case,
                    format!("补充案例{}：{}", current + i + 1, topic),
                    CASE_PLACEHOLDER_BULLETS.iter().map(|b| b.to_string()).collect(),
                );
                slide.notes = Some("自动生成的案例页，请在编辑器中完善内容".to_string());
                outline.slides.insert(at + i, slide);
            }
        }
    }

    if req.exercises.enabled && outline.count_of(|t| t.is_exercise()) == 0 {
        let total = req.exercises.total_count;
        events.emit(
            STAGE_OUTLINE,
            "auto_adding_exercises",
            json!({ "total_count": total }),
        );

        let mut slide = Slide::new(
            SlideType::Exercises,
            "习题巩固",
            (1..=total)
                .map(|i| format!("题目{i}：（待补充具体题目）"))
                .collect(),
        );
        slide.notes = Some("自动生成的习题页，请在编辑器中完善题目内容".to_string());
        let at = outline.insertion_point();
        outline.slides.insert(at, slide);
    }

    let ideology = &req.ideological_education;
    if ideology.enabled
        && ideology.integration_method == IntegrationMethod::DedicatedSection
        && !outline.slides.iter().any(is_ideological)
    {
        events.emit(
            STAGE_OUTLINE,
            "auto_adding_ideological",
            json!({ "focus_points": ideology.focus_points }),
        );

        let mut slide = Slide::new(
            SlideType::IdeologicalSummary,
            "课程思政总结",
            ideology
                .focus_points
                .iter()
                .map(|p| format!("{p}：（待补充具体内容）"))
                .collect(),
        );
        slide.notes = Some("自动生成的思政总结页，请在编辑器中完善内容".to_string());
        let at = outline.insertion_point();
        outline.slides.insert(at, slide);
    }

    outline.reindex();
    info!(slides = outline.slides.len(), "Outline auto-corrected");
    outline
}
