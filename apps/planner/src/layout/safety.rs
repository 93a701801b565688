//! Safety nets applied to every layout candidate, whichever layer produced it.
//!
//! - Anti-repetition: a candidate equal to the previous slide's layout is swapped
//!   for its first alternative present in the catalog.
//! - Overflow downgrade: text the candidate cannot hold forces the generic
//!   bullet layout.
//!
//! `overflow_warnings` is advisory only and never changes a decision.

use serde::{Deserialize, Serialize};

use crate::layout::catalog::{LayoutCatalog, LayoutTemplate};
use crate::models::slide::Slide;

const TITLE_ONLY_LAYOUT_ID: &str = "title_only";

const MAX_TITLE_CHARS: usize = 45;
const MAX_LINE_CHARS: usize = 110;
const CAPACITY_BUFFER_CHARS: usize = 50;
const ABSOLUTE_CEILING_CHARS: usize = 600;

const WARN_TITLE_CHARS: usize = 50;
const WARN_LINE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowReason {
    TitleTooLong,
    BulletTooLong,
    ExceedsLayoutCapacity,
    ExceedsAbsoluteCeiling,
}

impl OverflowReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverflowReason::TitleTooLong => "title_too_long",
            OverflowReason::BulletTooLong => "bullet_too_long",
            OverflowReason::ExceedsLayoutCapacity => "exceeds_layout_capacity",
            OverflowReason::ExceedsAbsoluteCeiling => "exceeds_absolute_ceiling",
        }
    }
}

/// Substitute for `candidate` when it repeats `previous`. `None` means keep the
/// candidate: either it is no repeat, or no alternative exists in the catalog.
pub fn substitute_repeat<'a>(
    catalog: &'a LayoutCatalog,
    candidate: &str,
    previous: Option<&str>,
) -> Option<&'a str> {
    if previous != Some(candidate) {
        return None;
    }
    catalog
        .get(candidate)?
        .alternatives
        .iter()
        .map(String::as_str)
        .find(|alt| *alt != candidate && catalog.contains(alt))
}

/// First overflow condition `slide` violates under `template`, if any.
pub fn overflow_reason(slide: &Slide, template: &LayoutTemplate) -> Option<OverflowReason> {
    if template.layout_id != TITLE_ONLY_LAYOUT_ID
        && slide.title.chars().count() > MAX_TITLE_CHARS
    {
        return Some(OverflowReason::TitleTooLong);
    }

    let lines = slide.rendered_lines();
    if lines.iter().any(|l| l.chars().count() > MAX_LINE_CHARS) {
        return Some(OverflowReason::BulletTooLong);
    }

    let total = slide.text_len();
    if total > template.max_text_length + CAPACITY_BUFFER_CHARS {
        return Some(OverflowReason::ExceedsLayoutCapacity);
    }
    if total > ABSOLUTE_CEILING_CHARS {
        return Some(OverflowReason::ExceedsAbsoluteCeiling);
    }
    None
}

/// Human-readable overflow risks for the renderer.
pub fn overflow_warnings(slide: &Slide, template: &LayoutTemplate) -> Vec<String> {
    let mut warnings = Vec::new();

    let title_len = slide.title.chars().count();
    if title_len > WARN_TITLE_CHARS {
        warnings.push(format!(
            "页面 {}: 标题过长 ({} 字符),可能溢出",
            slide.index, title_len
        ));
    }

    let lines = slide.rendered_lines();
    if template.max_bullets > 0 && lines.len() > template.max_bullets {
        warnings.push(format!(
            "页面 {}: 要点过多 ({} 个,建议 ≤ {}),可能溢出",
            slide.index,
            lines.len(),
            template.max_bullets
        ));
    }

    for (i, line) in lines.iter().enumerate() {
        let len = line.chars().count();
        if len > WARN_LINE_CHARS {
            warnings.push(format!(
                "页面 {}: 要点 {} 过长 ({} 字符),可能溢出",
                slide.index,
                i + 1,
                len
            ));
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slide::SlideType;

    fn slide(title: &str, bullets: Vec<String>) -> Slide {
        let mut s = Slide::new(SlideType::Steps, title, bullets);
        s.index = 3;
        s
    }

    #[test]
    fn test_no_substitution_without_repeat() {
        let catalog = LayoutCatalog::builtin();
        assert_eq!(substitute_repeat(&catalog, "grid_4", None), None);
        assert_eq!(substitute_repeat(&catalog, "grid_4", Some("center_visual")), None);
    }

    #[test]
    fn test_repeat_takes_first_alternative() {
        let catalog = LayoutCatalog::builtin();
        assert_eq!(
            substitute_repeat(&catalog, "operation_steps", Some("operation_steps")),
            Some("timeline_horizontal")
        );
    }

    #[test]
    fn test_repeat_kept_without_alternatives() {
        let catalog = LayoutCatalog::builtin();
        assert_eq!(
            substitute_repeat(&catalog, "title_only", Some("title_only")),
            None
        );
    }

    #[test]
    fn test_missing_alternatives_skipped() {
        let catalog = LayoutCatalog::from_json(
            r#"[{"layout_id": "title_bullets", "display_name": "t", "max_bullets": 8,
                 "max_text_length": 400, "alternatives": ["gone", "hero"]},
                {"layout_id": "hero", "display_name": "h", "max_bullets": 3,
                 "max_text_length": 200}]"#,
        )
        .unwrap();
        assert_eq!(
            substitute_repeat(&catalog, "title_bullets", Some("title_bullets")),
            Some("hero")
        );
    }

    #[test]
    fn test_long_bullet_overflows_operation_steps() {
        let catalog = LayoutCatalog::builtin();
        let template = catalog.get("operation_steps").unwrap();
        let s = slide("拆装步骤", vec!["步".repeat(120)]);
        assert_eq!(
            overflow_reason(&s, template),
            Some(OverflowReason::BulletTooLong)
        );
    }

    #[test]
    fn test_title_check_skipped_for_title_only() {
        let catalog = LayoutCatalog::builtin();
        let long_title = "标".repeat(46);
        let s = slide(&long_title, vec![]);
        assert_eq!(overflow_reason(&s, catalog.get("title_only").unwrap()), None);
        assert_eq!(
            overflow_reason(&s, catalog.get("grid_4").unwrap()),
            Some(OverflowReason::TitleTooLong)
        );
    }

    #[test]
    fn test_capacity_and_ceiling() {
        let catalog = LayoutCatalog::builtin();
        // 4 + 5 * 60 = 304 chars: fits operation_steps (300 + 50), not grid_4 (200 + 50)
        let s = slide("拆装步骤", (0..5).map(|_| "字".repeat(60)).collect());
        assert_eq!(overflow_reason(&s, catalog.get("operation_steps").unwrap()), None);
        assert_eq!(
            overflow_reason(&s, catalog.get("grid_4").unwrap()),
            Some(OverflowReason::ExceedsLayoutCapacity)
        );

        let big = LayoutCatalog::from_json(
            r#"[{"layout_id": "title_bullets", "display_name": "t", "max_bullets": 20,
                 "max_text_length": 2000}]"#,
        )
        .unwrap();
        let s = slide("t", (0..7).map(|_| "字".repeat(100)).collect());
        assert_eq!(
            overflow_reason(&s, big.get("title_bullets").unwrap()),
            Some(OverflowReason::ExceedsAbsoluteCeiling)
        );
    }

    #[test]
    fn test_reason_wire_strings() {
        assert_eq!(
            serde_json::to_string(&OverflowReason::ExceedsLayoutCapacity).unwrap(),
            format!("\"{}\"", OverflowReason::ExceedsLayoutCapacity.as_str())
        );
    }

    #[test]
    fn test_overflow_warnings() {
        let catalog = LayoutCatalog::builtin();
        let template = catalog.get("center_visual").unwrap();
        let mut bullets: Vec<String> = (0..4).map(|i| format!("要点{i}")).collect();
        bullets.push("长".repeat(101));
        let s = slide(&"题".repeat(51), bullets);

        let warnings = overflow_warnings(&s, template);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("标题过长 (51 字符)"));
        assert!(warnings[1].contains("要点过多 (5 个,建议 ≤ 3)"));
        assert!(warnings[2].contains("要点 5 过长 (101 字符)"));
    }

    #[test]
    fn test_title_only_exempt_from_bullet_count_warning() {
        let catalog = LayoutCatalog::builtin();
        let s = slide("封面", vec!["副标题".to_string()]);
        assert!(overflow_warnings(&s, catalog.get("title_only").unwrap()).is_empty());
    }
}
