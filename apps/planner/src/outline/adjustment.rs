//! Outline Adjustment: normalizes an outline's slide count to a numeric target.
//!
//! # Reduction tiers (applied in order, each only while still over target)
//! 1. Non-essential removal: agenda, then qa, then warning slides. Warning and qa
//!    content is absorbed onto a preceding slide as structured `AbsorbedContent`.
//! 2. Similar-page merging: intro+concept pairs, case runs, exercise runs, then
//!    transitional (bridge/relations) pages are dropped.
//! 3. Simplification: drop bridge/relations/intro pages, then pop non-core pages
//!    from the tail while more than 2 slides remain.
//!
//! The tiers are a fixed pipeline without backtracking, so `adjust_to_target` is
//! best-effort for very small targets: core pages and the 2-slide floor are never
//! traded away to hit the number exactly.
//!
//! When under target, Q&A placeholder slides are appended.

use serde_json::json;
use tracing::{debug, info, warn};

use crate::events::{EventEmitter, STAGE_OUTLINE};
use crate::models::outline::Outline;
use crate::models::slide::{AbsorbedContent, AbsorbedSource, Slide, SlideType};

/// Tier 1 removal order.
const REMOVAL_PRIORITY: [SlideType; 3] = [SlideType::Agenda, SlideType::Qa, SlideType::Warning];

const WARNING_ITEMS_KEPT: usize = 2;
const QA_ITEMS_KEPT: usize = 3;
const QA_ABSORB_HEADING: &str = "课后答疑：";

const MERGED_CONCEPT_SUFFIX: &str = "——从案例看核心概念";
const MERGED_CASE_TITLE: &str = "典型案例对比分析";
const MERGED_CASE_NOTES: &str = "通过对比分析多个典型案例，加深理解";
const MERGED_EXERCISE_TITLE: &str = "综合巩固练习";
const MERGED_EXERCISE_NOTES: &str = "按题型分块展示，便于系统练习";

const MAX_CASES_SUMMARIZED: usize = 3;
const MAX_CASE_BULLETS: usize = 8;
const MAX_EXERCISE_BULLETS: usize = 10;
const BULLETS_PER_MERGED_SOURCE: usize = 2;

/// Slides never popped by the tail trim.
const MIN_SLIDES_KEPT: usize = 2;

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Adjusts the outline's slide count toward `target_count`.
///
/// `None` returns the outline untouched. Otherwise the result is always
/// re-indexed (`slides[i].index == i + 1`).
pub fn adjust_to_target(
    mut outline: Outline,
    target_count: Option<usize>,
    events: &EventEmitter,
) -> Outline {
    let Some(target) = target_count else {
        return outline;
    };

    let before = outline.slides.len();

    if before > target {
        let slides = &mut outline.slides;

        remove_non_essential(slides, target, events);
        if slides.len() > target {
            merge_similar(slides, target, events);
        }
        if slides.len() > target {
            simplify(slides, target, events);
        }
        if slides.len() > target {
            warn!(
                target,
                remaining = slides.len(),
                "Outline adjustment could not reach target without removing core slides"
            );
            events.emit(
                STAGE_OUTLINE,
                "target_unreachable",
                json!({ "target": target, "remaining": slides.len() }),
            );
        }
    } else if before < target {
        let missing = target - before;
        for _ in 0..missing {
            outline.slides.push(qa_placeholder());
        }
        events.emit(
            STAGE_OUTLINE,
            "qa_slides_appended",
            json!({ "count": missing }),
        );
    }

    outline.reindex();

    info!(
        before,
        after = outline.slides.len(),
        target,
        "Outline adjusted to target count"
    );
    outline
}

// ────────────────────────────────────────────────────────────────────────────
// Tier 1: non-essential removal
// ────────────────────────────────────────────────────────────────────────────

fn remove_non_essential(slides: &mut Vec<Slide>, target: usize, events: &EventEmitter) {
    for kind in REMOVAL_PRIORITY {
        let mut i = 0;
        while i < slides.len() && slides.len() > target {
            if slides[i].slide_type != kind {
                i += 1;
                continue;
            }

            let removed = slides.remove(i);
            match kind {
                SlideType::Warning => absorb_warning(&mut slides[..i], &removed, events),
                SlideType::Qa => absorb_qa(&mut slides[..i], &removed, events),
                _ => {}
            }
            emit_removed(events, 1, &removed);
        }
    }
}

/// Moves a warning slide's first bullets onto the nearest preceding concept/steps slide.
fn absorb_warning(preceding: &mut [Slide], warning: &Slide, events: &EventEmitter) {
    let target = preceding
        .iter_mut()
        .rev()
        .find(|s| matches!(s.slide_type, SlideType::Concept | SlideType::Steps));
    absorb_into(
        target,
        warning,
        AbsorbedSource::Warning,
        None,
        WARNING_ITEMS_KEPT,
        events,
    );
}

/// Moves a qa slide's first bullets onto the nearest preceding summary slide.
fn absorb_qa(preceding: &mut [Slide], qa: &Slide, events: &EventEmitter) {
    let target = preceding
        .iter_mut()
        .rev()
        .find(|s| s.slide_type == SlideType::Summary);
    absorb_into(
        target,
        qa,
        AbsorbedSource::Qa,
        Some(QA_ABSORB_HEADING.to_string()),
        QA_ITEMS_KEPT,
        events,
    );
}

fn absorb_into(
    target: Option<&mut Slide>,
    source: &Slide,
    kind: AbsorbedSource,
    heading: Option<String>,
    keep: usize,
    events: &EventEmitter,
) {
    if source.bullets.is_empty() {
        return;
    }
    let items: Vec<String> = source.bullets.iter().take(keep).cloned().collect();

    match target {
        Some(slide) => {
            events.emit(
                STAGE_OUTLINE,
                "content_absorbed",
                json!({
                    "from_title": source.title,
                    "into_title": slide.title,
                    "source": kind,
                    "items": items.len(),
                }),
            );
            slide.absorbed.push(AbsorbedContent {
                source: kind,
                source_title: source.title.clone(),
                heading,
                items,
            });
        }
        None => {
            debug!(title = %source.title, "No preceding slide to absorb content into");
            events.emit(
                STAGE_OUTLINE,
                "absorbed_content_dropped",
                json!({ "from_title": source.title, "source": kind }),
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tier 2: similar-page merging
// ────────────────────────────────────────────────────────────────────────────

fn merge_similar(slides: &mut Vec<Slide>, target: usize, events: &EventEmitter) {
    let mut i = 0;
    while i < slides.len() && slides.len() > target {
        let excess = slides.len() - target;

        if slides[i].slide_type == SlideType::Intro
            && slides.get(i + 1).map(|s| s.slide_type) == Some(SlideType::Concept)
        {
            let merged = merge_intro_and_concept(&slides[i], &slides[i + 1]);
            emit_merged(events, "intro_concept", 2, &merged);
            slides.splice(i..i + 2, [merged]);
            i += 1;
            continue;
        }

        if is_titled_case(&slides[i]) {
            let run = run_length(slides, i, is_titled_case);
            if run > 1 {
                // Never merge past the target.
                let take = run.min(excess + 1);
                let merged = merge_case_slides(&slides[i..i + take]);
                emit_merged(events, "cases", take, &merged);
                slides.splice(i..i + take, [merged]);
                i += 1;
                continue;
            }
        }

        if slides[i].slide_type == SlideType::Exercises {
            let run = run_length(slides, i, |s| s.slide_type == SlideType::Exercises);
            if run > 1 {
                let take = run.min(excess + 1);
                let merged = merge_exercise_slides(&slides[i..i + take]);
                emit_merged(events, "exercises", take, &merged);
                slides.splice(i..i + take, [merged]);
                i += 1;
                continue;
            }
        }

        i += 1;
    }

    remove_types_in_order(
        slides,
        target,
        &[SlideType::Bridge, SlideType::Relations],
        2,
        events,
    );
}

fn is_titled_case(slide: &Slide) -> bool {
    let title = slide.title.trim_start();
    slide.slide_type.is_case()
        && (title.starts_with("案例")
            || title
                .get(..4)
                .is_some_and(|p| p.eq_ignore_ascii_case("case")))
}

fn run_length(slides: &[Slide], start: usize, pred: impl Fn(&Slide) -> bool) -> usize {
    slides[start..].iter().take_while(|s| pred(s)).count()
}

pub(crate) fn merge_intro_and_concept(intro: &Slide, concept: &Slide) -> Slide {
    let bullets = intro
        .bullets
        .iter()
        .take(2)
        .chain(concept.bullets.iter().take(3))
        .cloned()
        .collect();

    let mut merged = Slide::new(
        SlideType::Concept,
        format!("{}{}", concept.title, MERGED_CONCEPT_SUFFIX),
        bullets,
    );
    merged.index = intro.index;
    merged.notes = concept.notes.clone().or_else(|| intro.notes.clone());
    merged.assets = intro
        .assets
        .iter()
        .chain(&concept.assets)
        .take(3)
        .cloned()
        .collect();
    merged.interactions = intro
        .interactions
        .iter()
        .chain(&concept.interactions)
        .take(2)
        .cloned()
        .collect();
    merged.absorbed = intro
        .absorbed
        .iter()
        .chain(&concept.absorbed)
        .cloned()
        .collect();
    merged
}

pub(crate) fn merge_case_slides(cases: &[Slide]) -> Slide {
    let mut bullets = Vec::new();
    for (i, case) in cases.iter().take(MAX_CASES_SUMMARIZED).enumerate() {
        bullets.push(format!("案例{}：{}", i + 1, case.title));
        bullets.extend(case.bullets.iter().take(BULLETS_PER_MERGED_SOURCE).cloned());
    }
    bullets.truncate(MAX_CASE_BULLETS);

    let mut merged = Slide::new(SlideType::CaseStudy, MERGED_CASE_TITLE, bullets);
    merged.index = cases.first().map(|s| s.index).unwrap_or_default();
    merged.notes = Some(MERGED_CASE_NOTES.to_string());
    merged.assets = cases
        .iter()
        .take(MAX_CASES_SUMMARIZED)
        .flat_map(|s| s.assets.iter().cloned())
        .take(2)
        .collect();
    merged.interactions = cases
        .first()
        .map(|s| s.interactions.clone())
        .unwrap_or_default();
    merged.absorbed = cases.iter().flat_map(|s| s.absorbed.clone()).collect();
    merged
}

pub(crate) fn merge_exercise_slides(exercises: &[Slide]) -> Slide {
    let mut bullets = Vec::new();
    for (i, slide) in exercises.iter().enumerate() {
        bullets.push(format!("【题型{}】{}", i + 1, slide.title));
        bullets.extend(slide.bullets.iter().take(BULLETS_PER_MERGED_SOURCE).cloned());
    }
    bullets.truncate(MAX_EXERCISE_BULLETS);

    let mut merged = Slide::new(SlideType::Exercises, MERGED_EXERCISE_TITLE, bullets);
    let first = exercises.first();
    merged.index = first.map(|s| s.index).unwrap_or_default();
    merged.notes = Some(MERGED_EXERCISE_NOTES.to_string());
    merged.assets = first.map(|s| s.assets.clone()).unwrap_or_default();
    merged.interactions = first.map(|s| s.interactions.clone()).unwrap_or_default();
    merged.absorbed = exercises.iter().flat_map(|s| s.absorbed.clone()).collect();
    merged
}

// ────────────────────────────────────────────────────────────────────────────
// Tier 3: simplification
// ────────────────────────────────────────────────────────────────────────────

fn simplify(slides: &mut Vec<Slide>, target: usize, events: &EventEmitter) {
    remove_types_in_order(
        slides,
        target,
        &[SlideType::Bridge, SlideType::Relations, SlideType::Intro],
        3,
        events,
    );

    while slides.len() > target && slides.len() > MIN_SLIDES_KEPT {
        match slides.last() {
            Some(tail) if !tail.slide_type.is_core() => {
                if let Some(removed) = slides.pop() {
                    emit_removed(events, 3, &removed);
                }
            }
            _ => break,
        }
    }
}

/// Removes slides of the given types in document order until `target` is reached.
fn remove_types_in_order(
    slides: &mut Vec<Slide>,
    target: usize,
    types: &[SlideType],
    tier: u8,
    events: &EventEmitter,
) {
    let mut i = 0;
    while i < slides.len() && slides.len() > target {
        if types.contains(&slides[i].slide_type) {
            let removed = slides.remove(i);
            emit_removed(events, tier, &removed);
        } else {
            i += 1;
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn qa_placeholder() -> Slide {
    let mut slide = Slide::new(
        SlideType::Qa,
        "课堂互动 / Q&A",
        vec!["问题1：____".to_string(), "问题2：____".to_string()],
    );
    slide.interactions = vec!["举手/弹幕提问".to_string()];
    slide
}

fn emit_removed(events: &EventEmitter, tier: u8, slide: &Slide) {
    events.emit(
        STAGE_OUTLINE,
        "slide_removed",
        json!({
            "tier": tier,
            "slide_type": slide.slide_type,
            "title": slide.title,
        }),
    );
}

fn emit_merged(events: &EventEmitter, kind: &str, sources: usize, merged: &Slide) {
    events.emit(
        STAGE_OUTLINE,
        "slides_merged",
        json!({
            "merge": kind,
            "sources": sources,
            "title": merged.title,
        }),
    );
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MemoryEventSink;
    use crate::models::outline::TeachingScene;
    use std::sync::Arc;

    fn slide(t: SlideType, title: &str, bullets: &[&str]) -> Slide {
        Slide::new(t, title, bullets.iter().map(|b| b.to_string()).collect())
    }

    fn make_outline(slides: Vec<Slide>) -> Outline {
        let mut o = Outline {
            deck_title: "液压传动".to_string(),
            subject: "机械".to_string(),
            knowledge_points: vec!["液压泵".to_string()],
            teaching_scene: TeachingScene::Practice,
            slides,
        };
        o.reindex();
        o
    }

    fn types(o: &Outline) -> Vec<SlideType> {
        o.slides.iter().map(|s| s.slide_type).collect()
    }

    fn fourteen_slide_outline() -> Outline {
        make_outline(vec![
            slide(SlideType::Cover, "液压传动", &[]),
            slide(SlideType::Objectives, "学习目标", &["掌握原理", "会操作"]),
            slide(SlideType::Agenda, "目录", &["一", "二"]),
            slide(SlideType::Intro, "生活中的液压", &["千斤顶", "挖掘机", "刹车"]),
            slide(SlideType::Concept, "液压原理", &["帕斯卡", "压力", "流量", "功率"]),
            slide(SlideType::Concept, "液压元件", &["泵", "阀"]),
            slide(SlideType::Steps, "拆装步骤", &["断电", "泄压", "拆卸"]),
            slide(SlideType::Case, "案例一：挖掘机", &["背景", "分析", "结论"]),
            slide(SlideType::Case, "案例二：压力机", &["背景", "分析"]),
            slide(SlideType::Exercises, "选择题", &["题1", "题2"]),
            slide(SlideType::Exercises, "判断题", &["题3"]),
            slide(SlideType::Bridge, "过渡", &[]),
            slide(SlideType::Qa, "答疑", &["问1", "问2"]),
            slide(SlideType::Summary, "总结", &["回顾"]),
        ])
    }

    #[test]
    fn test_no_target_returns_unchanged() {
        let o = fourteen_slide_outline();
        let adjusted = adjust_to_target(o.clone(), None, &EventEmitter::noop());
        assert_eq!(adjusted, o);
    }

    #[test]
    fn test_converges_to_target_and_keeps_core() {
        let o = fourteen_slide_outline();
        assert_eq!(o.slides.len(), 14);

        let adjusted = adjust_to_target(o, Some(10), &EventEmitter::noop());

        assert_eq!(adjusted.slides.len(), 10);
        assert!(adjusted.is_indexed());
        let t = types(&adjusted);
        assert!(t.contains(&SlideType::Cover));
        assert!(t.contains(&SlideType::Objectives));
        assert!(t.contains(&SlideType::Summary));
        assert!(!t.contains(&SlideType::Agenda));
        assert!(!t.contains(&SlideType::Qa));
    }

    #[test]
    fn test_padding_appends_qa_slides() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Objectives, "目标", &["a"]),
            slide(SlideType::Concept, "概念", &["b"]),
            slide(SlideType::Steps, "步骤", &["c"]),
            slide(SlideType::Summary, "总结", &["d"]),
        ]);
        let adjusted = adjust_to_target(o, Some(8), &EventEmitter::noop());

        assert_eq!(adjusted.slides.len(), 8);
        assert!(adjusted.is_indexed());
        for s in &adjusted.slides[5..] {
            assert_eq!(s.slide_type, SlideType::Qa);
            assert_eq!(s.bullets.len(), 2);
        }
    }

    #[test]
    fn test_agenda_removed_before_qa() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Qa, "答疑", &["q"]),
            slide(SlideType::Agenda, "目录", &["a"]),
            slide(SlideType::Summary, "总结", &["s"]),
        ]);
        let adjusted = adjust_to_target(o, Some(3), &EventEmitter::noop());
        assert_eq!(
            types(&adjusted),
            vec![SlideType::Cover, SlideType::Qa, SlideType::Summary]
        );
    }

    #[test]
    fn test_warning_absorbed_into_preceding_concept() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Concept, "液压原理", &["帕斯卡定律"]),
            slide(SlideType::Summary, "总结", &["s"]),
            slide(SlideType::Warning, "安全注意", &["先泄压", "戴手套", "第三条"]),
        ]);
        let adjusted = adjust_to_target(o, Some(3), &EventEmitter::noop());

        let concept = &adjusted.slides[1];
        assert_eq!(concept.bullets, vec!["帕斯卡定律"], "original bullets kept apart");
        assert_eq!(concept.absorbed.len(), 1);
        assert_eq!(concept.absorbed[0].source, AbsorbedSource::Warning);
        assert_eq!(concept.absorbed[0].items, vec!["先泄压", "戴手套"]);
        assert_eq!(
            concept.rendered_lines(),
            vec!["帕斯卡定律", "⚠️ 先泄压", "⚠️ 戴手套"]
        );
    }

    #[test]
    fn test_qa_absorbed_into_summary_with_heading() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Summary, "总结", &["回顾"]),
            slide(SlideType::Qa, "答疑", &["问1", "问2", "问3", "问4"]),
        ]);
        let adjusted = adjust_to_target(o, Some(2), &EventEmitter::noop());

        let summary = &adjusted.slides[1];
        assert_eq!(summary.absorbed[0].heading.as_deref(), Some("课后答疑："));
        assert_eq!(summary.absorbed[0].items.len(), 3);
    }

    #[test]
    fn test_absorption_without_target_emits_drop_event() {
        let sink = Arc::new(MemoryEventSink::new());
        let events = EventEmitter::new(sink.clone(), "s");
        let o = make_outline(vec![
            slide(SlideType::Warning, "注意", &["小心"]),
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Summary, "总结", &["s"]),
        ]);
        let adjusted = adjust_to_target(o, Some(2), &events);

        assert_eq!(adjusted.slides.len(), 2);
        assert!(sink
            .kinds()
            .contains(&"absorbed_content_dropped".to_string()));
    }

    #[test]
    fn test_intro_concept_merge_shape() {
        let intro = slide(SlideType::Intro, "导入", &["i1", "i2", "i3"]);
        let concept = slide(SlideType::Concept, "液压原理", &["c1", "c2", "c3", "c4"]);
        let merged = merge_intro_and_concept(&intro, &concept);

        assert_eq!(merged.slide_type, SlideType::Concept);
        assert_eq!(merged.title, "液压原理——从案例看核心概念");
        assert_eq!(merged.bullets, vec!["i1", "i2", "c1", "c2", "c3"]);
    }

    #[test]
    fn test_case_merge_caps_bullets() {
        let cases: Vec<Slide> = (1..=4)
            .map(|i| {
                slide(
                    SlideType::Case,
                    &format!("案例{i}"),
                    &["背景", "分析", "结论"],
                )
            })
            .collect();
        let merged = merge_case_slides(&cases);

        assert_eq!(merged.title, "典型案例对比分析");
        assert_eq!(merged.slide_type, SlideType::CaseStudy);
        assert_eq!(merged.bullets.len(), 8);
        assert_eq!(merged.bullets[0], "案例1：案例1");
        assert!(!merged.bullets.iter().any(|b| b.starts_with("案例4")));
    }

    #[test]
    fn test_exercise_merge_adds_headings() {
        let ex = vec![
            slide(SlideType::Exercises, "选择题", &["1", "2", "3"]),
            slide(SlideType::Exercises, "判断题", &["4"]),
        ];
        let merged = merge_exercise_slides(&ex);
        assert_eq!(merged.title, "综合巩固练习");
        assert_eq!(
            merged.bullets,
            vec!["【题型1】选择题", "1", "2", "【题型2】判断题", "4"]
        );
    }

    #[test]
    fn test_case_run_merge_does_not_overshoot() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Case, "案例1", &["a"]),
            slide(SlideType::Case, "案例2", &["b"]),
            slide(SlideType::Case, "Case 3", &["c"]),
            slide(SlideType::Summary, "总结", &["s"]),
        ]);
        let adjusted = adjust_to_target(o, Some(4), &EventEmitter::noop());

        assert_eq!(adjusted.slides.len(), 4);
        assert_eq!(adjusted.slides[1].title, "典型案例对比分析");
        assert_eq!(adjusted.slides[2].title, "Case 3");
    }

    #[test]
    fn test_untitled_case_slides_are_not_merged() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Case, "挖掘机", &["a"]),
            slide(SlideType::Case, "压力机", &["b"]),
            slide(SlideType::Summary, "总结", &["s"]),
        ]);
        let adjusted = adjust_to_target(o, Some(3), &EventEmitter::noop());
        // Tier 3 tail trim stops at the core summary slide.
        assert_eq!(adjusted.slides.len(), 4);
        assert!(adjusted
            .slides
            .iter()
            .all(|s| s.title != "典型案例对比分析"));
    }

    fn removals(sink: &MemoryEventSink) -> Vec<(String, u64)> {
        sink.events()
            .into_iter()
            .filter(|e| e.kind == "slide_removed")
            .map(|e| {
                (
                    e.payload["title"].as_str().unwrap_or_default().to_string(),
                    e.payload["tier"].as_u64().unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_merge_tier_drops_relations_page_first() {
        let sink = Arc::new(MemoryEventSink::new());
        let events = EventEmitter::new(sink.clone(), "s");
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Concept, "液压原理", &["a"]),
            slide(SlideType::Relations, "知识关联", &["b"]),
            slide(SlideType::Concept, "液压元件", &["c"]),
            slide(SlideType::Bridge, "过渡", &[]),
            slide(SlideType::Summary, "总结", &["d"]),
        ]);

        let adjusted = adjust_to_target(o, Some(5), &events);

        assert_eq!(
            types(&adjusted),
            vec![
                SlideType::Cover,
                SlideType::Concept,
                SlideType::Concept,
                SlideType::Bridge,
                SlideType::Summary,
            ]
        );
        assert!(adjusted.is_indexed());
        assert_eq!(removals(&sink), vec![("知识关联".to_string(), 2)]);
    }

    #[test]
    fn test_simplify_tier_removes_unmerged_intro() {
        let sink = Arc::new(MemoryEventSink::new());
        let events = EventEmitter::new(sink.clone(), "s");
        // intro is not followed by a concept page, so tier 2 cannot merge it
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Intro, "生活中的液压", &["千斤顶"]),
            slide(SlideType::Steps, "拆装步骤", &["泄压"]),
            slide(SlideType::Bridge, "过渡", &[]),
            slide(SlideType::Concept, "液压原理", &["帕斯卡"]),
            slide(SlideType::Summary, "总结", &["回顾"]),
        ]);

        let adjusted = adjust_to_target(o, Some(4), &events);

        assert_eq!(
            types(&adjusted),
            vec![
                SlideType::Cover,
                SlideType::Steps,
                SlideType::Concept,
                SlideType::Summary,
            ]
        );
        assert!(adjusted.is_indexed());
        assert_eq!(
            removals(&sink),
            vec![("过渡".to_string(), 2), ("生活中的液压".to_string(), 3)]
        );
    }

    #[test]
    fn test_tail_trim_respects_two_slide_floor() {
        let o = make_outline(vec![
            slide(SlideType::Steps, "步骤1", &["a"]),
            slide(SlideType::Steps, "步骤2", &["b"]),
            slide(SlideType::Steps, "步骤3", &["c"]),
        ]);
        let adjusted = adjust_to_target(o, Some(1), &EventEmitter::noop());
        assert_eq!(adjusted.slides.len(), 2, "best-effort: floor of 2 slides");
        assert!(adjusted.is_indexed());
    }

    #[test]
    fn test_core_slides_never_trimmed() {
        let o = make_outline(vec![
            slide(SlideType::Cover, "封面", &[]),
            slide(SlideType::Objectives, "目标", &["a"]),
            slide(SlideType::Concept, "概念", &["b"]),
            slide(SlideType::Summary, "总结", &["c"]),
        ]);
        let adjusted = adjust_to_target(o, Some(2), &EventEmitter::noop());
        assert_eq!(adjusted.slides.len(), 4);
    }

    #[test]
    fn test_events_emitted_for_removals_and_merges() {
        let sink = Arc::new(MemoryEventSink::new());
        let events = EventEmitter::new(sink.clone(), "s");
        adjust_to_target(fourteen_slide_outline(), Some(10), &events);

        let kinds = sink.kinds();
        assert!(kinds.iter().any(|k| k == "slide_removed"));
        assert!(kinds.iter().any(|k| k == "slides_merged"));
    }
}
