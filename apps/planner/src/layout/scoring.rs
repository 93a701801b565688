//! Feature scoring: the deterministic last layer of layout resolution.
//!
//! Every layout starts at 0 on a fresh `ScoreBoard`; an ordered list of pure
//! rules adds bonuses and penalties from the slide's `SlideFeatures`. The highest
//! score wins, ties go to the layout declared first in the catalog.

use crate::layout::catalog::LayoutCatalog;
use crate::models::outline::TeachingScene;
use crate::models::slide::Slide;

const LONG_TEXT_CHARS: usize = 400;
const SHORT_TEXT_CHARS: usize = 120;
const DENSE_BULLETS: usize = 6;
const REPEAT_PENALTY: i32 = -80;

/// Inputs the scoring rules read. Derived once per slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideFeatures {
    pub scene: TeachingScene,
    /// Image, diagram and chart hints.
    pub image_count: usize,
    /// Rendered lines, absorbed content included.
    pub bullet_count: usize,
    /// Title plus rendered lines, in characters.
    pub text_len: usize,
    pub previous_layout: Option<String>,
}

impl SlideFeatures {
    pub fn from_slide(slide: &Slide, scene: TeachingScene, previous_layout: Option<&str>) -> Self {
        SlideFeatures {
            scene,
            image_count: slide.visual_assets().count(),
            bullet_count: slide.rendered_lines().len(),
            text_len: slide.text_len(),
            previous_layout: previous_layout.map(str::to_string),
        }
    }
}

/// Per-call score accumulator, one cell per catalog layout in declaration order.
#[derive(Debug)]
pub struct ScoreBoard<'a> {
    catalog: &'a LayoutCatalog,
    scores: Vec<i32>,
}

impl<'a> ScoreBoard<'a> {
    pub fn new(catalog: &'a LayoutCatalog) -> Self {
        ScoreBoard {
            catalog,
            scores: vec![0; catalog.len()],
        }
    }

    /// Adjusts `layout_id`'s score. Ids absent from the catalog are ignored.
    pub fn add(&mut self, layout_id: &str, delta: i32) {
        if let Some(pos) = self.catalog.position(layout_id) {
            self.scores[pos] += delta;
        }
    }

    pub fn score(&self, layout_id: &str) -> Option<i32> {
        self.catalog.position(layout_id).map(|pos| self.scores[pos])
    }

    /// Highest-scoring layout; the earliest declared wins a tie.
    pub fn best(&self) -> Option<&'a str> {
        let mut best: Option<(usize, i32)> = None;
        for (pos, &score) in self.scores.iter().enumerate() {
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((pos, score));
            }
        }
        best.and_then(|(pos, _)| self.catalog.iter().nth(pos))
            .map(|t| t.layout_id.as_str())
    }
}

pub type ScoringRule = fn(&SlideFeatures, &mut ScoreBoard<'_>);

/// Applied in this order.
pub const SCORING_RULES: [(&str, ScoringRule); 5] = [
    ("scene", score_scene),
    ("images", score_images),
    ("bullets", score_bullets),
    ("text_length", score_text_length),
    ("repetition", score_repetition),
];

/// Runs every rule on a fresh board and returns the winner.
pub fn pick_by_score<'a>(catalog: &'a LayoutCatalog, features: &SlideFeatures) -> Option<&'a str> {
    let mut board = ScoreBoard::new(catalog);
    for (_, rule) in SCORING_RULES {
        rule(features, &mut board);
    }
    board.best()
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

pub fn score_scene(f: &SlideFeatures, board: &mut ScoreBoard<'_>) {
    match f.scene {
        TeachingScene::Practice => {
            board.add("operation_steps", 50);
            board.add("timeline_horizontal", 30);
        }
        TeachingScene::Theory => {
            board.add("title_bullets_right_img", 30);
            board.add("table_comparison", 25);
        }
        TeachingScene::Review | TeachingScene::Unknown => {}
    }
}

pub fn score_images(f: &SlideFeatures, board: &mut ScoreBoard<'_>) {
    match f.image_count {
        0 => {}
        1 if f.text_len < SHORT_TEXT_CHARS => {
            board.add("center_visual", 80);
            board.add("title_bullets_right_img", 40);
        }
        1 if f.text_len > LONG_TEXT_CHARS => {
            board.add("split_vertical", 100);
            board.add("title_bullets", 60);
            board.add("title_bullets_right_img", -50);
        }
        1 => board.add("title_bullets_right_img", 60),
        2 | 3 => board.add("concept_comparison", 60),
        _ => board.add("grid_4", 100),
    }
}

pub fn score_bullets(f: &SlideFeatures, board: &mut ScoreBoard<'_>) {
    match f.bullet_count {
        0 => {}
        n if n > DENSE_BULLETS => board.add("title_bullets", 60),
        _ => {
            board.add("title_bullets", 40);
            board.add("title_bullets_right_img", 35);
        }
    }
}

pub fn score_text_length(f: &SlideFeatures, board: &mut ScoreBoard<'_>) {
    if f.text_len > LONG_TEXT_CHARS {
        board.add("title_bullets", -50);
    }
}

pub fn score_repetition(f: &SlideFeatures, board: &mut ScoreBoard<'_>) {
    if let Some(previous) = &f.previous_layout {
        board.add(previous, REPEAT_PENALTY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features() -> SlideFeatures {
        SlideFeatures {
            scene: TeachingScene::Unknown,
            image_count: 0,
            bullet_count: 0,
            text_len: 10,
            previous_layout: None,
        }
    }

    fn board_after(rule: ScoringRule, f: &SlideFeatures) -> Vec<(String, i32)> {
        let catalog = LayoutCatalog::shared();
        let mut board = ScoreBoard::new(&catalog);
        rule(f, &mut board);
        catalog
            .iter()
            .map(|t| (t.layout_id.clone(), board.score(&t.layout_id).unwrap()))
            .filter(|(_, s)| *s != 0)
            .collect()
    }

    fn pairs(items: &[(&str, i32)]) -> Vec<(String, i32)> {
        items.iter().map(|(id, s)| (id.to_string(), *s)).collect()
    }

    #[test]
    fn test_empty_board_picks_first_declared() {
        let catalog = LayoutCatalog::builtin();
        let board = ScoreBoard::new(&catalog);
        assert_eq!(board.best(), Some("title_only"));
    }

    #[test]
    fn test_unknown_ids_ignored() {
        let catalog = LayoutCatalog::builtin();
        let mut board = ScoreBoard::new(&catalog);
        board.add("no_such_layout", 500);
        assert_eq!(board.score("no_such_layout"), None);
        assert_eq!(board.best(), Some("title_only"));
    }

    #[test]
    fn test_scene_rule() {
        let mut f = features();
        f.scene = TeachingScene::Practice;
        assert_eq!(
            board_after(score_scene, &f),
            pairs(&[("operation_steps", 50), ("timeline_horizontal", 30)])
        );
        f.scene = TeachingScene::Review;
        assert!(board_after(score_scene, &f).is_empty());
    }

    #[test]
    fn test_image_rule_branches() {
        let mut f = features();
        f.image_count = 4;
        assert_eq!(board_after(score_images, &f), pairs(&[("grid_4", 100)]));

        f.image_count = 2;
        assert_eq!(
            board_after(score_images, &f),
            pairs(&[("concept_comparison", 60)])
        );

        f.image_count = 1;
        f.text_len = 50;
        assert_eq!(
            board_after(score_images, &f),
            pairs(&[("title_bullets_right_img", 40), ("center_visual", 80)])
        );

        f.text_len = 450;
        assert_eq!(
            board_after(score_images, &f),
            pairs(&[
                ("title_bullets", 60),
                ("title_bullets_right_img", -50),
                ("split_vertical", 100),
            ])
        );

        f.text_len = 200;
        assert_eq!(
            board_after(score_images, &f),
            pairs(&[("title_bullets_right_img", 60)])
        );
    }

    #[test]
    fn test_bullet_rule() {
        let mut f = features();
        f.bullet_count = 7;
        assert_eq!(board_after(score_bullets, &f), pairs(&[("title_bullets", 60)]));
        f.bullet_count = 3;
        assert_eq!(
            board_after(score_bullets, &f),
            pairs(&[("title_bullets", 40), ("title_bullets_right_img", 35)])
        );
    }

    #[test]
    fn test_long_text_penalizes_bullet_layout() {
        let mut f = features();
        f.text_len = 401;
        assert_eq!(
            board_after(score_text_length, &f),
            pairs(&[("title_bullets", -50)])
        );
    }

    #[test]
    fn test_repetition_penalty() {
        let mut f = features();
        f.previous_layout = Some("grid_4".to_string());
        assert_eq!(board_after(score_repetition, &f), pairs(&[("grid_4", -80)]));
    }

    #[test]
    fn test_pick_by_score_full_pass() {
        let catalog = LayoutCatalog::builtin();
        let mut f = features();
        f.scene = TeachingScene::Practice;
        f.bullet_count = 4;
        // operation_steps 50 vs title_bullets 40 vs title_bullets_right_img 35
        assert_eq!(pick_by_score(&catalog, &f), Some("operation_steps"));

        f.previous_layout = Some("operation_steps".to_string());
        assert_eq!(pick_by_score(&catalog, &f), Some("title_bullets"));
    }

    #[test]
    fn test_features_from_slide_count_absorbed_lines() {
        use crate::models::slide::{AbsorbedContent, AbsorbedSource, SlideType};

        let mut slide = Slide::new(SlideType::Concept, "原理", vec!["a".to_string()]);
        slide.absorbed.push(AbsorbedContent {
            source: AbsorbedSource::Warning,
            source_title: "注意".to_string(),
            heading: None,
            items: vec!["小心".to_string()],
        });
        let f = SlideFeatures::from_slide(&slide, TeachingScene::Theory, Some("grid_4"));
        assert_eq!(f.bullet_count, 2);
        assert_eq!(f.text_len, slide.text_len());
        assert_eq!(f.previous_layout.as_deref(), Some("grid_4"));
    }
}
