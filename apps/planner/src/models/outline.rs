use serde::{Deserialize, Serialize};

use crate::models::slide::{Slide, SlideType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeachingScene {
    Theory,
    Practice,
    Review,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Ordered structural descriptors for one deck.
///
/// Invariant: `slides[i].index == i + 1` after every adjustment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    pub deck_title: String,
    pub subject: String,
    #[serde(default)]
    pub knowledge_points: Vec<String>,
    #[serde(default)]
    pub teaching_scene: TeachingScene,
    pub slides: Vec<Slide>,
}

impl Outline {
    /// Rewrites `index` so slides are numbered 1..=n in document order.
    pub fn reindex(&mut self) {
        reindex_slides(&mut self.slides);
    }

    pub fn is_indexed(&self) -> bool {
        self.slides
            .iter()
            .enumerate()
            .all(|(i, s)| s.index == i + 1)
    }

    pub fn count_of(&self, predicate: impl Fn(SlideType) -> bool) -> usize {
        self.slides
            .iter()
            .filter(|s| predicate(s.slide_type))
            .count()
    }

    /// Position of the first summary slide, or the end of the deck.
    pub fn insertion_point(&self) -> usize {
        self.slides
            .iter()
            .position(|s| s.slide_type == SlideType::Summary)
            .unwrap_or(self.slides.len())
    }
}

pub fn reindex_slides(slides: &mut [Slide]) {
    for (i, slide) in slides.iter_mut().enumerate() {
        slide.index = i + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(types: &[SlideType]) -> Outline {
        Outline {
            deck_title: "deck".to_string(),
            subject: "subject".to_string(),
            knowledge_points: vec![],
            teaching_scene: TeachingScene::Theory,
            slides: types
                .iter()
                .map(|t| Slide::new(*t, t.as_str(), vec![]))
                .collect(),
        }
    }

    #[test]
    fn test_reindex_makes_indices_contiguous() {
        let mut o = outline(&[SlideType::Cover, SlideType::Concept, SlideType::Summary]);
        assert!(!o.is_indexed());
        o.reindex();
        assert!(o.is_indexed());
        assert_eq!(o.slides[2].index, 3);
    }

    #[test]
    fn test_insertion_point_before_summary() {
        let o = outline(&[SlideType::Cover, SlideType::Summary, SlideType::Qa]);
        assert_eq!(o.insertion_point(), 1);
        let no_summary = outline(&[SlideType::Cover, SlideType::Concept]);
        assert_eq!(no_summary.insertion_point(), 2);
    }

    #[test]
    fn test_unknown_scene_defaults() {
        let scene: TeachingScene = serde_json::from_str("\"lab\"").unwrap();
        assert_eq!(scene, TeachingScene::Unknown);
        assert_eq!(TeachingScene::default(), TeachingScene::Unknown);
    }

    #[test]
    fn test_count_of() {
        let o = outline(&[SlideType::Case, SlideType::CaseStudy, SlideType::Quiz]);
        assert_eq!(o.count_of(|t| t.is_case()), 2);
        assert_eq!(o.count_of(|t| t.is_exercise()), 1);
    }
}
