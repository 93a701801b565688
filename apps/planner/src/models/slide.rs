//! Slide: the structural descriptor of one page in an outline.

use serde::{Deserialize, Serialize};

/// Closed set of structural slide roles. The serialized strings are part of the
/// wire contract with the content generator and renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    Title,
    Cover,
    Agenda,
    Objectives,
    Intro,
    Concept,
    Keypoints,
    Content,
    Steps,
    Practice,
    Demo,
    Process,
    History,
    Comparison,
    Contrast,
    Tools,
    Equipment,
    Gallery,
    Showcase,
    Overview,
    Warning,
    Exercises,
    Quiz,
    Case,
    CaseStudy,
    Summary,
    Relations,
    Bridge,
    Qa,
    IdeologicalSummary,
    /// Any slide type string outside the closed set.
    #[serde(other)]
    Unknown,
}

impl SlideType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlideType::Title => "title",
            SlideType::Cover => "cover",
            SlideType::Agenda => "agenda",
            SlideType::Objectives => "objectives",
            SlideType::Intro => "intro",
            SlideType::Concept => "concept",
            SlideType::Keypoints => "keypoints",
            SlideType::Content => "content",
            SlideType::Steps => "steps",
            SlideType::Practice => "practice",
            SlideType::Demo => "demo",
            SlideType::Process => "process",
            SlideType::History => "history",
            SlideType::Comparison => "comparison",
            SlideType::Contrast => "contrast",
            SlideType::Tools => "tools",
            SlideType::Equipment => "equipment",
            SlideType::Gallery => "gallery",
            SlideType::Showcase => "showcase",
            SlideType::Overview => "overview",
            SlideType::Warning => "warning",
            SlideType::Exercises => "exercises",
            SlideType::Quiz => "quiz",
            SlideType::Case => "case",
            SlideType::CaseStudy => "case_study",
            SlideType::Summary => "summary",
            SlideType::Relations => "relations",
            SlideType::Bridge => "bridge",
            SlideType::Qa => "qa",
            SlideType::IdeologicalSummary => "ideological_summary",
            SlideType::Unknown => "unknown",
        }
    }

    pub fn is_case(&self) -> bool {
        matches!(self, SlideType::Case | SlideType::CaseStudy)
    }

    pub fn is_exercise(&self) -> bool {
        matches!(self, SlideType::Exercises | SlideType::Quiz)
    }

    /// Core teaching pages that count reduction must never remove.
    pub fn is_core(&self) -> bool {
        matches!(
            self,
            SlideType::Cover | SlideType::Objectives | SlideType::Concept | SlideType::Summary
        )
    }
}

impl std::fmt::Display for SlideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of an upstream asset hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Image,
    Diagram,
    Chart,
    Icon,
    Illustration,
    Video,
    #[serde(other)]
    Other,
}

/// Image/diagram placeholder suggested by the content generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHint {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

impl AssetHint {
    /// Image, diagram and chart hints each occupy a visual region on the page.
    pub fn is_visual(&self) -> bool {
        matches!(
            self.kind,
            AssetKind::Image | AssetKind::Diagram | AssetKind::Chart
        )
    }

    /// Non-blank theme, if any.
    pub fn theme(&self) -> Option<&str> {
        self.theme
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Where absorbed content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsorbedSource {
    Warning,
    Qa,
}

/// Content moved onto this slide from a slide removed during count reduction.
/// Kept apart from `bullets` so later stages can tell original from absorbed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbsorbedContent {
    pub source: AbsorbedSource,
    pub source_title: String,
    #[serde(default)]
    pub heading: Option<String>,
    pub items: Vec<String>,
}

pub const WARNING_MARKER: &str = "⚠️ ";

impl AbsorbedContent {
    /// Lines as they appear on the rendered slide: heading first, markers applied.
    pub fn rendered_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.items.len() + 1);
        if let Some(heading) = &self.heading {
            lines.push(heading.clone());
        }
        for item in &self.items {
            match self.source {
                AbsorbedSource::Warning => lines.push(format!("{WARNING_MARKER}{item}")),
                AbsorbedSource::Qa => lines.push(item.clone()),
            }
        }
        lines
    }
}

/// One slide of an outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based, contiguous within a deck.
    pub index: usize,
    pub slide_type: SlideType,
    pub title: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub assets: Vec<AssetHint>,
    #[serde(default)]
    pub interactions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub absorbed: Vec<AbsorbedContent>,
}

impl Slide {
    pub fn new(slide_type: SlideType, title: impl Into<String>, bullets: Vec<String>) -> Self {
        Slide {
            index: 0,
            slide_type,
            title: title.into(),
            bullets,
            notes: None,
            assets: Vec::new(),
            interactions: Vec::new(),
            absorbed: Vec::new(),
        }
    }

    /// Original bullets followed by absorbed lines, in render order.
    pub fn rendered_lines(&self) -> Vec<String> {
        let mut lines = self.bullets.clone();
        for absorbed in &self.absorbed {
            lines.extend(absorbed.rendered_lines());
        }
        lines
    }

    /// Total text length (title + rendered lines) in characters.
    pub fn text_len(&self) -> usize {
        self.title.chars().count()
            + self
                .rendered_lines()
                .iter()
                .map(|l| l.chars().count())
                .sum::<usize>()
    }

    pub fn visual_assets(&self) -> impl Iterator<Item = &AssetHint> {
        self.assets.iter().filter(|a| a.is_visual())
    }
}
