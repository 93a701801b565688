//! Layout catalog: the static set of page layout templates.
//!
//! The built-in catalog carries ten templates, in a fixed declaration order that
//! also serves as the score tie-breaker. A replacement catalog can be loaded from
//! JSON; it is validated once at load time and read-only afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::PlannerError;
use crate::models::slide::SlideType;

/// Layout every overflowing slide is downgraded to. Must exist in any catalog.
pub const FALLBACK_LAYOUT_ID: &str = "title_bullets";

/// Slack allowed on `x + w` / `y + h` for float rounding in hand-written catalogs.
const GEOMETRY_EPSILON: f64 = 1e-6;

// ────────────────────────────────────────────────────────────────────────────
// Template types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    Photo,
    Schematic,
    Diagram,
    Icon,
    Warning,
    Illustration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
    #[serde(rename = "21:9")]
    UltraWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPosition {
    LeftHalf,
    RightHalf,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
    Top,
    Bottom,
}

/// An image region of a layout. Geometry is in page-relative units (0.0–1.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSlotDef {
    pub position: SlotPosition,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub default_style: Option<VisualStyle>,
    /// 1 (most important) through 5.
    pub priority: u8,
}

impl ImageSlotDef {
    /// True when the rectangle lies within the unit page.
    pub fn is_normalized(&self) -> bool {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        in_unit(self.x)
            && in_unit(self.y)
            && in_unit(self.w)
            && in_unit(self.h)
            && self.x + self.w <= 1.0 + GEOMETRY_EPSILON
            && self.y + self.h <= 1.0 + GEOMETRY_EPSILON
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutTemplate {
    pub layout_id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub suitable_slide_types: Vec<SlideType>,
    #[serde(default)]
    pub suitable_keywords: Vec<String>,
    #[serde(default)]
    pub image_slots: Vec<ImageSlotDef>,
    /// 0 means the layout has no bullet area.
    pub max_bullets: usize,
    pub max_text_length: usize,
    /// Ordered substitutes used by the anti-repetition pass.
    #[serde(default)]
    pub alternatives: Vec<String>,
}

/// One line of the catalog summary handed to the layout hint service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub layout_id: String,
    pub display_name: String,
    pub description: String,
    pub image_slots: usize,
    pub text_structure: String,
    pub max_items: usize,
    pub suitable_for: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LayoutCatalog {
    templates: Vec<LayoutTemplate>,
    by_id: HashMap<String, usize>,
}

static BUILTIN: OnceLock<Arc<LayoutCatalog>> = OnceLock::new();

impl LayoutCatalog {
    /// Process-wide built-in catalog, constructed on first use.
    pub fn shared() -> Arc<LayoutCatalog> {
        Arc::clone(BUILTIN.get_or_init(|| Arc::new(Self::builtin())))
    }

    pub fn builtin() -> Self {
        Self::index(builtin_templates())
    }

    /// Validates `templates` and builds a catalog from them, preserving order.
    pub fn from_templates(templates: Vec<LayoutTemplate>) -> Result<Self, PlannerError> {
        validate_templates(&templates)?;
        Ok(Self::index(templates))
    }

    /// Parses a JSON array of templates.
    pub fn from_json(raw: &str) -> Result<Self, PlannerError> {
        let templates: Vec<LayoutTemplate> = serde_json::from_str(raw)?;
        Self::from_templates(templates)
    }

    pub fn from_path(path: &Path) -> Result<Self, PlannerError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            layouts = catalog.len(),
            "Loaded layout catalog"
        );
        Ok(catalog)
    }

    fn index(templates: Vec<LayoutTemplate>) -> Self {
        let by_id = templates
            .iter()
            .enumerate()
            .map(|(i, t)| (t.layout_id.clone(), i))
            .collect();
        LayoutCatalog { templates, by_id }
    }

    pub fn get(&self, layout_id: &str) -> Option<&LayoutTemplate> {
        self.by_id.get(layout_id).map(|&i| &self.templates[i])
    }

    pub fn contains(&self, layout_id: &str) -> bool {
        self.by_id.contains_key(layout_id)
    }

    /// Declaration order of `layout_id`, used to break score ties.
    pub fn position(&self, layout_id: &str) -> Option<usize> {
        self.by_id.get(layout_id).copied()
    }

    /// Templates in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn summary(&self) -> Vec<LayoutSummary> {
        self.templates
            .iter()
            .map(|t| LayoutSummary {
                layout_id: t.layout_id.clone(),
                display_name: t.display_name.clone(),
                description: t.description.clone(),
                image_slots: t.image_slots.len(),
                text_structure: if t.max_bullets > 0 {
                    "bullets".to_string()
                } else {
                    "paragraph".to_string()
                },
                max_items: t.max_bullets,
                suitable_for: t.suitable_keywords.clone(),
            })
            .collect()
    }
}

fn validate_templates(templates: &[LayoutTemplate]) -> Result<(), PlannerError> {
    if templates.is_empty() {
        return Err(PlannerError::Catalog("catalog contains no layouts".into()));
    }

    let mut seen = HashSet::new();
    for template in templates {
        let id = template.layout_id.as_str();
        if id.trim().is_empty() {
            return Err(PlannerError::Catalog("layout with empty layout_id".into()));
        }
        if !seen.insert(id) {
            return Err(PlannerError::Catalog(format!("duplicate layout_id '{id}'")));
        }
        for (n, slot) in template.image_slots.iter().enumerate() {
            if !slot.is_normalized() {
                return Err(PlannerError::Catalog(format!(
                    "layout '{id}' slot {} lies outside the page",
                    n + 1
                )));
            }
            if !(1..=5).contains(&slot.priority) {
                return Err(PlannerError::Catalog(format!(
                    "layout '{id}' slot {} has priority {} (expected 1-5)",
                    n + 1,
                    slot.priority
                )));
            }
        }
    }

    if !seen.contains(FALLBACK_LAYOUT_ID) {
        return Err(PlannerError::Catalog(format!(
            "catalog must define the '{FALLBACK_LAYOUT_ID}' layout"
        )));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in templates
// ────────────────────────────────────────────────────────────────────────────

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn slot(
    position: SlotPosition,
    (x, y, w, h): (f64, f64, f64, f64),
    aspect_ratio: AspectRatio,
    priority: u8,
) -> ImageSlotDef {
    ImageSlotDef {
        position,
        x,
        y,
        w,
        h,
        aspect_ratio,
        default_style: Some(VisualStyle::Photo),
        priority,
    }
}

fn builtin_templates() -> Vec<LayoutTemplate> {
    use AspectRatio::*;
    use SlideType as T;
    use SlotPosition::*;

    vec![
        LayoutTemplate {
            layout_id: "title_only".into(),
            display_name: "纯标题页".into(),
            description: "封面或过渡页,仅包含标题".into(),
            suitable_slide_types: vec![T::Title, T::Cover, T::Bridge],
            suitable_keywords: vec![],
            image_slots: vec![],
            max_bullets: 0,
            max_text_length: 50,
            alternatives: vec![],
        },
        LayoutTemplate {
            layout_id: "title_bullets".into(),
            display_name: "标题+要点".into(),
            description: "目录、总结页,包含标题和要点列表".into(),
            suitable_slide_types: vec![T::Objectives, T::Summary, T::Agenda],
            suitable_keywords: strs(&["目标", "总结", "目录", "回顾"]),
            image_slots: vec![],
            max_bullets: 8,
            max_text_length: 400,
            alternatives: strs(&["title_bullets_right_img", "table_comparison", "center_visual"]),
        },
        LayoutTemplate {
            layout_id: "title_bullets_right_img".into(),
            display_name: "左文右图".into(),
            description: "最常用布局,左侧要点,右侧图片".into(),
            suitable_slide_types: vec![T::Concept, T::Intro, T::Keypoints],
            suitable_keywords: strs(&["概念", "定义", "介绍", "要点"]),
            image_slots: vec![slot(RightHalf, (0.62, 0.20, 0.32, 0.72), Landscape, 1)],
            max_bullets: 6,
            max_text_length: 450,
            alternatives: strs(&["center_visual", "split_vertical", "operation_steps"]),
        },
        LayoutTemplate {
            layout_id: "operation_steps".into(),
            display_name: "左图右步骤".into(),
            description: "实训核心布局,左侧图片,右侧操作步骤".into(),
            suitable_slide_types: vec![T::Steps, T::Practice, T::Demo],
            suitable_keywords: strs(&["步骤", "操作", "流程", "方法", "实训"]),
            image_slots: vec![slot(LeftHalf, (0.06, 0.20, 0.36, 0.72), Landscape, 1)],
            max_bullets: 5,
            max_text_length: 300,
            alternatives: strs(&["timeline_horizontal", "title_bullets_right_img", "split_vertical"]),
        },
        LayoutTemplate {
            layout_id: "concept_comparison".into(),
            display_name: "左右对比".into(),
            description: "对比布局,左右两侧各一个图片或文本块".into(),
            suitable_slide_types: vec![T::Comparison, T::Contrast],
            suitable_keywords: strs(&["对比", "比较", "区别", "正确", "错误", "vs", "优缺点"]),
            image_slots: vec![
                slot(LeftHalf, (0.06, 0.20, 0.42, 0.72), Landscape, 1),
                slot(RightHalf, (0.52, 0.20, 0.42, 0.72), Landscape, 1),
            ],
            max_bullets: 4,
            max_text_length: 250,
            alternatives: strs(&["table_comparison", "grid_4", "center_visual"]),
        },
        LayoutTemplate {
            layout_id: "grid_4".into(),
            display_name: "四宫格".into(),
            description: "四宫格布局,展示工具、设备或知识点".into(),
            suitable_slide_types: vec![T::Tools, T::Equipment, T::Gallery],
            suitable_keywords: strs(&["工具", "设备", "部件", "类型", "分类"]),
            image_slots: vec![
                slot(TopLeft, (0.06, 0.25, 0.42, 0.32), Landscape, 1),
                slot(TopRight, (0.52, 0.25, 0.42, 0.32), Landscape, 1),
                slot(BottomLeft, (0.06, 0.60, 0.42, 0.32), Landscape, 2),
                slot(BottomRight, (0.52, 0.60, 0.42, 0.32), Landscape, 2),
            ],
            max_bullets: 4,
            max_text_length: 200,
            alternatives: strs(&["concept_comparison", "center_visual", "split_vertical"]),
        },
        LayoutTemplate {
            layout_id: "table_comparison".into(),
            display_name: "表格对比".into(),
            description: "双列表格对比布局,适合参数/特性对比".into(),
            suitable_slide_types: vec![T::Comparison, T::Concept, T::Keypoints],
            suitable_keywords: strs(&["对比", "参数", "特性", "比较", "表格", "数据"]),
            image_slots: vec![],
            max_bullets: 8,
            max_text_length: 500,
            alternatives: strs(&["concept_comparison", "title_bullets", "grid_4"]),
        },
        LayoutTemplate {
            layout_id: "timeline_horizontal".into(),
            display_name: "水平时间轴".into(),
            description: "横向时间线/流程展示,适合阶段性内容".into(),
            suitable_slide_types: vec![T::Steps, T::Process, T::History],
            suitable_keywords: strs(&["阶段", "历程", "发展", "时间", "演变"]),
            image_slots: vec![],
            max_bullets: 6,
            max_text_length: 300,
            alternatives: strs(&["operation_steps", "title_bullets", "split_vertical"]),
        },
        LayoutTemplate {
            layout_id: "center_visual".into(),
            display_name: "中心视觉".into(),
            description: "大图居中,标题在上,说明在下".into(),
            suitable_slide_types: vec![T::Concept, T::Demo, T::Showcase],
            suitable_keywords: strs(&["展示", "核心", "重点", "关键", "主图"]),
            image_slots: vec![slot(Center, (0.15, 0.18, 0.70, 0.60), Wide, 1)],
            max_bullets: 3,
            max_text_length: 200,
            alternatives: strs(&["title_bullets_right_img", "split_vertical", "operation_steps"]),
        },
        LayoutTemplate {
            layout_id: "split_vertical".into(),
            display_name: "上下分栏".into(),
            description: "上图下文或上文下图布局".into(),
            suitable_slide_types: vec![T::Concept, T::Intro, T::Overview],
            suitable_keywords: strs(&["全景", "俯视", "概览", "场景"]),
            image_slots: vec![slot(Top, (0.06, 0.15, 0.88, 0.38), UltraWide, 1)],
            max_bullets: 4,
            max_text_length: 250,
            alternatives: strs(&["center_visual", "title_bullets_right_img", "operation_steps"]),
        },
    ]
}
