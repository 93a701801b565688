pub mod catalog;
pub mod hint;
pub mod keywords;
pub mod resolver;
pub mod safety;
pub mod scoring;
pub mod slots;

pub use catalog::{LayoutCatalog, LayoutTemplate, FALLBACK_LAYOUT_ID};
pub use hint::{HintError, LayoutHintProvider};
pub use resolver::{DecisionSource, LayoutAssignment, LayoutDecision, LayoutResolver, SceneContext};
pub use slots::ImageSlot;
