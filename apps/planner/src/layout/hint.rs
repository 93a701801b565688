//! Layout hint seam: an optional external collaborator that proposes a layout
//! for a slide.
//!
//! The resolver carries an `Arc<dyn LayoutHintProvider>`. Providers are
//! unreliable by contract: every call is bounded by a timeout, and any error or
//! timeout is treated exactly like "no hint".

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layout::catalog::LayoutSummary;
use crate::models::slide::{Slide, SlideType};

const SUMMARY_BULLETS: usize = 5;

#[derive(Debug, Error)]
pub enum HintError {
    #[error("layout hint timed out after {0} ms")]
    Timeout(u128),

    #[error("layout hint service unavailable: {0}")]
    Unavailable(String),

    #[error("layout hint response could not be used: {0}")]
    InvalidResponse(String),
}

/// What the hint service sees of a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlideSummary {
    pub index: usize,
    pub slide_type: SlideType,
    pub title: String,
    pub bullets: Vec<String>,
    pub image_count: usize,
}

impl SlideSummary {
    pub fn from_slide(slide: &Slide) -> Self {
        SlideSummary {
            index: slide.index,
            slide_type: slide.slide_type,
            title: slide.title.clone(),
            bullets: slide
                .rendered_lines()
                .into_iter()
                .take(SUMMARY_BULLETS)
                .collect(),
            image_count: slide.visual_assets().count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintRequest {
    pub slide_summary: SlideSummary,
    pub catalog_summary: Vec<LayoutSummary>,
    pub previous_layout_id: Option<String>,
}

/// Proposes a `layout_id` for one slide, or `None` to abstain.
#[async_trait]
pub trait LayoutHintProvider: Send + Sync {
    async fn suggest(&self, request: &HintRequest) -> Result<Option<String>, HintError>;
}

/// Always proposes the same layout. Useful for pinning a deck to one look, and
/// for exercising the hint layer without a live service.
pub struct FixedHintProvider(pub Option<String>);

#[async_trait]
impl LayoutHintProvider for FixedHintProvider {
    async fn suggest(&self, _request: &HintRequest) -> Result<Option<String>, HintError> {
        Ok(self.0.clone())
    }
}

/// Calls `provider` under `timeout`. A blank suggestion counts as abstaining.
pub async fn request_hint(
    provider: &dyn LayoutHintProvider,
    request: &HintRequest,
    timeout: Duration,
) -> Result<Option<String>, HintError> {
    match tokio::time::timeout(timeout, provider.suggest(request)).await {
        Ok(result) => Ok(result?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())),
        Err(_) => Err(HintError::Timeout(timeout.as_millis())),
    }
}
