//! Deck planner: the deterministic planning and layout core for teaching decks.
//!
//! An outline from the content generator is adjusted to a target slide count,
//! validated against the request's structural requirements and auto-corrected,
//! then every slide is assigned a layout and image slots in document order.

pub mod config;
pub mod errors;
pub mod events;
pub mod layout;
pub mod models;
pub mod outline;
pub mod pipeline;

pub use errors::PlannerError;
pub use pipeline::{DeckLayout, DeckPlan, DeckPlanner, OutlineOutcome, PlanningRequest};
