pub mod outline;
pub mod requirements;
pub mod slide;

pub use outline::{Outline, TeachingScene};
pub use requirements::{IntegrationMethod, SpecialRequirements};
pub use slide::{AbsorbedContent, AbsorbedSource, AssetHint, AssetKind, Slide, SlideType};
