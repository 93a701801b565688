//! Special requirements from the teaching request. Read-only to the planner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseRequirement {
    pub enabled: bool,
    pub count: u32,
    pub case_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseRequirement {
    pub enabled: bool,
    pub total_count: u32,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionRequirement {
    pub enabled: bool,
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningRequirement {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    #[default]
    Embedded,
    DedicatedSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeologicalEducation {
    pub enabled: bool,
    /// e.g. 职业道德, 工匠精神
    pub focus_points: Vec<String>,
    pub integration_method: IntegrationMethod,
}

/// Structural requirements an outline is checked against.
///
/// Every category defaults to disabled, and the count bounds to absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialRequirements {
    pub cases: CaseRequirement,
    pub exercises: ExerciseRequirement,
    pub interaction: InteractionRequirement,
    pub warnings: WarningRequirement,
    pub ideological_education: IdeologicalEducation,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub target_count: Option<u32>,
}
