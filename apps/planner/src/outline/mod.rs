pub mod adjustment;
pub mod validation;

pub use adjustment::adjust_to_target;
pub use validation::{auto_correct, validate, OutlineValidation, Severity, ValidationCheck, ValidationIssue};
