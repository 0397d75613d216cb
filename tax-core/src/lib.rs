pub mod calculations;
pub mod format;
pub mod fx;
pub mod models;
pub mod registry;
pub mod share;
pub mod validation;

pub use calculations::PersonalIncomeTax;
pub use models::*;
pub use registry::RegimeRegistry;
pub use validation::{FieldIssue, FieldProblem, MAX_AMOUNT, ValidationError};
