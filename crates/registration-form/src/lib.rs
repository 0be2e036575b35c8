//! Membership registration form: field values, per-field errors, and
//! validation driven by a declarative rule set.

pub mod defaults;
pub mod field;
pub mod form;
pub mod rules;

pub use defaults::{GENDER_OPTIONS, IdentityLength, OCCUPATION_OPTIONS};
pub use field::Field;
pub use form::{FormData, FormErrors, FormState, SelectedPhoto};
pub use rules::{FieldRule, RuleSet};

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Field {0} does not hold text")]
    NotTextField(&'static str),

    #[error("Unsupported identity number length: {0} (expected 12 or 16)")]
    UnsupportedIdentityLength(u32),

    #[error("Invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
