//! Built-in field rules and select options.

use crate::rules::{FieldRule, RuleSet};
use crate::{Field, FormError};

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Other"];

pub const OCCUPATION_OPTIONS: &[&str] = &[
    "Private Sector Employee",
    "Government Employee",
    "Self-employed/Business",
    "Professional",
    "Farmer",
    "Student",
    "Homemaker",
    "Retired",
    "Unemployed",
    "Other",
];

const PAN_PATTERN: &str = r"^[A-Z]{5}[0-9]{4}[A-Z]$";
const VOTER_ID_PATTERN: &str = r"^[A-Z]{3}[0-9]{7}$";
const ZIP_PATTERN: &str = r"^\d{6}$";
const PHONE_PATTERN: &str = r"^\d{10}$";
const EMAIL_PATTERN: &str = r"\S+@\S+\.\S+";

/// Number of digits in an Aadhaar number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityLength {
    #[default]
    Twelve,
    Sixteen,
}

impl IdentityLength {
    pub fn from_digits(digits: u32) -> Result<Self, FormError> {
        match digits {
            12 => Ok(Self::Twelve),
            16 => Ok(Self::Sixteen),
            other => Err(FormError::UnsupportedIdentityLength(other)),
        }
    }

    pub fn digits(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::Sixteen => 16,
        }
    }
}

impl RuleSet {
    /// The registration form's rules, with Aadhaar numbers of `aadhaar` digits.
    pub fn standard(aadhaar: IdentityLength) -> Result<Self, FormError> {
        let digits = aadhaar.digits();
        let rules = vec![
            (Field::FullName, FieldRule::required("Full name is required.")),
            (Field::Dob, FieldRule::required("Date of birth is required.")),
            (
                Field::Gender,
                FieldRule::required("Gender is required.").options(GENDER_OPTIONS),
            ),
            (
                Field::Occupation,
                FieldRule::required("Occupation is required.").options(OCCUPATION_OPTIONS),
            ),
            (
                Field::Education,
                FieldRule::required("Highest qualification is required."),
            ),
            (
                Field::Aadhaar,
                FieldRule::required(format!(
                    "A valid {digits}-digit Aadhaar number is required."
                ))
                .pattern(&format!(r"^\d{{{digits}}}$"))?
                .max_length(digits),
            ),
            (
                Field::Pan,
                FieldRule::optional("Please enter a valid PAN number.")
                    .pattern(PAN_PATTERN)?
                    .uppercase()
                    .max_length(10),
            ),
            (
                Field::VoterId,
                FieldRule::required("A valid 10-character Voter ID is required.")
                    .pattern(VOTER_ID_PATTERN)?
                    .uppercase()
                    .max_length(10),
            ),
            (
                Field::Address1,
                FieldRule::required("Permanent address is required."),
            ),
            (Field::City, FieldRule::required("City is required.")),
            (Field::State, FieldRule::required("State is required.")),
            (
                Field::Zip,
                FieldRule::optional("Please enter a valid 6-digit Zip Code.")
                    .pattern(ZIP_PATTERN)?,
            ),
            (
                Field::Phone,
                FieldRule::required("A 10-digit phone number is required.")
                    .pattern(PHONE_PATTERN)?,
            ),
            (
                Field::Email,
                FieldRule::optional("Please enter a valid email.").pattern(EMAIL_PATTERN)?,
            ),
            (
                Field::ProfilePicture,
                FieldRule::required("Profile picture is required."),
            ),
        ];
        Ok(RuleSet::new(rules))
    }
}
