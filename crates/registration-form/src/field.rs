//! Form field identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FormError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Dob,
    Gender,
    Occupation,
    Education,
    Aadhaar,
    Pan,
    VoterId,
    Address1,
    Address2,
    City,
    State,
    Zip,
    Phone,
    Email,
    ReasonForJoining,
    ProfilePicture,
}

impl Field {
    /// Every field in display order.
    pub const ALL: [Field; 17] = [
        Field::FullName,
        Field::Dob,
        Field::Gender,
        Field::Occupation,
        Field::Education,
        Field::Aadhaar,
        Field::Pan,
        Field::VoterId,
        Field::Address1,
        Field::Address2,
        Field::City,
        Field::State,
        Field::Zip,
        Field::Phone,
        Field::Email,
        Field::ReasonForJoining,
        Field::ProfilePicture,
    ];

    /// Wire name, as used in stored records and input payloads.
    pub fn name(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Dob => "dob",
            Field::Gender => "gender",
            Field::Occupation => "occupation",
            Field::Education => "education",
            Field::Aadhaar => "aadhaar",
            Field::Pan => "pan",
            Field::VoterId => "voterId",
            Field::Address1 => "address1",
            Field::Address2 => "address2",
            Field::City => "city",
            Field::State => "state",
            Field::Zip => "zip",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::ReasonForJoining => "reasonForJoining",
            Field::ProfilePicture => "profilePicture",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full Name",
            Field::Dob => "Date of Birth",
            Field::Gender => "Gender",
            Field::Occupation => "Occupation",
            Field::Education => "Highest Qualification",
            Field::Aadhaar => "Aadhaar Number",
            Field::Pan => "PAN Number",
            Field::VoterId => "Voter ID",
            Field::Address1 => "Residential/Permanent Address",
            Field::Address2 => "Current Address",
            Field::City => "City",
            Field::State => "State",
            Field::Zip => "Zip Code",
            Field::Phone => "Phone",
            Field::Email => "Email",
            Field::ReasonForJoining => "Reason for Joining",
            Field::ProfilePicture => "Profile Picture",
        }
    }

    /// Whether the field holds a text value (everything but the photo).
    pub fn is_text(self) -> bool {
        self != Field::ProfilePicture
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}
