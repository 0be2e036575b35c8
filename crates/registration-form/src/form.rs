//! Form values and their validation state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Field, FormError, RuleSet};

/// Per-field error messages. Absent key means no error.
pub type FormErrors = BTreeMap<Field, String>;

/// A picture chosen by the user, already compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPhoto {
    /// Name of the file the user picked; its extension names the stored object.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw field values as typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormData {
    pub full_name: String,
    pub dob: String,
    pub gender: String,
    pub occupation: String,
    pub education: String,
    pub aadhaar: String,
    pub pan: String,
    pub voter_id: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub phone: String,
    pub email: String,
    pub reason_for_joining: String,
    #[serde(skip)]
    pub profile_picture: Option<SelectedPhoto>,
}

impl FormData {
    /// Text value of a field. The picture field has none.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::Dob => &self.dob,
            Field::Gender => &self.gender,
            Field::Occupation => &self.occupation,
            Field::Education => &self.education,
            Field::Aadhaar => &self.aadhaar,
            Field::Pan => &self.pan,
            Field::VoterId => &self.voter_id,
            Field::Address1 => &self.address1,
            Field::Address2 => &self.address2,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Zip => &self.zip,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::ReasonForJoining => &self.reason_for_joining,
            Field::ProfilePicture => "",
        }
    }

    fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        let slot = match field {
            Field::FullName => &mut self.full_name,
            Field::Dob => &mut self.dob,
            Field::Gender => &mut self.gender,
            Field::Occupation => &mut self.occupation,
            Field::Education => &mut self.education,
            Field::Aadhaar => &mut self.aadhaar,
            Field::Pan => &mut self.pan,
            Field::VoterId => &mut self.voter_id,
            Field::Address1 => &mut self.address1,
            Field::Address2 => &mut self.address2,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Zip => &mut self.zip,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::ReasonForJoining => &mut self.reason_for_joining,
            Field::ProfilePicture => return None,
        };
        Some(slot)
    }
}

/// Values, errors and rules of one registration form.
#[derive(Debug, Clone)]
pub struct FormState {
    data: FormData,
    errors: FormErrors,
    rules: RuleSet,
}

impl FormState {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            data: FormData::default(),
            errors: FormErrors::new(),
            rules,
        }
    }

    /// Start from prefilled values, applied field by field as if typed.
    pub fn with_data(rules: RuleSet, data: FormData) -> Self {
        let mut state = Self::new(rules);
        for field in Field::ALL.into_iter().filter(|f| f.is_text()) {
            let value = data.value(field).to_string();
            if let Some(slot) = state.data.value_mut(field) {
                *slot = state.rules.truncate(field, &value).to_string();
            }
        }
        state.data.profile_picture = data.profile_picture;
        state
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    /// Store a typed value, cut to the field's maximum length, and clear
    /// the field's pending error.
    pub fn change(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        let truncated = self.rules.truncate(field, value).to_string();
        let slot = self
            .data
            .value_mut(field)
            .ok_or(FormError::NotTextField(field.name()))?;
        *slot = truncated;
        self.errors.remove(&field);
        Ok(())
    }

    /// Attach the picture and clear its pending error.
    pub fn set_photo(&mut self, photo: SelectedPhoto) {
        tracing::debug!(
            file_name = %photo.file_name,
            size = photo.bytes.len(),
            "Profile picture selected"
        );
        self.data.profile_picture = Some(photo);
        self.errors.remove(&Field::ProfilePicture);
    }

    /// Record a picture error; the picture itself is left unchanged.
    pub fn photo_error(&mut self, message: impl Into<String>) {
        self.set_error(Field::ProfilePicture, message);
    }

    pub fn set_error(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Evaluate every rule, replacing the stored errors. Returns whether the
    /// form is valid.
    pub fn validate(&mut self) -> bool {
        let mut errors = FormErrors::new();
        for (field, rule) in self.rules.iter() {
            let result = if field == Field::ProfilePicture {
                match &self.data.profile_picture {
                    Some(_) => Ok(()),
                    None if rule.required => Err(rule.message.as_str()),
                    None => Ok(()),
                }
            } else {
                rule.check(self.data.value(field))
            };
            if let Err(message) = result {
                errors.insert(field, message.to_string());
            }
        }

        if !errors.is_empty() {
            tracing::debug!(invalid = ?errors.keys().collect::<Vec<_>>(), "Form validation failed");
        }
        self.errors = errors;
        self.errors.is_empty()
    }

    /// Clear all values and errors.
    pub fn reset(&mut self) {
        self.data = FormData::default();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IdentityLength;

    fn standard() -> FormState {
        FormState::new(RuleSet::standard(IdentityLength::Twelve).unwrap())
    }

    fn photo() -> SelectedPhoto {
        SelectedPhoto {
            file_name: "me.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF],
        }
    }

    fn filled() -> FormState {
        let mut form = standard();
        for (field, value) in [
            (Field::FullName, "Asha Verma"),
            (Field::Dob, "1990-04-12"),
            (Field::Gender, "Female"),
            (Field::Occupation, "Farmer"),
            (Field::Education, "Graduate"),
            (Field::Aadhaar, "123456789012"),
            (Field::VoterId, "abc1234567"),
            (Field::Address1, "12 Station Road"),
            (Field::City, "Nashik"),
            (Field::State, "Maharashtra"),
            (Field::Phone, "9876543210"),
        ] {
            form.change(field, value).unwrap();
        }
        form.set_photo(photo());
        form
    }

    #[test]
    fn test_change_truncates_to_max_length() {
        let mut form = standard();
        form.change(Field::Aadhaar, "1234567890123456").unwrap();
        form.change(Field::Pan, "ABCDE1234FXYZ").unwrap();
        form.change(Field::VoterId, "ABC12345678").unwrap();
        form.change(Field::City, "A very long city name").unwrap();

        assert_eq!(form.data().aadhaar, "123456789012");
        assert_eq!(form.data().pan, "ABCDE1234F");
        assert_eq!(form.data().voter_id, "ABC1234567");
        assert_eq!(form.data().city, "A very long city name");
    }

    #[test]
    fn test_change_clears_field_error() {
        let mut form = standard();
        assert!(!form.validate());
        assert!(form.error(Field::City).is_some());

        form.change(Field::City, "Nashik").unwrap();
        assert!(form.error(Field::City).is_none());
        assert!(form.error(Field::State).is_some());
    }

    #[test]
    fn test_change_rejects_picture_field() {
        let mut form = standard();
        assert!(matches!(
            form.change(Field::ProfilePicture, "x"),
            Err(FormError::NotTextField("profilePicture"))
        ));
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let mut form = standard();
        assert!(!form.validate());

        let errors = form.errors();
        assert_eq!(errors[&Field::FullName], "Full name is required.");
        assert_eq!(
            errors[&Field::Aadhaar],
            "A valid 12-digit Aadhaar number is required."
        );
        assert_eq!(errors[&Field::ProfilePicture], "Profile picture is required.");
        for optional in [Field::Pan, Field::Zip, Field::Email, Field::Address2] {
            assert!(!errors.contains_key(&optional));
        }
    }

    #[test]
    fn test_filled_form_is_valid() {
        let mut form = filled();
        assert!(form.validate(), "unexpected errors: {:?}", form.errors());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_optional_fields_checked_when_present() {
        let mut form = filled();
        form.change(Field::Email, "asha@").unwrap();
        form.change(Field::Zip, "42200").unwrap();
        assert!(!form.validate());
        assert_eq!(form.error(Field::Email), Some("Please enter a valid email."));
        assert_eq!(
            form.error(Field::Zip),
            Some("Please enter a valid 6-digit Zip Code.")
        );
        assert_eq!(form.errors().len(), 2);
    }

    #[test]
    fn test_validate_replaces_previous_errors() {
        let mut form = filled();
        form.set_error(Field::Aadhaar, "Error checking Aadhaar. Please try again.");
        assert!(form.validate());
        assert!(form.error(Field::Aadhaar).is_none());
    }

    #[test]
    fn test_photo_error_and_set_photo() {
        let mut form = standard();
        form.photo_error("Image compression failed. Please try another file.");
        assert_eq!(
            form.error(Field::ProfilePicture),
            Some("Image compression failed. Please try another file.")
        );

        form.set_photo(photo());
        assert!(form.error(Field::ProfilePicture).is_none());
        assert_eq!(form.data().profile_picture, Some(photo()));
    }

    #[test]
    fn test_reset() {
        let mut form = filled();
        form.set_error(Field::Aadhaar, "taken");
        form.reset();
        assert_eq!(form.data(), &FormData::default());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_with_data_applies_truncation() {
        let data: FormData = serde_json::from_str(
            r#"{"fullName": "Asha Verma", "aadhaar": "1234567890123456", "voterId": "ABC1234567"}"#,
        )
        .unwrap();
        let form = FormState::with_data(RuleSet::standard(IdentityLength::Twelve).unwrap(), data);
        assert_eq!(form.data().full_name, "Asha Verma");
        assert_eq!(form.data().aadhaar, "123456789012");
        assert_eq!(form.data().voter_id, "ABC1234567");
        assert!(form.data().city.is_empty());
    }
}
