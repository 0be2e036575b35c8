//! Declarative per-field validation rules.

use std::borrow::Cow;

use regex::Regex;

use crate::{Field, FormError};

/// How one field is validated. A failing rule reports its single `message`.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub required: bool,
    pub pattern: Option<Regex>,
    pub max_length: Option<usize>,
    /// Match the pattern against the upper-cased value.
    pub uppercase: bool,
    /// Allowed values; empty means any.
    pub options: &'static [&'static str],
    pub message: String,
}

impl FieldRule {
    pub fn required(message: impl Into<String>) -> Self {
        Self {
            required: true,
            pattern: None,
            max_length: None,
            uppercase: false,
            options: &[],
            message: message.into(),
        }
    }

    pub fn optional(message: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(message)
        }
    }

    pub fn pattern(mut self, pattern: &str) -> Result<Self, FormError> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn options(mut self, options: &'static [&'static str]) -> Self {
        self.options = options;
        self
    }

    /// Check a value. Empty optional values always pass.
    pub fn check(&self, value: &str) -> Result<(), &str> {
        if value.trim().is_empty() {
            return if self.required {
                Err(self.message.as_str())
            } else {
                Ok(())
            };
        }

        let candidate = if self.uppercase {
            Cow::Owned(value.to_uppercase())
        } else {
            Cow::Borrowed(value)
        };
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(&candidate) {
                return Err(self.message.as_str());
            }
        }
        if !self.options.is_empty() && !self.options.iter().any(|option| *option == value) {
            return Err(self.message.as_str());
        }
        Ok(())
    }

    /// Cut `value` to `max_length` characters.
    pub fn truncate<'a>(&self, value: &'a str) -> &'a str {
        match self.max_length {
            Some(max) => match value.char_indices().nth(max) {
                Some((idx, _)) => &value[..idx],
                None => value,
            },
            None => value,
        }
    }
}

/// Rules for the whole form. Fields without a rule are unconstrained.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(Field, FieldRule)>,
}

impl RuleSet {
    pub fn new(rules: Vec<(Field, FieldRule)>) -> Self {
        Self { rules }
    }

    pub fn get(&self, field: Field) -> Option<&FieldRule> {
        self.rules.iter().find(|(f, _)| *f == field).map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldRule)> {
        self.rules.iter().map(|(f, r)| (*f, r))
    }

    /// Error message for `value`, if the field's rule rejects it.
    pub fn check(&self, field: Field, value: &str) -> Option<&str> {
        self.get(field).and_then(|rule| rule.check(value).err())
    }

    pub fn max_length(&self, field: Field) -> Option<usize> {
        self.get(field).and_then(|rule| rule.max_length)
    }

    /// Truncate `value` to the field's maximum length, if it has one.
    pub fn truncate<'a>(&self, field: Field, value: &'a str) -> &'a str {
        match self.get(field) {
            Some(rule) => rule.truncate(value),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_empty_and_blank() {
        let rule = FieldRule::required("City is required.");
        assert_eq!(rule.check(""), Err("City is required."));
        assert_eq!(rule.check("   "), Err("City is required."));
        assert_eq!(rule.check("Pune"), Ok(()));
    }

    #[test]
    fn test_optional_pattern_only_checked_when_present() {
        let rule = FieldRule::optional("bad zip").pattern(r"^\d{6}$").unwrap();
        assert!(rule.check("").is_ok());
        assert!(rule.check("411001").is_ok());
        assert!(rule.check("4110").is_err());
    }

    #[test]
    fn test_uppercase_matching() {
        let rule = FieldRule::required("bad")
            .pattern(r"^[A-Z]{3}$")
            .unwrap()
            .uppercase();
        assert!(rule.check("abc").is_ok());

        let strict = FieldRule::required("bad").pattern(r"^[A-Z]{3}$").unwrap();
        assert!(strict.check("abc").is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            FieldRule::required("x").pattern("("),
            Err(FormError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_truncate_counts_characters() {
        let rule = FieldRule::optional("x").max_length(3);
        assert_eq!(rule.truncate("abcdef"), "abc");
        assert_eq!(rule.truncate("ab"), "ab");
        assert_eq!(rule.truncate("ééééé"), "ééé");
        assert_eq!(FieldRule::optional("x").truncate("abcdef"), "abcdef");
    }

    #[test]
    fn test_rule_set_lookup() {
        let rules = RuleSet::new(vec![(
            Field::City,
            FieldRule::required("City is required."),
        )]);
        assert_eq!(rules.check(Field::City, ""), Some("City is required."));
        assert_eq!(rules.check(Field::State, ""), None);
        assert_eq!(rules.truncate(Field::State, "anything"), "anything");
    }
}
